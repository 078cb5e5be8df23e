//! HTTP delivery sink.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{StatusCode, Url};

use device_replay_events::{DeliveryFailure, DeliveryResult, DeliverySink, EventRecord};

use crate::config::HttpSinkConfig;
use crate::error::{DeliveryError, SinkResult};

/// Delivers each event as a JSON POST request.
///
/// Only `200 OK` counts as a successful delivery. The inner
/// `reqwest::Client` pools connections and is safe to share, so one sink
/// serves every device concurrently.
#[derive(Debug, Clone)]
pub struct HttpSink {
    url: Url,
    headers: HeaderMap,
    client: reqwest::Client,
}

impl HttpSink {
    /// Creates a sink from a configuration.
    pub fn new(config: HttpSinkConfig) -> SinkResult<Self> {
        let url = Url::parse(&config.url)
            .map_err(|e| DeliveryError::InvalidUrl(format!("{}: {}", config.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DeliveryError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                config.url,
                url.scheme()
            )));
        }

        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| DeliveryError::InvalidHeader(key.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| DeliveryError::InvalidHeader(key.clone()))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("device-replay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            url,
            headers,
            client,
        })
    }

    /// Creates a sink for an endpoint with no extra headers.
    pub fn with_url(url: impl Into<String>) -> SinkResult<Self> {
        Self::new(HttpSinkConfig::new(url))
    }

    /// Gets the endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl DeliverySink for HttpSink {
    fn id(&self) -> &str {
        self.url.as_str()
    }

    async fn deliver(&self, device_id: &str, record: &EventRecord) -> DeliveryResult {
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(self.url.clone())
            .headers(self.headers.clone())
            .json(record)
            .send()
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match response {
            Ok(resp) if resp.status() == StatusCode::OK => {
                // Drain the body so the connection returns to the pool.
                let _ = resp.bytes().await;
                tracing::trace!("Delivered event for {} in {}ms", device_id, duration_ms);
                Ok(())
            }
            Ok(resp) => {
                let status = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                tracing::debug!(
                    "Endpoint rejected event for {} with HTTP {} after {}ms: {}",
                    device_id,
                    status,
                    duration_ms,
                    body
                );
                Err(DeliveryFailure::Status(status))
            }
            Err(e) => {
                tracing::debug!("Request for {} failed after {}ms: {}", device_id, duration_ms, e);
                Err(DeliveryFailure::Transport(e.to_string()))
            }
        }
    }
}
