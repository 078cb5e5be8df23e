//! HTTP sink configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default endpoint: a local streaming server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:62333/stream";

/// Configuration of an [`HttpSink`](crate::HttpSink).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSinkConfig {
    /// Endpoint every event is POSTed to.
    pub url: String,
    /// Extra headers sent with each request.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for HttpSinkConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            headers: HashMap::new(),
        }
    }
}

impl HttpSinkConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
        }
    }

    /// Adds a custom header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Adds several custom headers.
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }
}
