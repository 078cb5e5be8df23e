//! Delivery sink error types.

use thiserror::Error;

/// Result type for sink construction.
pub type SinkResult<T> = Result<T, DeliveryError>;

/// Error raised while building a delivery sink.
///
/// Per-event delivery problems are not errors; they are reported as
/// `DeliveryFailure` values and the replay continues.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The endpoint URL is malformed or not HTTP(S).
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),

    /// A configured header name or value is not valid HTTP.
    #[error("Invalid header '{0}'")]
    InvalidHeader(String),

    /// The HTTP client could not be created.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        DeliveryError::Client(err.to_string())
    }
}
