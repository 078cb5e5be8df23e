//! Delivery sink contract.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::event::EventRecord;

/// Result of a single delivery attempt.
pub type DeliveryResult = Result<(), DeliveryFailure>;

/// Why a delivery attempt did not succeed.
///
/// Failures are reported and counted, never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// The endpoint answered with a status other than the transport's OK.
    Status(u16),
    /// No response was received.
    Transport(String),
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryFailure::Status(code) => write!(f, "{}", code),
            DeliveryFailure::Transport(reason) => write!(f, "error ({})", reason),
        }
    }
}

impl std::error::Error for DeliveryFailure {}

/// Trait for endpoints that receive replayed events.
///
/// One sink is shared by every timeline player of a replay, so
/// implementations must be safe to call concurrently. A call must not hold
/// any lock across the request that would make players wait on each other.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    /// Returns an identifier for logs.
    fn id(&self) -> &str {
        "sink"
    }

    /// Delivers one event. `Ok` only for the transport's canonical OK.
    async fn deliver(&self, device_id: &str, record: &EventRecord) -> DeliveryResult;
}

/// A shared delivery sink.
pub type SharedSink = Arc<dyn DeliverySink>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        assert_eq!(DeliveryFailure::Status(503).to_string(), "503");
        assert_eq!(
            DeliveryFailure::Transport("connection refused".into()).to_string(),
            "error (connection refused)"
        );
    }
}
