use super::engine::ReplaySummary;
use crate::sink::DeliveryFailure;
use std::fmt;
use std::sync::Mutex;

/// A progress notification emitted during replay
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayProgress {
    /// An event was delivered
    Sent {
        device_id: String,
        sent: usize,
        total: usize,
    },

    /// An event could not be delivered; its timeline carries on
    Failed {
        device_id: String,
        failure: DeliveryFailure,
    },

    /// Every timeline has finished. Emitted once per replay, whether or not
    /// some deliveries failed.
    Completed(ReplaySummary),
}

impl fmt::Display for ReplayProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayProgress::Sent {
                device_id,
                sent,
                total,
            } => write!(f, "{} | Event sent ({}/{})", device_id, sent, total),
            ReplayProgress::Failed { device_id, failure } => {
                write!(f, "{} | Failed to send event with status {}", device_id, failure)
            }
            ReplayProgress::Completed(_) => write!(f, "All events sent successfully."),
        }
    }
}

/// Receives progress notifications as they happen
///
/// Called concurrently from every timeline player.
pub trait ReplayReporter: Send + Sync {
    fn report(&self, progress: &ReplayProgress);
}

/// Reporter that writes progress to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ReplayReporter for TracingReporter {
    fn report(&self, progress: &ReplayProgress) {
        match progress {
            ReplayProgress::Failed { .. } => tracing::warn!("{}", progress),
            ReplayProgress::Sent { .. } | ReplayProgress::Completed(_) => {
                tracing::info!("{}", progress)
            }
        }
    }
}

/// Reporter that keeps every notification in memory
///
/// Useful for testing.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<ReplayProgress>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far, in arrival order
    pub fn entries(&self) -> Vec<ReplayProgress> {
        self.lock().clone()
    }

    /// Rendered lines, in arrival order
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(ToString::to_string).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ReplayProgress>> {
        // A poisoned lock only means a reporting thread panicked; the log is
        // still usable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ReplayReporter for MemoryReporter {
    fn report(&self, progress: &ReplayProgress) {
        self.lock().push(progress.clone());
    }
}
