//! Console progress output.

use device_replay_events::{ReplayProgress, ReplayReporter};
use std::io::Write;
use std::sync::Mutex;

/// Writes one line per progress notification.
pub struct ConsoleReporter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleReporter {
    /// Reporter writing to stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    /// Reporter writing to any writer.
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }
}

impl ReplayReporter for ConsoleReporter {
    fn report(&self, progress: &ReplayProgress) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(out, "{}", progress).and_then(|_| out.flush()) {
            tracing::warn!("Failed to write progress: {}", e);
        }
    }
}
