use super::report::{ReplayProgress, ReplayReporter};
use super::session::{ReplaySession, SentCounter};
use super::speed::ReplaySpeed;
use crate::partition::DeviceTimeline;
use crate::sink::SharedSink;
use crate::{ReplayError, ReplayResult};
use std::sync::Arc;

/// Lifecycle of a timeline player
///
/// `Idle -> Running -> Finished`. A failed delivery does not change the
/// state and there is no way back to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Running,
    Finished,
}

/// Outcome of one device's timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSummary {
    pub device_id: String,
    pub delivered: usize,
    pub failed: usize,
}

/// Plays one device's timeline against the delivery sink
///
/// Events are dispatched strictly in timeline order. Before each dispatch
/// the player waits for the timestamp delta to the previous event, scaled by
/// the replay speed. The first event is measured against itself and goes
/// out immediately.
pub struct TimelinePlayer {
    timeline: Arc<DeviceTimeline>,
    speed: ReplaySpeed,
    sink: SharedSink,
    counter: Arc<SentCounter>,
    reporter: Arc<dyn ReplayReporter>,
    state: PlayerState,
}

impl TimelinePlayer {
    /// Create a player for a timeline of the given session
    pub fn new(
        timeline: Arc<DeviceTimeline>,
        speed: ReplaySpeed,
        sink: SharedSink,
        session: &ReplaySession,
        reporter: Arc<dyn ReplayReporter>,
    ) -> Self {
        Self {
            timeline,
            speed,
            sink,
            counter: session.counter(),
            reporter,
            state: PlayerState::Idle,
        }
    }

    pub fn device_id(&self) -> &str {
        self.timeline.device_id()
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Play the whole timeline
    ///
    /// Delivery failures are reported and skipped. The only error is calling
    /// `run` on a player that already ran.
    pub async fn run(&mut self) -> ReplayResult<PlayerSummary> {
        if self.state != PlayerState::Idle {
            return Err(ReplayError::PlayerFinished(self.device_id().to_string()));
        }
        self.state = PlayerState::Running;

        let timeline = Arc::clone(&self.timeline);
        let device_id = timeline.device_id();
        let mut summary = PlayerSummary {
            device_id: device_id.to_string(),
            delivered: 0,
            failed: 0,
        };

        tracing::debug!(
            "Starting timeline for device {} ({} events)",
            device_id,
            timeline.len()
        );

        let mut previous = timeline.first_timestamp().unwrap_or_default();
        for event in timeline.events() {
            let current = event.seconds();

            if let Some(delay) = self.speed.delay_between(previous, current) {
                tokio::time::sleep(delay).await;
            }

            match self.sink.deliver(device_id, event.record()).await {
                Ok(()) => {
                    let sent = self.counter.record_delivery();
                    summary.delivered += 1;
                    self.reporter.report(&ReplayProgress::Sent {
                        device_id: device_id.to_string(),
                        sent,
                        total: self.counter.total(),
                    });
                }
                Err(failure) => {
                    summary.failed += 1;
                    self.reporter.report(&ReplayProgress::Failed {
                        device_id: device_id.to_string(),
                        failure,
                    });
                }
            }

            previous = current;
        }

        self.state = PlayerState::Finished;
        tracing::debug!(
            "Timeline for device {} finished: {} delivered, {} failed",
            device_id,
            summary.delivered,
            summary.failed
        );

        Ok(summary)
    }
}
