//! Event Replay Engine
//!
//! Replays device timelines against a delivery sink:
//! - One concurrent player per device, each preserving its own cadence
//! - Replay at different speeds (fast, realtime, custom)
//! - Shared sent counter and progress reporting
//! - Failed deliveries are reported, never retried

mod engine;
mod player;
mod report;
mod session;
mod speed;

pub use engine::{ReplayCoordinator, ReplaySummary};
pub use player::{PlayerState, PlayerSummary, TimelinePlayer};
pub use report::{MemoryReporter, ReplayProgress, ReplayReporter, TracingReporter};
pub use session::{ReplaySession, SentCounter};
pub use speed::ReplaySpeed;
