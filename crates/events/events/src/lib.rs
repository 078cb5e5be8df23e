//! # Device Replay Events
//!
//! Core of the device event replayer providing:
//! - Event records with device identifier and timestamp resolution
//! - Record sources (JSON file, in-memory)
//! - Partitioning into per-device timelines
//! - Concurrent timeline playback with speed control
//!
//! ## Example
//!
//! ```rust,ignore
//! use device_replay_events::{JsonFileSource, ReplayCoordinator, ReplaySpeed};
//!
//! let coordinator = ReplayCoordinator::new(sink, ReplaySpeed::from_options(10.0, false)?);
//! let summary = coordinator.replay(&JsonFileSource::new("events.json")).await?;
//! println!("{} of {} events delivered", summary.sent, summary.total_events);
//! ```

mod event;
mod partition;
mod sink;
mod error;
pub mod store;
pub mod replay;

pub use event::{
    EventRecord, ResolvedTimestamp, TimestampSource, parse_date, DATE_FIELD, DATE_FORMAT,
    DEVICE_ID_FIELDS, TIMESTAMP_FIELD,
};
pub use partition::{DevicePartitioner, DeviceTimeline, Partition, TimedEvent};
pub use sink::{DeliveryFailure, DeliveryResult, DeliverySink, SharedSink};
pub use error::{LoadError, LoadResult, RecordIssue, ReplayError, ReplayResult};
pub use store::{JsonFileSource, MemoryRecordSource, RecordSource, parse_records};
pub use replay::{
    MemoryReporter, PlayerState, PlayerSummary, ReplayCoordinator, ReplayProgress,
    ReplayReporter, ReplaySession, ReplaySpeed, ReplaySummary, SentCounter, TimelinePlayer,
    TracingReporter,
};
