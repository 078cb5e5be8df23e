//! # Device Replay Delivery
//!
//! HTTP delivery sink for the device replayer:
//! - POSTs each replayed event as a JSON body
//! - Treats `200 OK` as the only success
//! - One pooled client shared by every device timeline
//!
//! ## Example
//!
//! ```rust,ignore
//! use device_replay_delivery::{HttpSink, HttpSinkConfig};
//!
//! let sink = HttpSink::new(
//!     HttpSinkConfig::new("http://localhost:62333/stream").header("X-Source", "replay"),
//! )?;
//! ```

mod config;
mod error;
mod http;

pub use config::{HttpSinkConfig, DEFAULT_SERVER_URL};
pub use error::{DeliveryError, SinkResult};
pub use http::HttpSink;
