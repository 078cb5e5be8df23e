//! Event Store Loader - Sources of recorded events
//!
//! Provides the input side of a replay:
//! - A `RecordSource` trait returning the full batch in input order
//! - A JSON file source
//! - An in-memory source for tests and embedding

mod trait_def;
mod memory;
mod json;

pub use trait_def::{RecordSource, parse_records, records_from_value};
pub use memory::MemoryRecordSource;
pub use json::JsonFileSource;
