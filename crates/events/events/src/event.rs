//! Event records and timestamp resolution.

use std::borrow::Cow;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names accepted as the device identifier, in lookup order.
pub const DEVICE_ID_FIELDS: [&str; 2] = ["device_id", "Device ID"];

/// Numeric epoch-seconds timestamp field.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Textual timestamp field.
pub const DATE_FIELD: &str = "date";

/// Pattern of the textual timestamp (`YYYY-MM-DD HH:MM:SS.ffffff`).
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A single recorded device event.
///
/// The record is an opaque JSON object. Only the device identifier and the
/// timestamp are interpreted; every other field is passed through untouched
/// when the record is delivered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventRecord {
    fields: Map<String, Value>,
}

impl EventRecord {
    /// Creates a record from a JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Creates a record from a JSON value, if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self::new(fields)),
            _ => None,
        }
    }

    /// Sets a field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns all fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the record and returns its fields.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Returns the device identifier, trying each alias in turn.
    ///
    /// Empty strings and non-scalar values do not count as an identifier.
    /// Numeric identifiers are rendered with their JSON text.
    pub fn device_id(&self) -> Option<Cow<'_, str>> {
        DEVICE_ID_FIELDS
            .iter()
            .find_map(|field| match self.fields.get(*field)? {
                Value::String(s) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
                Value::Number(n) => Some(Cow::Owned(n.to_string())),
                _ => None,
            })
    }

    /// Resolves the record's timestamp in epoch seconds.
    ///
    /// A numeric `timestamp` wins over a `date` string. If neither is usable
    /// the result is epoch zero with [`TimestampSource::Unresolved`].
    pub fn resolve_timestamp(&self) -> ResolvedTimestamp {
        if let Some(seconds) = self.fields.get(TIMESTAMP_FIELD).and_then(Value::as_f64) {
            return ResolvedTimestamp::new(seconds, TimestampSource::Numeric);
        }

        if let Some(seconds) = self
            .fields
            .get(DATE_FIELD)
            .and_then(Value::as_str)
            .and_then(parse_date)
        {
            return ResolvedTimestamp::new(seconds, TimestampSource::Date);
        }

        ResolvedTimestamp::unresolved()
    }
}

impl From<Map<String, Value>> for EventRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Where a resolved timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    /// The numeric `timestamp` field.
    Numeric,
    /// The textual `date` field.
    Date,
    /// Neither field was usable; the value defaulted to zero.
    Unresolved,
}

/// A timestamp in epoch seconds together with its origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTimestamp {
    /// Seconds since the Unix epoch.
    pub seconds: f64,
    /// Origin of the value.
    pub source: TimestampSource,
}

impl ResolvedTimestamp {
    fn new(seconds: f64, source: TimestampSource) -> Self {
        Self { seconds, source }
    }

    /// The epoch-zero default for records without a usable timestamp.
    pub fn unresolved() -> Self {
        Self::new(0.0, TimestampSource::Unresolved)
    }

    /// Returns true if the timestamp defaulted to zero.
    pub fn is_unresolved(&self) -> bool {
        self.source == TimestampSource::Unresolved
    }
}

/// Parses a `YYYY-MM-DD HH:MM:SS.ffffff` string into epoch seconds.
///
/// The string carries no zone, so it is read as local time. Inside a DST gap
/// the wall-clock time does not exist locally and is read as UTC instead.
pub fn parse_date(s: &str) -> Option<f64> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), DATE_FORMAT).ok()?;
    let instant: DateTime<Utc> = match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => naive.and_utc(),
    };
    Some(instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_micros()) / 1_000_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> EventRecord {
        EventRecord::from_value(value).unwrap()
    }

    #[test]
    fn test_device_id_primary_alias() {
        let r = record(json!({"device_id": "watch-1", "Device ID": "other"}));
        assert_eq!(r.device_id().as_deref(), Some("watch-1"));
    }

    #[test]
    fn test_device_id_fallback_alias() {
        let r = record(json!({"Device ID": "watch-2"}));
        assert_eq!(r.device_id().as_deref(), Some("watch-2"));

        let r = record(json!({"device_id": "", "Device ID": "watch-3"}));
        assert_eq!(r.device_id().as_deref(), Some("watch-3"));
    }

    #[test]
    fn test_device_id_numeric() {
        let r = record(json!({"device_id": 42}));
        assert_eq!(r.device_id().as_deref(), Some("42"));
    }

    #[test]
    fn test_device_id_missing() {
        assert!(record(json!({"heart_rate": 80})).device_id().is_none());
        assert!(record(json!({"device_id": null})).device_id().is_none());
        assert!(record(json!({"device_id": ["a"]})).device_id().is_none());
    }

    #[test]
    fn test_numeric_timestamp() {
        let ts = record(json!({"timestamp": 1700000000.25})).resolve_timestamp();
        assert_eq!(ts.seconds, 1700000000.25);
        assert_eq!(ts.source, TimestampSource::Numeric);

        let ts = record(json!({"timestamp": 12})).resolve_timestamp();
        assert_eq!(ts.seconds, 12.0);
    }

    #[test]
    fn test_numeric_timestamp_wins_over_date() {
        let ts = record(json!({"timestamp": 5.0, "date": "2024-01-01 00:00:00.000000"}))
            .resolve_timestamp();
        assert_eq!(ts.source, TimestampSource::Numeric);
        assert_eq!(ts.seconds, 5.0);
    }

    #[test]
    fn test_date_timestamp_deltas() {
        let a = record(json!({"date": "2024-03-10 12:00:00.000000"})).resolve_timestamp();
        let b = record(json!({"date": "2024-03-10 12:00:01.500000"})).resolve_timestamp();
        assert_eq!(a.source, TimestampSource::Date);
        assert!((b.seconds - a.seconds - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_mistyped_timestamp_falls_back_to_date() {
        let ts = record(json!({"timestamp": "soon", "date": "2024-01-01 00:00:00.000001"}))
            .resolve_timestamp();
        assert_eq!(ts.source, TimestampSource::Date);
    }

    #[test]
    fn test_unresolved_timestamp() {
        let ts = record(json!({"date": "yesterday"})).resolve_timestamp();
        assert!(ts.is_unresolved());
        assert_eq!(ts.seconds, 0.0);

        assert!(record(json!({})).resolve_timestamp().is_unresolved());
    }

    #[test]
    fn test_record_serializes_transparently() {
        let value = json!({"device_id": "d", "timestamp": 1.0, "steps": 10});
        let r = record(value.clone());
        assert_eq!(serde_json::to_value(&r).unwrap(), value);
    }
}
