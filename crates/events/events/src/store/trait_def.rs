use crate::{EventRecord, LoadError, LoadResult};
use async_trait::async_trait;
use serde_json::Value;

/// Trait for sources of recorded events
///
/// A source yields the full batch of records in input order. It performs no
/// filtering: records without a device identifier or timestamp are returned
/// as-is and dealt with by the partitioner.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load every record in the source
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the source cannot be read or is not a
    /// collection of records.
    async fn load(&self) -> LoadResult<Vec<EventRecord>>;

    /// Human-readable description used in logs
    fn describe(&self) -> String {
        "records".to_string()
    }
}

/// Parse a JSON document into records
///
/// The document must be an array whose elements are all objects.
pub fn parse_records(input: &str) -> LoadResult<Vec<EventRecord>> {
    let value: Value = serde_json::from_str(input)?;
    records_from_value(value)
}

/// Convert an already parsed JSON document into records
pub fn records_from_value(value: Value) -> LoadResult<Vec<EventRecord>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(LoadError::NotACollection(format!(
                "expected an array, found {}",
                json_kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let kind = json_kind(&item);
            EventRecord::from_value(item).ok_or_else(|| {
                LoadError::NotACollection(format!("element {index} is {kind}, not an object"))
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
