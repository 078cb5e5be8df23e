use super::trait_def::*;
use crate::{EventRecord, LoadResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of RecordSource
///
/// Holds records in memory. Useful for testing and for embedding the replay
/// engine in another program.
pub struct MemoryRecordSource {
    records: Arc<RwLock<Vec<EventRecord>>>,
}

impl MemoryRecordSource {
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn from_records(records: Vec<EventRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Append a record to the end of the batch
    pub async fn push(&self, record: EventRecord) {
        self.records.write().await.push(record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for MemoryRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSource for MemoryRecordSource {
    async fn load(&self) -> LoadResult<Vec<EventRecord>> {
        Ok(self.records.read().await.clone())
    }

    fn describe(&self) -> String {
        "in-memory records".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_source_load() {
        let source = MemoryRecordSource::new();
        assert!(source.is_empty().await);

        source
            .push(EventRecord::default().with_field("device_id", "a"))
            .await;
        source
            .push(EventRecord::default().with_field("device_id", "b"))
            .await;

        let records = source.load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("device_id"), Some(&json!("b")));

        // Loading does not drain the source
        assert_eq!(source.len().await, 2);
    }
}
