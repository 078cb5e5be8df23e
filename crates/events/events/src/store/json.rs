use super::trait_def::*;
use crate::{EventRecord, LoadError, LoadResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// RecordSource backed by a JSON file
///
/// The file must contain a single JSON array of record objects.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn load(&self) -> LoadResult<Vec<EventRecord>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })?;

        let records = parse_records(&content)?;
        tracing::debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
