//! In-memory snapshot source.

use super::{SnapshotSource, DEFAULT_BASE_PATH};
use crate::error::SnapshotError;
use crate::record::FileRecord;
use crate::types::Timestamp;
use std::collections::VecDeque;

/// Yields a fixed list of records in order
#[derive(Debug, Clone)]
pub struct MemorySource {
    records: VecDeque<FileRecord>,
    base_path: String,
    start_time: Timestamp,
}

impl MemorySource {
    /// Records with the default base path `/` and an epoch start time.
    pub fn new(records: impl IntoIterator<Item = FileRecord>) -> Self {
        Self::with_metadata(DEFAULT_BASE_PATH, Timestamp::EPOCH, records)
    }

    pub fn with_metadata(
        base_path: &str,
        start_time: Timestamp,
        records: impl IntoIterator<Item = FileRecord>,
    ) -> Self {
        MemorySource {
            records: records.into_iter().collect(),
            base_path: base_path.to_string(),
            start_time,
        }
    }

    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl FromIterator<FileRecord> for MemorySource {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        MemorySource::new(iter)
    }
}

impl SnapshotSource for MemorySource {
    fn dequeue(&mut self) -> Result<Option<FileRecord>, SnapshotError> {
        Ok(self.records.pop_front())
    }

    fn is_empty(&mut self) -> Result<bool, SnapshotError> {
        Ok(self.records.is_empty())
    }

    fn base_path(&self) -> &str {
        &self.base_path
    }

    fn start_time(&self) -> Timestamp {
        self.start_time
    }
}
