//! Snapshot Sources
//!
//! A snapshot source yields fingerprint records one at a time, from a live
//! directory walk ([`crate::tree::walker::WalkSource`]), a parsed listing
//! ([`ArchiveSource`]), or records already in memory ([`MemorySource`]).
//! Reconciliation and the listing writer only ever see this trait.

pub mod archive;
pub mod memory;

pub use archive::ArchiveSource;
pub use memory::MemorySource;

use crate::error::SnapshotError;
use crate::record::FileRecord;
use crate::types::Timestamp;

/// Base path reported when a source has none.
pub const DEFAULT_BASE_PATH: &str = "/";

/// Producer of fingerprint records
pub trait SnapshotSource {
    /// Take the next record, `None` once the source is exhausted.
    fn dequeue(&mut self) -> Result<Option<FileRecord>, SnapshotError>;

    /// True when no record remains. Does not consume anything.
    fn is_empty(&mut self) -> Result<bool, SnapshotError>;

    /// Root the listed paths are relative to.
    fn base_path(&self) -> &str;

    /// When the capture started.
    fn start_time(&self) -> Timestamp;
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for Box<S> {
    fn dequeue(&mut self) -> Result<Option<FileRecord>, SnapshotError> {
        (**self).dequeue()
    }

    fn is_empty(&mut self) -> Result<bool, SnapshotError> {
        (**self).is_empty()
    }

    fn base_path(&self) -> &str {
        (**self).base_path()
    }

    fn start_time(&self) -> Timestamp {
        (**self).start_time()
    }
}
