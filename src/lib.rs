//! CSum: Directory Fingerprinting and Reconciliation
//!
//! Captures a directory tree as a listing of per-file fingerprints (checksum,
//! size, modification time, path) and reconciles two such snapshots into
//! unchanged, changed, added, removed, and moved/renamed files.

pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod record;
pub mod report;
pub mod snapshot;
pub mod tooling;
pub mod tree;
pub mod types;

pub use error::{ApiError, SnapshotError};
pub use reconcile::Reconciler;
pub use record::{ChangedRecord, FileRecord, MovedRecord};
pub use snapshot::{ArchiveSource, MemorySource, SnapshotSource};
pub use tree::WalkSource;
pub use types::{Checksum, Timestamp};
