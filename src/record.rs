//! Fingerprint records and the derived reconciliation variants.
//!
//! A [`FileRecord`] is one file's checksum, size, modification time and
//! listing path. [`ChangedRecord`] and [`MovedRecord`] wrap the old side's
//! record together with the one field that differs on the new side.

use crate::types::{Checksum, Timestamp};

/// Prefix every listing path carries.
pub const PATH_PREFIX: &str = "./";

/// Prepend `./` unless the path already starts with it.
pub fn normalize_path(path: &str) -> String {
    if path.starts_with(PATH_PREFIX) {
        path.to_string()
    } else {
        format!("{}{}", PATH_PREFIX, path)
    }
}

/// Fingerprint of a single file
///
/// Ordering is by path first, so ordered sets of records list in path order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileRecord {
    path: String,
    checksum: Checksum,
    size: u64,
    modified_at: Timestamp,
}

impl FileRecord {
    pub fn new(
        checksum: impl Into<Checksum>,
        size: u64,
        modified_at: Timestamp,
        path: &str,
    ) -> Self {
        FileRecord {
            path: normalize_path(path),
            checksum: checksum.into(),
            size,
            modified_at,
        }
    }

    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified_at(&self) -> Timestamp {
        self.modified_at
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// True when both records carry byte-identical checksums.
    pub fn content_eq(&self, other: &FileRecord) -> bool {
        self.checksum == other.checksum
    }
}

/// A path whose content changed between snapshots
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChangedRecord {
    record: FileRecord,
    new_checksum: Checksum,
}

impl ChangedRecord {
    /// Pair an old and new record for the same path.
    ///
    /// # Panics
    ///
    /// Panics if the two records have different paths.
    pub fn new(old: FileRecord, new: &FileRecord) -> Self {
        assert_eq!(
            old.path, new.path,
            "changed record requires both sides to share a path"
        );
        ChangedRecord {
            new_checksum: new.checksum.clone(),
            record: old,
        }
    }

    /// The old side's record.
    pub fn record(&self) -> &FileRecord {
        &self.record
    }

    pub fn path(&self) -> &str {
        self.record.path()
    }

    pub fn old_checksum(&self) -> &Checksum {
        self.record.checksum()
    }

    pub fn new_checksum(&self) -> &Checksum {
        &self.new_checksum
    }
}

/// Content that left one path and reappeared under another
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MovedRecord {
    record: FileRecord,
    new_path: String,
}

impl MovedRecord {
    /// Pair an old and new record holding the same content.
    ///
    /// # Panics
    ///
    /// Panics if the two records have different checksums.
    pub fn new(old: FileRecord, new: &FileRecord) -> Self {
        assert!(
            old.content_eq(new),
            "moved record requires both sides to share a checksum"
        );
        MovedRecord {
            new_path: new.path.clone(),
            record: old,
        }
    }

    /// The old side's record.
    pub fn record(&self) -> &FileRecord {
        &self.record
    }

    pub fn old_path(&self) -> &str {
        self.record.path()
    }

    pub fn new_path(&self) -> &str {
        &self.new_path
    }

    pub fn checksum(&self) -> &Checksum {
        self.record.checksum()
    }
}
