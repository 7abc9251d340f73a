//! Filesystem walker
//!
//! Produces one fingerprint per regular file under a root directory,
//! depth first with siblings in file-name order. Files are hashed lazily, one
//! per `dequeue`.

use super::hasher::{hash_file, ChecksumAlgorithm};
use crate::error::SnapshotError;
use crate::record::FileRecord;
use crate::snapshot::SnapshotSource;
use crate::types::Timestamp;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Walker configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// List Finder metadata files (`.DS_Store`, `._*`) too
    #[serde(default)]
    pub include_special_files: bool,

    /// Descend through symbolic links instead of skipping them
    #[serde(default)]
    pub follow_symlinks: bool,

    #[serde(default)]
    pub algorithm: ChecksumAlgorithm,
}

/// Finder bookkeeping files that are not part of the tree's content.
pub fn is_special_file(name: &str) -> bool {
    name == ".DS_Store" || name.starts_with("._")
}

/// Snapshot source over a live directory tree
pub struct WalkSource {
    root: PathBuf,
    entries: Option<walkdir::IntoIter>,
    pending: Option<DirEntry>,
    config: WalkerConfig,
    base_path: String,
    start_time: Timestamp,
}

impl WalkSource {
    /// Walk `root`. A root that is missing or not a directory yields nothing.
    pub fn new(root: &Path, config: &WalkerConfig) -> Self {
        let start_time = Timestamp::now();
        let root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        let entries = if root.is_dir() {
            Some(
                WalkDir::new(&root)
                    .min_depth(1)
                    .follow_links(config.follow_symlinks)
                    .sort_by_file_name()
                    .into_iter(),
            )
        } else {
            warn!(root = %root.display(), "Walk root is not a directory; listing nothing");
            None
        };
        debug!(root = %root.display(), algorithm = %config.algorithm, "Walk started");
        WalkSource {
            base_path: root.display().to_string(),
            root,
            entries,
            pending: None,
            config: config.clone(),
            start_time,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Advance to the next file worth fingerprinting, unless one is already pending.
    fn find_next(&mut self) -> Result<(), SnapshotError> {
        if self.pending.is_some() {
            return Ok(());
        }
        let Some(entries) = self.entries.as_mut() else {
            return Ok(());
        };
        for entry in entries.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    if err.io_error().map(|e| e.kind()) == Some(ErrorKind::NotFound) {
                        warn!(path = %path.display(), "Skipping entry that vanished during the walk");
                        continue;
                    }
                    return Err(SnapshotError::io(path, err.into()));
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if !self.config.include_special_files
                && is_special_file(&entry.file_name().to_string_lossy())
            {
                debug!(path = %entry.path().display(), "Skipping special file");
                continue;
            }
            self.pending = Some(entry);
            break;
        }
        Ok(())
    }

    /// Fingerprint one entry; `None` when it disappeared before it could be read.
    fn fingerprint(&self, entry: &DirEntry) -> Result<Option<FileRecord>, SnapshotError> {
        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) if err.io_error().map(|e| e.kind()) == Some(ErrorKind::NotFound) => {
                warn!(path = %path.display(), "Skipping nonexistent file");
                return Ok(None);
            }
            Err(err) => return Err(SnapshotError::io(path, err.into())),
        };
        let modified = metadata.modified().map_err(|e| SnapshotError::io(path, e))?;
        let checksum = match hash_file(self.config.algorithm, path) {
            Ok(checksum) => checksum,
            Err(SnapshotError::SourceIo { source, .. }) if source.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "Skipping nonexistent file");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        Ok(Some(FileRecord::new(
            checksum,
            metadata.len(),
            Timestamp::from_system_time(modified),
            &listing_path(relative),
        )))
    }
}

/// Join path components with `/` whatever the platform separator is.
fn listing_path(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => {
                let text = name.to_string_lossy();
                if name.to_str().is_none() {
                    warn!(name = %text, "File name is not valid UTF-8; listing it lossily");
                }
                Some(text.into_owned())
            }
            _ => None,
        })
        .collect();
    parts.join("/")
}

impl SnapshotSource for WalkSource {
    fn dequeue(&mut self) -> Result<Option<FileRecord>, SnapshotError> {
        loop {
            self.find_next()?;
            let Some(entry) = self.pending.take() else {
                return Ok(None);
            };
            if let Some(record) = self.fingerprint(&entry)? {
                return Ok(Some(record));
            }
        }
    }

    fn is_empty(&mut self) -> Result<bool, SnapshotError> {
        self.find_next()?;
        Ok(self.pending.is_none())
    }

    fn base_path(&self) -> &str {
        &self.base_path
    }

    fn start_time(&self) -> Timestamp {
        self.start_time
    }
}
