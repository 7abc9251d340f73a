//! Reconciliation
//!
//! Classifies every record of an old and a new snapshot as unchanged,
//! changed, added, removed, or moved/renamed. Old records are keyed by path;
//! each new record either claims its old counterpart or is added. Whatever
//! old records go unclaimed are removed. A removed record whose checksum
//! matches exactly one added record is then reported as moved instead.
//!
//! A file that was both edited and relocated cannot be matched by checksum
//! and shows up as one removal plus one addition.

use crate::error::{Side, SnapshotError};
use crate::record::{ChangedRecord, FileRecord, MovedRecord};
use crate::snapshot::SnapshotSource;
use crate::types::Checksum;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

/// The five-way classification of two snapshots
///
/// Fully computed by [`Reconciler::new`]; read-only afterwards. Every set
/// iterates in path order.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    unchanged: BTreeSet<FileRecord>,
    changed: BTreeSet<ChangedRecord>,
    added: BTreeSet<FileRecord>,
    removed: BTreeSet<FileRecord>,
    moved_or_renamed: BTreeSet<MovedRecord>,
}

impl Reconciler {
    /// Drain both sources and classify their records.
    ///
    /// Fails on the first source error or duplicate path; nothing partial is
    /// returned.
    pub fn new<O, N>(old: &mut O, new: &mut N) -> Result<Self, SnapshotError>
    where
        O: SnapshotSource + ?Sized,
        N: SnapshotSource + ?Sized,
    {
        let mut old_by_path = drain_by_path(old)?;
        let old_count = old_by_path.len();
        debug!(records = old_count, base_path = old.base_path(), "Old snapshot drained");

        let mut result = Reconciler::default();
        let mut seen_new = HashSet::new();
        let mut added_by_checksum: HashMap<Checksum, Vec<FileRecord>> = HashMap::new();

        while !new.is_empty()? {
            let Some(record) = new.dequeue()? else {
                break;
            };
            if !seen_new.insert(record.path().to_string()) {
                return Err(SnapshotError::DuplicatePath {
                    side: Side::New,
                    path: record.path().to_string(),
                });
            }
            match old_by_path.remove(record.path()) {
                None => added_by_checksum
                    .entry(record.checksum().clone())
                    .or_default()
                    .push(record),
                Some(previous) if previous.content_eq(&record) => {
                    result.unchanged.insert(record);
                }
                Some(previous) => {
                    result.changed.insert(ChangedRecord::new(previous, &record));
                }
            }
        }
        debug!(records = seen_new.len(), base_path = new.base_path(), "New snapshot drained");

        let removed_candidates: BTreeSet<FileRecord> = old_by_path.into_values().collect();
        for removed in removed_candidates {
            match added_by_checksum.get_mut(removed.checksum()) {
                Some(bucket) if bucket.len() == 1 => {
                    if let Some(added) = bucket.pop() {
                        result
                            .moved_or_renamed
                            .insert(MovedRecord::new(removed, &added));
                    }
                }
                _ => {
                    result.removed.insert(removed);
                }
            }
        }
        result.added = added_by_checksum.into_values().flatten().collect();

        info!(
            unchanged = result.unchanged.len(),
            changed = result.changed.len(),
            added = result.added.len(),
            removed = result.removed.len(),
            moved = result.moved_or_renamed.len(),
            "Reconciliation complete"
        );
        Ok(result)
    }

    pub fn unchanged(&self) -> &BTreeSet<FileRecord> {
        &self.unchanged
    }

    pub fn changed(&self) -> &BTreeSet<ChangedRecord> {
        &self.changed
    }

    pub fn added(&self) -> &BTreeSet<FileRecord> {
        &self.added
    }

    pub fn removed(&self) -> &BTreeSet<FileRecord> {
        &self.removed
    }

    pub fn moved_or_renamed(&self) -> &BTreeSet<MovedRecord> {
        &self.moved_or_renamed
    }

    /// True when nothing differs between the two snapshots.
    pub fn is_identical(&self) -> bool {
        self.changed.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && self.moved_or_renamed.is_empty()
    }
}

fn drain_by_path<S>(source: &mut S) -> Result<HashMap<String, FileRecord>, SnapshotError>
where
    S: SnapshotSource + ?Sized,
{
    let mut by_path = HashMap::new();
    while !source.is_empty()? {
        let Some(record) = source.dequeue()? else {
            break;
        };
        if by_path.contains_key(record.path()) {
            return Err(SnapshotError::DuplicatePath {
                side: Side::Old,
                path: record.path().to_string(),
            });
        }
        by_path.insert(record.path().to_string(), record);
    }
    Ok(by_path)
}
