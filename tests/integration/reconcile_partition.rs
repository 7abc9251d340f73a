use csum::snapshot::MemorySource;
use csum::{FileRecord, Reconciler, Timestamp};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn snapshot_strategy() -> impl Strategy<Value = BTreeMap<String, u8>> {
    // Few names and few checksums so that overlaps and moves are common.
    prop::collection::btree_map("[a-f]{1,2}", 0u8..4, 0..10)
}

fn records(snapshot: &BTreeMap<String, u8>) -> Vec<FileRecord> {
    snapshot
        .iter()
        .map(|(path, checksum)| FileRecord::new(vec![*checksum], 1, Timestamp::from_millis(0), path))
        .collect()
}

fn reconcile(old: &BTreeMap<String, u8>, new: &BTreeMap<String, u8>) -> Reconciler {
    Reconciler::new(
        &mut MemorySource::new(records(old)),
        &mut MemorySource::new(records(new)),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn every_record_lands_in_exactly_one_category(
        old in snapshot_strategy(),
        new in snapshot_strategy(),
    ) {
        let result = reconcile(&old, &new);

        let mut old_paths: Vec<String> = Vec::new();
        let mut new_paths: Vec<String> = Vec::new();
        for r in result.unchanged() {
            old_paths.push(r.path().to_string());
            new_paths.push(r.path().to_string());
        }
        for c in result.changed() {
            old_paths.push(c.path().to_string());
            new_paths.push(c.path().to_string());
        }
        for r in result.removed() {
            old_paths.push(r.path().to_string());
        }
        for r in result.added() {
            new_paths.push(r.path().to_string());
        }
        for m in result.moved_or_renamed() {
            old_paths.push(m.old_path().to_string());
            new_paths.push(m.new_path().to_string());
        }
        old_paths.sort();
        new_paths.sort();

        let expected_old: Vec<String> = old.keys().map(|p| format!("./{}", p)).collect();
        let expected_new: Vec<String> = new.keys().map(|p| format!("./{}", p)).collect();
        prop_assert_eq!(old_paths, expected_old);
        prop_assert_eq!(new_paths, expected_new);
    }

    #[test]
    fn moves_pair_unique_checksums(
        old in snapshot_strategy(),
        new in snapshot_strategy(),
    ) {
        let result = reconcile(&old, &new);

        let mut new_ends = BTreeSet::new();
        for m in result.moved_or_renamed() {
            prop_assert!(new_ends.insert(m.new_path().to_string()));
            prop_assert!(!new.contains_key(&m.old_path()[2..]));
            prop_assert!(!old.contains_key(&m.new_path()[2..]));
            // A move never leaves an added record with the same checksum behind.
            prop_assert!(result.added().iter().all(|a| a.checksum() != m.checksum()));
        }
    }

    #[test]
    fn identical_snapshots_are_all_unchanged(old in snapshot_strategy()) {
        let result = reconcile(&old, &old);
        prop_assert!(result.is_identical());
        prop_assert_eq!(result.unchanged().len(), old.len());
    }
}
