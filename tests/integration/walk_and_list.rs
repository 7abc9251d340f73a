use csum::codec::SnapshotWriter;
use csum::snapshot::{ArchiveSource, SnapshotSource};
use csum::tree::{ChecksumAlgorithm, WalkSource, WalkerConfig};
use csum::{FileRecord, Reconciler};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;

fn build_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("docs/old")).unwrap();
    fs::write(root.join("readme.md"), "hello").unwrap();
    fs::write(root.join("docs/guide.txt"), "guide").unwrap();
    fs::write(root.join("docs/old/notes \"quoted\".txt"), "notes").unwrap();
    fs::write(root.join("docs/.DS_Store"), "finder").unwrap();
    dir
}

fn drain(source: &mut dyn SnapshotSource) -> Vec<FileRecord> {
    let mut records = Vec::new();
    while let Some(record) = source.dequeue().unwrap() {
        records.push(record);
    }
    records
}

#[test]
fn walked_listing_parses_back_to_the_same_records() {
    let dir = build_tree();
    let config = WalkerConfig::default();

    let mut walked = WalkSource::new(dir.path(), &config);
    let expected = drain(&mut walked);
    assert_eq!(
        expected.iter().map(|r| r.path()).collect::<Vec<_>>(),
        vec![
            "./docs/guide.txt",
            "./docs/old/notes \"quoted\".txt",
            "./readme.md"
        ]
    );

    let mut walked = WalkSource::new(dir.path(), &config);
    let mut writer = SnapshotWriter::new(Vec::new());
    let count = writer.write_source(&mut walked).unwrap();
    assert_eq!(count, 3);

    let mut archive = ArchiveSource::new(Cursor::new(writer.into_inner())).unwrap();
    assert_eq!(archive.base_path(), walked.base_path());
    assert_eq!(drain(&mut archive), expected);
}

#[test]
fn walking_twice_reconciles_to_unchanged() {
    let dir = build_tree();
    let config = WalkerConfig {
        algorithm: ChecksumAlgorithm::Blake3,
        ..WalkerConfig::default()
    };
    let mut first = WalkSource::new(dir.path(), &config);
    let mut second = WalkSource::new(dir.path(), &config);
    let result = Reconciler::new(&mut first, &mut second).unwrap();
    assert!(result.is_identical());
    assert_eq!(result.unchanged().len(), 3);
}

#[test]
fn edits_moves_and_deletions_between_walks() {
    let dir = build_tree();
    let config = WalkerConfig::default();
    let mut before = WalkSource::new(dir.path(), &config);
    let mut writer = SnapshotWriter::new(Vec::new());
    writer.write_source(&mut before).unwrap();
    let listing = writer.into_inner();

    let root = dir.path();
    fs::write(root.join("readme.md"), "hello, again").unwrap();
    fs::rename(root.join("docs/guide.txt"), root.join("guide.txt")).unwrap();
    fs::remove_file(root.join("docs/old/notes \"quoted\".txt")).unwrap();
    fs::write(root.join("docs/new.txt"), "new").unwrap();

    let mut old = ArchiveSource::new(Cursor::new(listing)).unwrap();
    let mut new = WalkSource::new(root, &config);
    let result = Reconciler::new(&mut old, &mut new).unwrap();

    let changed: Vec<&str> = result.changed().iter().map(|c| c.path()).collect();
    assert_eq!(changed, vec!["./readme.md"]);
    let moved: Vec<(&str, &str)> = result
        .moved_or_renamed()
        .iter()
        .map(|m| (m.old_path(), m.new_path()))
        .collect();
    assert_eq!(moved, vec![("./docs/guide.txt", "./guide.txt")]);
    let removed: Vec<&str> = result.removed().iter().map(|r| r.path()).collect();
    assert_eq!(removed, vec!["./docs/old/notes \"quoted\".txt"]);
    let added: Vec<&str> = result.added().iter().map(|r| r.path()).collect();
    assert_eq!(added, vec!["./docs/new.txt"]);
    assert!(result.unchanged().is_empty());
}
