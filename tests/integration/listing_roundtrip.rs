use csum::codec::SnapshotWriter;
use csum::snapshot::{ArchiveSource, MemorySource, SnapshotSource};
use csum::{FileRecord, Timestamp};
use proptest::prelude::*;
use std::io::Cursor;

// Last millisecond of 9999-12-31
const MAX_LISTED_MILLIS: i64 = 253_402_300_799_999;

fn record_strategy() -> impl Strategy<Value = FileRecord> {
    (
        prop::collection::vec(any::<u8>(), 0..33),
        any::<u64>(),
        0i64..=MAX_LISTED_MILLIS,
        "[a-zA-Z0-9 ./\"\\\\\n\r\té日本-]{0,24}",
    )
        .prop_map(|(checksum, size, millis, path)| {
            FileRecord::new(checksum, size, Timestamp::from_millis(millis), &path)
        })
}

fn write_listing(records: &[FileRecord], base_path: &str, start: Timestamp) -> Vec<u8> {
    let mut source = MemorySource::with_metadata(base_path, start, records.iter().cloned());
    let mut writer = SnapshotWriter::new(Vec::new());
    writer.write_source(&mut source).unwrap();
    writer.into_inner()
}

fn read_listing(bytes: Vec<u8>) -> (ArchiveSource<Cursor<Vec<u8>>>, Vec<FileRecord>) {
    let mut source = ArchiveSource::new(Cursor::new(bytes)).unwrap();
    let mut records = Vec::new();
    while let Some(record) = source.dequeue().unwrap() {
        records.push(record);
    }
    (source, records)
}

proptest! {
    #[test]
    fn listing_round_trips(records in prop::collection::vec(record_strategy(), 0..12)) {
        let bytes = write_listing(&records, "/base", Timestamp::from_millis(1_313_227_297_123));
        let (_, parsed) = read_listing(bytes);
        prop_assert_eq!(parsed, records);
    }

    #[test]
    fn header_round_trips(base in "/[a-z \"\\\\]{0,16}", millis in 0i64..=MAX_LISTED_MILLIS) {
        let bytes = write_listing(&[], &base, Timestamp::from_millis(millis));
        let (source, parsed) = read_listing(bytes);
        prop_assert!(parsed.is_empty());
        prop_assert_eq!(source.base_path(), base.as_str());
        prop_assert_eq!(source.start_time().as_millis(), millis);
    }
}

#[test]
fn listing_text_layout() {
    let record = FileRecord::new(
        vec![0xabu8, 0xcd],
        12,
        Timestamp::from_millis(0),
        "dir/a \"b\"",
    );
    let bytes = write_listing(&[record], "/root", Timestamp::from_millis(0));
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(
        text,
        "# CSum\n# Version 1\n# Directory \"/root\"\n# Start 1970.01.01.00.00.00.000\n\
         abcd\t12\t1970.01.01.00.00.00.000\t\"./dir/a \\\"b\\\"\"\n"
    );
}

#[test]
fn unquoted_paths_from_hand_written_listings() {
    let text = "0102\t3\t2001.02.03.04.05.06.007\tplain/path.txt\n\n# trailing comment\n";
    let (_, parsed) = read_listing(text.as_bytes().to_vec());
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].path(), "./plain/path.txt");
    assert_eq!(parsed[0].checksum().as_bytes(), &[0x01, 0x02]);
}
