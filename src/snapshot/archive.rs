//! Snapshot source backed by a listing stream.

use super::{SnapshotSource, DEFAULT_BASE_PATH};
use crate::codec::{is_eol, TokenReader, DIRECTORY_KEY, START_KEY};
use crate::error::SnapshotError;
use crate::record::FileRecord;
use crate::types::{Checksum, Timestamp};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Parses fingerprint records out of a listing
///
/// Header comments are applied as they are met: the ones before the first
/// data line during construction, later ones while reading.
pub struct ArchiveSource<R> {
    reader: TokenReader<R>,
    base_path: String,
    start_time: Timestamp,
}

impl ArchiveSource<BufReader<File>> {
    /// Open a listing file.
    pub fn open(path: &Path) -> Result<Self, SnapshotError> {
        let file = File::open(path).map_err(|e| SnapshotError::io(path, e))?;
        ArchiveSource::from_reader(TokenReader::with_origin(BufReader::new(file), path))
    }
}

impl<R: BufRead> ArchiveSource<R> {
    pub fn new(input: R) -> Result<Self, SnapshotError> {
        Self::from_reader(TokenReader::new(input))
    }

    pub fn from_reader(reader: TokenReader<R>) -> Result<Self, SnapshotError> {
        let mut source = ArchiveSource {
            reader,
            base_path: DEFAULT_BASE_PATH.to_string(),
            start_time: Timestamp::EPOCH,
        };
        source.skip_non_data()?;
        Ok(source)
    }

    /// Skip blank lines and comments, applying recognized headers.
    fn skip_non_data(&mut self) -> Result<(), SnapshotError> {
        loop {
            self.reader.skip_whitespace()?;
            match self.reader.next_char()? {
                Some('#') => self.read_comment()?,
                Some(c) if is_eol(c) => {}
                Some(c) => {
                    self.reader.unread(c);
                    return Ok(());
                }
                None => return Ok(()),
            }
        }
    }

    fn read_comment(&mut self) -> Result<(), SnapshotError> {
        let keyword = self.reader.read_word()?;
        if keyword.eq_ignore_ascii_case(DIRECTORY_KEY) {
            self.base_path = self.reader.read_path()?;
            debug!(base_path = %self.base_path, "Listing directory header");
        } else if keyword.eq_ignore_ascii_case(START_KEY) {
            self.start_time = self.reader.read_date()?;
            debug!(start_time = %self.start_time, "Listing start header");
        }
        self.reader.skip_line()
    }

    fn read_record(&mut self) -> Result<FileRecord, SnapshotError> {
        let checksum = if self.opens_with_size()? {
            Checksum::default()
        } else {
            self.reader.read_hex()?
        };
        let size = self.reader.read_size()?;
        let modified_at = self.reader.read_date()?;
        let path = self.reader.read_path()?;
        Ok(FileRecord::new(checksum, size, modified_at, &path))
    }

    /// An empty checksum leaves the line opening with the size, which may
    /// itself look like hex. A date right behind it settles the question.
    fn opens_with_size(&mut self) -> Result<bool, SnapshotError> {
        let words = self.reader.peek_words(2)?;
        Ok(matches!(
            words.as_slice(),
            [size, date] if size.parse::<u64>().is_ok() && Timestamp::parse_listing(date).is_some()
        ))
    }
}

impl<R: BufRead> SnapshotSource for ArchiveSource<R> {
    fn dequeue(&mut self) -> Result<Option<FileRecord>, SnapshotError> {
        self.skip_non_data()?;
        if self.reader.peek()?.is_none() {
            return Ok(None);
        }
        self.read_record().map(Some)
    }

    fn is_empty(&mut self) -> Result<bool, SnapshotError> {
        self.skip_non_data()?;
        Ok(self.reader.peek()?.is_none())
    }

    fn base_path(&self) -> &str {
        &self.base_path
    }

    fn start_time(&self) -> Timestamp {
        self.start_time
    }
}
