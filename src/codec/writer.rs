//! Listing writer: the exact inverse of [`TokenReader`](super::TokenReader).

use super::{DIRECTORY_KEY, FORMAT_VERSION, MAGIC_COMMENT, START_KEY};
use crate::error::{SnapshotError, TokenKind};
use crate::record::FileRecord;
use crate::snapshot::SnapshotSource;
use crate::types::Timestamp;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// Wrap a path in quotes, escaping `"`, `\`, newline and carriage return.
pub fn quote_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 2);
    out.push('"');
    for c in path.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

fn format_timestamp(timestamp: Timestamp) -> Result<String, SnapshotError> {
    timestamp.format_listing().ok_or_else(|| {
        SnapshotError::malformed(
            TokenKind::Date,
            format!(
                "{}ms since epoch falls outside years 0000-9999",
                timestamp.as_millis()
            ),
        )
    })
}

/// Render one record as a data line, without the line terminator.
pub fn format_record(record: &FileRecord) -> Result<String, SnapshotError> {
    Ok(format!(
        "{}\t{}\t{}\t{}",
        record.checksum().to_hex(),
        record.size(),
        format_timestamp(record.modified_at())?,
        quote_path(record.path())
    ))
}

/// Writes listings to any [`Write`] sink
pub struct SnapshotWriter<W> {
    out: W,
    target: PathBuf,
    records_written: usize,
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(out: W) -> Self {
        Self::with_target(out, "<output>")
    }

    /// `target` names the sink in I/O errors.
    pub fn with_target(out: W, target: impl Into<PathBuf>) -> Self {
        SnapshotWriter {
            out,
            target: target.into(),
            records_written: 0,
        }
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Emit the magic, version, `Directory` and `Start` header lines.
    pub fn write_header(
        &mut self,
        base_path: &str,
        start_time: Timestamp,
    ) -> Result<(), SnapshotError> {
        let header = format!(
            "# {}\n# Version {}\n# {} {}\n# {} {}\n",
            MAGIC_COMMENT,
            FORMAT_VERSION,
            DIRECTORY_KEY,
            quote_path(base_path),
            START_KEY,
            format_timestamp(start_time)?
        );
        self.write_str(&header)
    }

    pub fn write_record(&mut self, record: &FileRecord) -> Result<(), SnapshotError> {
        let mut line = format_record(record)?;
        line.push('\n');
        self.write_str(&line)?;
        self.records_written += 1;
        Ok(())
    }

    /// Write the header for `source`, then drain it record by record.
    ///
    /// Returns the number of records written.
    pub fn write_source<S>(&mut self, source: &mut S) -> Result<usize, SnapshotError>
    where
        S: SnapshotSource + ?Sized,
    {
        let start = self.records_written;
        self.write_header(source.base_path(), source.start_time())?;
        while let Some(record) = source.dequeue()? {
            self.write_record(&record)?;
        }
        let count = self.records_written - start;
        debug!(sink = %self.target.display(), records = count, "Listing written");
        Ok(count)
    }

    pub fn flush(&mut self) -> Result<(), SnapshotError> {
        self.out
            .flush()
            .map_err(|source| SnapshotError::SinkIo {
                target: self.target.clone(),
                source,
            })
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_str(&mut self, text: &str) -> Result<(), SnapshotError> {
        self.out
            .write_all(text.as_bytes())
            .map_err(|source| SnapshotError::SinkIo {
                target: self.target.clone(),
                source,
            })
    }
}
