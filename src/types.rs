//! Core value types for the CSum fingerprint listings.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Width of a listing timestamp: `yyyy.MM.dd.HH.mm.ss.SSS`
pub const TIMESTAMP_WIDTH: usize = 23;

const TIMESTAMP_FORMAT: &str = "%Y.%m.%d.%H.%M.%S%.3f";

/// Checksum: opaque digest bytes, compared byte for byte
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Checksum(Vec<u8>);

impl Checksum {
    pub fn new(bytes: Vec<u8>) -> Self {
        Checksum(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex rendering, two digits per byte.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Vec<u8>> for Checksum {
    fn from(bytes: Vec<u8>) -> Self {
        Checksum(bytes)
    }
}

impl From<&[u8]> for Checksum {
    fn from(bytes: &[u8]) -> Self {
        Checksum(bytes.to_vec())
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Timestamp: milliseconds since the Unix epoch, UTC
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// The Unix epoch, used when a listing carries no `Start` header.
    pub const EPOCH: Timestamp = Timestamp(0);

    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Truncates to millisecond resolution.
    pub fn from_system_time(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Timestamp(after.as_millis() as i64),
            Err(before) => {
                let before = before.duration();
                let mut millis = -(before.as_millis() as i64);
                if before.subsec_nanos() % 1_000_000 != 0 {
                    millis -= 1;
                }
                Timestamp(millis)
            }
        }
    }

    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }

    /// Parse the fixed-width `yyyy.MM.dd.HH.mm.ss.SSS` form.
    ///
    /// Every field must be zero-padded to its full width; anything else is rejected.
    pub fn parse_listing(text: &str) -> Option<Timestamp> {
        let bytes = text.as_bytes();
        if bytes.len() != TIMESTAMP_WIDTH {
            return None;
        }
        for (index, byte) in bytes.iter().enumerate() {
            let separator = matches!(index, 4 | 7 | 10 | 13 | 16 | 19);
            if separator && *byte != b'.' {
                return None;
            }
            if !separator && !byte.is_ascii_digit() {
                return None;
            }
        }
        let field = |range: std::ops::Range<usize>| text[range].parse::<u32>().ok();
        let year = field(0..4)? as i32;
        let date = NaiveDate::from_ymd_opt(year, field(5..7)?, field(8..10)?)?;
        let datetime =
            date.and_hms_milli_opt(field(11..13)?, field(14..16)?, field(17..19)?, field(20..23)?)?;
        Some(Timestamp(Utc.from_utc_datetime(&datetime).timestamp_millis()))
    }

    /// Render as `yyyy.MM.dd.HH.mm.ss.SSS`, or `None` when the year does not fit four digits.
    pub fn format_listing(&self) -> Option<String> {
        let datetime = self.to_datetime()?;
        if !(0..=9999).contains(&datetime.year()) {
            return None;
        }
        debug_assert!(datetime.nanosecond() % 1_000_000 == 0);
        Some(datetime.format(TIMESTAMP_FORMAT).to_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format_listing() {
            Some(text) => f.write_str(&text),
            None => write!(f, "@{}ms", self.0),
        }
    }
}
