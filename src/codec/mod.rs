//! Listing Codec
//!
//! Line-oriented text form of a snapshot. A listing starts with `#` header
//! comments, followed by one data line per file:
//!
//! ```text
//! # CSum
//! # Version 1
//! # Directory "/home/me/photos"
//! # Start 2011.08.13.09.14.57.123
//! 3a7bd3e2360a3d29eea436fcfb7e44c735d117c42d1c1835420b6b9942dd4f1b	5	2011.08.13.09.10.00.000	"./notes.txt"
//! ```
//!
//! [`TokenReader`] parses individual tokens with explicit pushback;
//! [`SnapshotWriter`] emits the exact inverse.

pub mod reader;
pub mod writer;

pub use reader::TokenReader;
pub use writer::{format_record, quote_path, SnapshotWriter};

/// First header line of every listing.
pub const MAGIC_COMMENT: &str = "CSum";

/// Listing format version written in the header.
pub const FORMAT_VERSION: u32 = 1;

/// Header keyword carrying the base path of the listed tree.
pub const DIRECTORY_KEY: &str = "Directory";

/// Header keyword carrying the capture start time.
pub const START_KEY: &str = "Start";

pub(crate) fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

pub(crate) fn is_eol(c: char) -> bool {
    c == '\n' || c == '\r'
}
