//! Error types for snapshot reading, reconciliation, and the tooling layer.

use std::path::PathBuf;
use thiserror::Error;

/// Which snapshot of a reconciliation a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Old => write!(f, "old"),
            Side::New => write!(f, "new"),
        }
    }
}

/// Token kinds of the listing grammar, used to report malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Size,
    Date,
    Text,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Size => "size",
            TokenKind::Date => "date",
            TokenKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// Errors raised while producing or reconciling snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The same path appeared twice within one snapshot.
    #[error("Path {path:?} appears twice in the {side} snapshot")]
    DuplicatePath { side: Side, path: String },

    /// A token did not match its grammar. The reader is left where the token started.
    #[error("Malformed {token} token: {detail}")]
    MalformedToken { token: TokenKind, detail: String },

    /// Reading a filesystem entry or archive stream failed.
    #[error("I/O failure reading {}: {source}", path.display())]
    SourceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a listing failed.
    #[error("I/O failure writing {}: {source}", target.display())]
    SinkIo {
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SnapshotError {
    pub(crate) fn malformed(token: TokenKind, detail: impl Into<String>) -> Self {
        SnapshotError::MalformedToken {
            token,
            detail: detail.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnapshotError::SourceIo {
            path: path.into(),
            source,
        }
    }
}

/// Errors surfaced by configuration, logging, and command execution.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
