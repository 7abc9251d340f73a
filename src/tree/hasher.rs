//! Content checksums for files on disk

use crate::error::SnapshotError;
use crate::types::Checksum;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;

const READ_CHUNK: usize = 64 * 1024;

/// Digest used to fingerprint file content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    /// SHA-256, the digest existing listings were written with
    #[default]
    Sha256,
    Blake3,
}

impl ChecksumAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha256 => "sha256",
            ChecksumAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(ChecksumAlgorithm::Sha256),
            "blake3" => Ok(ChecksumAlgorithm::Blake3),
            other => Err(format!(
                "Unknown checksum algorithm: {} (must be 'sha256' or 'blake3')",
                other
            )),
        }
    }
}

/// Hash everything `reader` yields.
pub fn hash_reader<R: Read>(
    algorithm: ChecksumAlgorithm,
    mut reader: R,
) -> std::io::Result<Checksum> {
    let mut buf = vec![0u8; READ_CHUNK];
    match algorithm {
        ChecksumAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            loop {
                let read = match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                hasher.update(&buf[..read]);
            }
            Ok(Checksum::new(hasher.finalize().to_vec()))
        }
        ChecksumAlgorithm::Blake3 => {
            let mut hasher = blake3::Hasher::new();
            loop {
                let read = match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => n,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                hasher.update(&buf[..read]);
            }
            Ok(Checksum::new(hasher.finalize().as_bytes().to_vec()))
        }
    }
}

/// Hash a file's content.
pub fn hash_file(algorithm: ChecksumAlgorithm, path: &Path) -> Result<Checksum, SnapshotError> {
    let file = File::open(path).map_err(|e| SnapshotError::io(path, e))?;
    hash_reader(algorithm, file).map_err(|e| SnapshotError::io(path, e))
}
