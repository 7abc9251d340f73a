//! Live filesystem snapshots: content hashing and the directory walker.

pub mod hasher;
pub mod walker;

pub use hasher::ChecksumAlgorithm;
pub use walker::{WalkSource, WalkerConfig};
