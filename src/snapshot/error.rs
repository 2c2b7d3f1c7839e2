//! Snapshot error types.

use crate::core::algorithm::AlgorithmError;
use crate::insertions::InsertionError;
use thiserror::Error;

/// Errors that can occur capturing or restoring snapshots
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Snapshot has an invalid scramble: {0}")]
    InvalidScramble(#[from] AlgorithmError),

    /// A solution chain that does not start at the root, or revisits it
    #[error("Invalid solution chain: {0}")]
    InvalidChain(String),

    #[error("Snapshot has an invalid insertion edit: {0}")]
    InvalidEdit(#[from] InsertionError),
}
