//! Error types for integrity computation and verification.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while computing or verifying integrity objects.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Not a file: {0:?}")]
    NotAFile(PathBuf),

    #[error("Cannot hash the integrity manifest itself: {0:?}")]
    ReservedName(PathBuf),

    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Unsupported digest encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Unknown integrity manifest version: {0}")]
    InvalidManifestVersion(String),

    #[error("Incompatible integrity object versions: expected {expected}, got {actual}")]
    IncompatibleVersion { expected: String, actual: String },

    #[error("Integrity manifest failed schema validation: {0}")]
    SchemaValidationFailed(String),

    #[error("Path is neither a file nor a directory: {0:?}")]
    InvalidPathKind(PathBuf),

    #[error("Invalid exclusion pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
