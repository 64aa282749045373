//! Error types for frigg core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for frigg core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while scanning, loading, merging or saving parameters.
///
/// A missing sidecar file is not an error: loaders return `Ok(None)` for it.
/// A sidecar that exists but can't be parsed is [`Error::Json`], so callers
/// can tell "nothing to merge" apart from "the saved state is broken".
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter or session file is not valid JSON for its schema.
    #[error("JSON parse error in {file}: {source}")]
    Json {
        /// Path to the file with the error.
        file: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// In-memory JSON (de)serialization failed.
    #[error("Invalid parameter JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Reading a file failed for a reason other than absence.
    #[error("Failed to read {file}: {source}")]
    Read {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a file failed, possibly part-way through.
    #[error("Failed to write {file}: {source}")]
    Write {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error without a specific file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A token pattern could not be compiled.
    #[error("Invalid parameter pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
