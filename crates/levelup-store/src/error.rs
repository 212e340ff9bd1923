//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing persisted files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file could not be written or replaced.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
}
