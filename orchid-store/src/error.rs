//! Error types for orchid-store.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from local store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a JSON object of strings.
    #[error("corrupt store file at {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A stored value did not decode as the expected record.
    #[error("malformed value under key `{key}`: {source}")]
    Record {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error on the write path.
    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
