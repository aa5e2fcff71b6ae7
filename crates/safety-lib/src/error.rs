use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the safety library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a hotzone id does not exist in the store.
    #[error("hotzone {id} not found")]
    HotzoneNotFound { id: i64 },

    /// Raised when a community post id does not exist in the store.
    #[error("post {id} not found")]
    PostNotFound { id: i64 },

    /// Raised when a store file's parent directory cannot be created.
    #[error("failed to prepare store directory {path}: {source}")]
    StoreDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True when the error means "the referenced parent row does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::HotzoneNotFound { .. } | Error::PostNotFound { .. })
    }
}
