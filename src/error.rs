/// Storage failure taxonomy for the strand store
use thiserror::Error;

/// Errors from the durable key/value storage behind the strand store.
///
/// These never cross the public `StrandStore` API; they are logged and
/// collapsed into `false` / empty results there.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No durable storage is reachable (no window, storage disabled, private mode).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused a read.
    #[error("failed to read '{key}': {message}")]
    Read { key: String, message: String },

    /// The backend refused a write or delete (quota exceeded, security error).
    #[error("failed to write '{key}': {message}")]
    Write { key: String, message: String },

    /// The stored value is not a JSON array of strands.
    #[error("corrupt strand data: {0}")]
    Corrupt(#[from] serde_json::Error),
}
