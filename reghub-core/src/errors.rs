//! Registry Core Error Hierarchy
//!
//! Domain errors map to wire result codes at the dispatch layer; storage
//! and push errors stay internal (logged by the background workers).

use std::path::PathBuf;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Domain-level registry failures, surfaced as result codes
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Snapshot persistence failures
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Push pipeline failures
    #[error(transparent)]
    Push(#[from] PushError),

    /// Save coalescer shut down
    #[error(transparent)]
    Signal(#[from] SignalError),
}

/// Domain errors raised by the store. Type-level and global-data "not
/// found" are plain `Option::None` results, not errors; only the wire
/// layer turns those into result codes.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Key is empty or not rooted at `/`
    #[error("empty path")]
    EmptyPath,

    #[error("server not exists")]
    SrvNotExists,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Disk I/O failures during snapshot load/save
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Snapshot (de)serialization failures
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// I/O failure with the offending path attached
    #[error("error occurred at path: {path}")]
    PathError {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// Queue closed by shutdown; producers drop the event
    #[error("push queue closed")]
    QueueClosed,

    #[error("push frame encode failed: {0}")]
    Encode(String),

    /// Transport rejected the frame; logged, never fatal
    #[error("push transport failed: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignalError {
    #[error("save signal closed")]
    Closed,
}

// ============== Conversion Implementations ============== //
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(StorageError::IoError(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Storage(StorageError::JsonError(e))
    }
}
