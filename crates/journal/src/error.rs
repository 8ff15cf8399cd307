//! Journal error types

use thiserror::Error;

use crate::codec::CodecError;

/// Result alias for journal operations.
pub type JournalResult<T> = std::result::Result<T, JournalError>;

/// Errors from journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Append or read addressed a stream the journal was not opened with.
    #[error("unknown stream: {name}")]
    UnknownStream {
        /// The stream name as given by the caller.
        name: String,
    },

    /// File or directory operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record payload could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored bytes could not be decoded by the configured codec.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}
