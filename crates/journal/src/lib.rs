//! Append-only file journals for Palisade
//!
//! A [`Journal`] owns a directory tree of named streams. Each append
//! serializes one JSON payload into its own file, named by a sortable
//! [`RecordId`], written crash-safely (temp file, fsync, atomic rename).
//! Streams carry a [`RetentionPolicy`] that caps how many records
//! survive; the sweep runs after every append.
//!
//! Bytes at rest pass through a [`RecordCodec`]. The default
//! [`PlainCodec`] stores them as-is; the trait is the hook for
//! encryption or compression of persisted artifacts.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod journal;
pub mod record;
pub mod stream;

pub use codec::{CodecError, PlainCodec, RecordCodec};
pub use error::{JournalError, JournalResult};
pub use journal::Journal;
pub use record::RecordId;
pub use stream::{RetentionPolicy, StreamConfig};
