//! Sortable record identifiers
//!
//! A record id doubles as the file stem of the record on disk. Its
//! shape is `{prefix}_{timestamp}_{suffix}`:
//!
//! - `timestamp` is local time as `%Y%m%dT%H%M%S%3f` (millisecond
//!   precision, no separators), so lexicographic order of ids equals
//!   creation order down to the millisecond
//! - `suffix` is the first 8 hex characters of a v4 UUID, which keeps
//!   two appends inside the same millisecond from colliding

use chrono::Local;
use uuid::Uuid;

/// Timestamp layout used inside record ids.
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%3f";

/// Identifier of one journal record.
///
/// Ids are minted at append time and returned to the caller; the
/// administrative read path accepts them back. Ordering (`Ord`, and
/// therefore sorting a listing) is plain string ordering, which is the
/// record creation order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Mint a fresh id for `prefix` at the current local time.
    pub fn new(prefix: &str) -> Self {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        let uuid = Uuid::new_v4().simple().to_string();
        RecordId(format!("{}_{}_{}", prefix, timestamp, &uuid[..8]))
    }

    /// Rebuild an id from a file stem produced by a previous append.
    pub(crate) fn from_stem(stem: impl Into<String>) -> Self {
        RecordId(stem.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the record under its stream directory.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
