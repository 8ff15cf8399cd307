//! Stream configuration and retention policies

use serde::{Deserialize, Serialize};

/// How many records of a stream survive the retention sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetentionPolicy {
    /// Retain every record forever (default).
    KeepAll,
    /// Keep only the newest n records; older ones are deleted after
    /// each append.
    KeepLast(usize),
}

impl RetentionPolicy {
    /// The cap, if any.
    pub fn keep_count(&self) -> Option<usize> {
        match self {
            RetentionPolicy::KeepAll => None,
            RetentionPolicy::KeepLast(n) => Some(*n),
        }
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        RetentionPolicy::KeepAll
    }
}

/// Static description of one journal stream.
///
/// `name` is the subdirectory under the journal root; `prefix` and
/// `extension` fix the record file names (`{prefix}_{ts}_{suffix}.{ext}`).
/// Files in the directory that do not match both are ignored by listing
/// and retention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Stream name, also its subdirectory.
    pub name: String,
    /// Record id prefix.
    pub prefix: String,
    /// File extension, without the leading dot.
    pub extension: String,
    /// Retention applied after each append.
    pub retention: RetentionPolicy,
}

impl StreamConfig {
    /// A stream with unlimited retention.
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        StreamConfig {
            name: name.into(),
            prefix: prefix.into(),
            extension: extension.into(),
            retention: RetentionPolicy::KeepAll,
        }
    }

    /// Replace the retention policy.
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Whether `file_name` belongs to this stream.
    pub(crate) fn matches(&self, file_name: &str) -> bool {
        file_name.len() > self.prefix.len() + self.extension.len() + 2
            && file_name.starts_with(&self.prefix)
            && file_name.as_bytes()[self.prefix.len()] == b'_'
            && file_name.ends_with(&self.extension)
            && file_name.as_bytes()[file_name.len() - self.extension.len() - 1] == b'.'
    }
}
