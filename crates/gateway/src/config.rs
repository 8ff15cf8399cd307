//! Gateway configuration via `palisade.toml`
//!
//! A config file in the data directory, created with commented defaults
//! on first open. To change settings, edit the file and restart.

use std::path::Path;
use std::time::Duration;

use palisade_core::PermissionPolicy;
use palisade_journal::RetentionPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Config file name placed in the gateway data directory.
pub const CONFIG_FILE_NAME: &str = "palisade.toml";

/// Journal stream fed by successfully executed requests.
pub const SUCCESS_STREAM: &str = "logs";
/// Journal stream fed by denied and failed requests.
pub const ERROR_STREAM: &str = "e_query";
/// Journal stream fed by state snapshots.
pub const SNAPSHOT_STREAM: &str = "backups";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// Path of the offending file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this configuration.
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        /// Path of the offending file.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The default file could not be written.
    #[error("failed to write config file '{path}': {source}")]
    Write {
        /// Path of the offending file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Snapshot schedule settings, `[snapshot]` in `palisade.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Interval between scheduled snapshots (humantime string, e.g.
    /// `"24h"`, `"30m"`).
    #[serde(with = "humantime_serde", default = "default_snapshot_interval")]
    pub interval: Duration,
    /// How many snapshot files survive. `0` keeps all.
    #[serde(default = "default_snapshot_retention")]
    pub retention: usize,
}

fn default_snapshot_interval() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_snapshot_retention() -> usize {
    7
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        SnapshotConfig {
            interval: default_snapshot_interval(),
            retention: default_snapshot_retention(),
        }
    }
}

/// Retention setting for one query-log stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRetentionConfig {
    /// How many records survive. `0` (the default) keeps all.
    #[serde(default)]
    pub retention: usize,
}

impl StreamRetentionConfig {
    /// Map the count to a journal retention policy.
    pub fn retention_policy(&self) -> RetentionPolicy {
        retention_from(self.retention)
    }
}

impl SnapshotConfig {
    /// Map the count to a journal retention policy.
    pub fn retention_policy(&self) -> RetentionPolicy {
        retention_from(self.retention)
    }
}

fn retention_from(count: usize) -> RetentionPolicy {
    if count == 0 {
        RetentionPolicy::KeepAll
    } else {
        RetentionPolicy::KeepLast(count)
    }
}

/// Gateway configuration loaded from `palisade.toml`.
///
/// # Example
///
/// ```toml
/// [snapshot]
/// interval = "24h"
/// retention = 7
///
/// [policy]
/// tasks = ["add", "getAll", "search"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Snapshot schedule.
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    /// Retention of the success stream.
    #[serde(default)]
    pub success_log: StreamRetentionConfig,
    /// Retention of the error stream.
    #[serde(default)]
    pub error_log: StreamRetentionConfig,
    /// Per-collection allow sets. When the whole table is absent, every
    /// operation on every collection is allowed; when present, only
    /// listed operations pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<PermissionPolicy>,
}

impl GatewayConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Palisade gateway configuration

# Snapshot schedule: how often the full store state is captured into
# the backups stream, and how many snapshot files survive.
#   interval  = humantime string ("24h", "30m", "90s", ...)
#   retention = number of files to keep; 0 keeps all
[snapshot]
interval = "24h"
retention = 7

# Query log retention; 0 (the default) keeps every record.
[success_log]
retention = 0

[error_log]
retention = 0

# Per-collection permissions. While this table is absent, every
# operation on every collection is allowed. Once it is present, a
# collection must be listed to be reachable at all, and only the listed
# operations are allowed. An empty list locks a collection down.
# Operation names: add, update, delete, getAll, search, count, clear,
# clearAdd, conformToTemplate, renameField.
# [policy]
# tasks = ["add", "getAll", "search"]
# notes = ["getAll"]
"#
    }

    /// Read and parse config from a file path.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Write {
                path: path.display().to_string(),
                source,
            })?;
        }
        Ok(())
    }
}
