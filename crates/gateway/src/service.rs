//! Service assembly
//!
//! [`Service::open`] wires the whole gateway together from a data
//! directory: configuration, store, journal streams, dispatcher and
//! snapshot scheduler.

use std::path::Path;
use std::sync::Arc;

use palisade_core::{ExecuteResult, QueryExecutor};
use palisade_journal::{Journal, JournalError, JournalResult, RecordId, StreamConfig};
use palisade_store::MemoryStore;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::config::{
    ConfigError, GatewayConfig, CONFIG_FILE_NAME, ERROR_STREAM, SNAPSHOT_STREAM, SUCCESS_STREAM,
};
use crate::dispatcher::Dispatcher;
use crate::scheduler::{write_snapshot, SnapshotScheduler};

/// Errors opening a gateway service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The configuration file could not be read, parsed or created.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The journal could not be opened.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// The data directory could not be prepared.
    #[error("failed to prepare data directory: {0}")]
    Io(#[from] std::io::Error),
}

/// A running gateway over one data directory.
///
/// Opening a service creates the directory layout on first use:
///
/// ```text
/// <data_dir>/
///   palisade.toml      configuration (written with defaults if absent)
///   logs/              success-query log, log_<ts>_<id>.q
///   e_query/           error-query log, log_<ts>_<id>.q
///   backups/           state snapshots, backup_<ts>_<id>.snap
/// ```
///
/// Dropping the service stops the snapshot scheduler.
pub struct Service {
    config: GatewayConfig,
    executor: Arc<dyn QueryExecutor>,
    journal: Arc<Journal>,
    dispatcher: Dispatcher,
    scheduler: SnapshotScheduler,
}

impl std::fmt::Debug for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Service {
    /// Open a gateway over an in-memory store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ServiceError> {
        Self::with_executor(path, Arc::new(MemoryStore::new()))
    }

    /// Open a gateway over a caller-supplied executor.
    pub fn with_executor<P: AsRef<Path>>(
        path: P,
        executor: Arc<dyn QueryExecutor>,
    ) -> Result<Self, ServiceError> {
        let data_dir = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let config_path = data_dir.join(CONFIG_FILE_NAME);
        GatewayConfig::write_default_if_missing(&config_path)?;
        let config = GatewayConfig::from_file(&config_path)?;

        let journal = Arc::new(Journal::open(
            &data_dir,
            vec![
                StreamConfig::new(SUCCESS_STREAM, "log", "q")
                    .with_retention(config.success_log.retention_policy()),
                StreamConfig::new(ERROR_STREAM, "log", "q")
                    .with_retention(config.error_log.retention_policy()),
                StreamConfig::new(SNAPSHOT_STREAM, "backup", "snap")
                    .with_retention(config.snapshot.retention_policy()),
            ],
        )?);

        let dispatcher = Dispatcher::new(
            Arc::clone(&executor),
            Arc::clone(&journal),
            config.policy.clone(),
        );
        let scheduler = SnapshotScheduler::start(
            Arc::clone(&executor),
            Arc::clone(&journal),
            config.snapshot.interval,
        );

        info!(
            target: "palisade::gateway",
            data_dir = %data_dir.display(),
            snapshot_interval = ?config.snapshot.interval,
            policy = config.policy.is_some(),
            "gateway service started"
        );

        Ok(Service {
            config,
            executor,
            journal,
            dispatcher,
            scheduler,
        })
    }

    /// Handle one raw request. See [`Dispatcher::handle`].
    pub fn handle(&self, raw: &Value) -> palisade_core::Result<ExecuteResult> {
        self.dispatcher.handle(raw)
    }

    /// Write an on-demand snapshot outside the schedule.
    pub fn write_snapshot(&self) -> JournalResult<RecordId> {
        write_snapshot(self.executor.as_ref(), &self.journal)
    }

    /// The configuration this service was opened with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The journal backing this service.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Stop the snapshot scheduler and wait for it to exit.
    ///
    /// Safe to call more than once. A snapshot already in flight
    /// finishes its write first.
    pub fn shutdown(&self) {
        self.scheduler.shutdown();
        info!(target: "palisade::gateway", "gateway service stopped");
    }
}

impl Drop for Service {
    fn drop(&mut self) {
        self.scheduler.shutdown();
    }
}
