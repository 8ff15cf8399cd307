//! The Palisade gateway
//!
//! Wires the pieces together: requests come in as raw JSON, pass
//! through parse, authorize, execute, record (the [`Dispatcher`]), and
//! a timer thread captures periodic state snapshots (the
//! [`SnapshotScheduler`]). [`Service`] owns the whole assembly for one
//! data directory: configuration, executor, journal, dispatcher,
//! scheduler.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dispatcher;
pub mod scheduler;
pub mod service;

pub use config::{
    ConfigError, GatewayConfig, CONFIG_FILE_NAME, ERROR_STREAM, SNAPSHOT_STREAM, SUCCESS_STREAM,
};
pub use dispatcher::Dispatcher;
pub use scheduler::{write_snapshot, SnapshotScheduler};
pub use service::{Service, ServiceError};
