//! Periodic full-state snapshots
//!
//! A single background thread captures the executor's state on a fixed
//! cadence and writes it through the journal's snapshot stream. The
//! snapshot itself is consistent by construction: the executor hands
//! out a point-in-time image, never a view into live state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use palisade_core::QueryExecutor;
use palisade_journal::{Journal, JournalResult, RecordId};
use parking_lot::{Condvar, Mutex};
use tracing::{info, warn};

use crate::config::SNAPSHOT_STREAM;

/// Capture the executor's current state and append it to the snapshot
/// stream.
///
/// Used by the scheduler on every tick and callable directly for
/// on-demand snapshots.
pub fn write_snapshot(executor: &dyn QueryExecutor, journal: &Journal) -> JournalResult<RecordId> {
    let image = executor.state_image();
    let id = journal.append(SNAPSHOT_STREAM, &image)?;
    info!(
        target: "palisade::snapshot",
        id = %id,
        version = image.version,
        documents = image.document_count(),
        "snapshot written"
    );
    Ok(id)
}

struct SchedulerInner {
    executor: Arc<dyn QueryExecutor>,
    journal: Arc<Journal>,
    interval: Duration,
    shutdown: AtomicBool,
    gate: Mutex<()>,
    wake: Condvar,
}

/// Background snapshot timer.
///
/// [`SnapshotScheduler::start`] spawns the worker; [`shutdown`] stops
/// it and joins. A tick already in flight at shutdown finishes its
/// write before the worker exits.
///
/// [`shutdown`]: SnapshotScheduler::shutdown
pub struct SnapshotScheduler {
    inner: Arc<SchedulerInner>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SnapshotScheduler {
    /// Start the snapshot worker thread.
    ///
    /// The worker is named `palisade-snapshot` and writes one snapshot
    /// every `interval`, starting one interval after this call.
    pub fn start(
        executor: Arc<dyn QueryExecutor>,
        journal: Arc<Journal>,
        interval: Duration,
    ) -> Self {
        let inner = Arc::new(SchedulerInner {
            executor,
            journal,
            interval,
            shutdown: AtomicBool::new(false),
            gate: Mutex::new(()),
            wake: Condvar::new(),
        });

        let inner_clone = Arc::clone(&inner);
        let handle = std::thread::Builder::new()
            .name("palisade-snapshot".to_string())
            .spawn(move || tick_loop(&inner_clone))
            .expect("failed to spawn snapshot scheduler thread");

        SnapshotScheduler {
            inner,
            worker: Mutex::new(Some(handle)),
        }
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// Safe to call more than once; later calls return immediately.
    pub fn shutdown(&self) {
        self.inner.shutdown.store(true, Ordering::Release);

        // Lock the gate before notifying to prevent lost-wakeup:
        // the worker between its shutdown check and condvar wait holds
        // this lock, so acquiring it guarantees the worker is either
        // already in wait_until() (and our notify will wake it) or
        // hasn't checked shutdown yet (and will see it's true when it
        // does).
        {
            let _gate = self.inner.gate.lock();
            self.inner.wake.notify_all();
        }

        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
    }
}

fn tick_loop(inner: &SchedulerInner) {
    loop {
        let deadline = Instant::now() + inner.interval;
        {
            let mut gate = inner.gate.lock();
            loop {
                if inner.shutdown.load(Ordering::Acquire) {
                    return;
                }
                if inner.wake.wait_until(&mut gate, deadline).timed_out() {
                    break;
                }
            }
        }
        if inner.shutdown.load(Ordering::Acquire) {
            return;
        }

        // Tick outside the gate so shutdown() never blocks on a write.
        if let Err(err) = write_snapshot(inner.executor.as_ref(), &inner.journal) {
            warn!(target: "palisade::snapshot", error = %err, "scheduled snapshot failed");
        }
    }
}
