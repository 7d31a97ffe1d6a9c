//! Autosave scheduling
//!
//! Provides:
//! - one lazily-created background worker that executes save jobs strictly
//!   in submission order (the write-serialization mechanism: two saves can
//!   never touch the file concurrently)
//! - a periodic trigger thread that enqueues a save every period
//! - a shutdown protocol that drains queued work within a timeout and then
//!   performs one final synchronous save
//!
//! A failed queued save is logged and the worker keeps running; only the
//! final shutdown save reports its failure to the caller, because no retry
//! opportunity remains after it.

use pawkeep_core::model::pet::SharedPet;
use pawkeep_store::{PersistError, SaveStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Scheduler lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No periodic trigger active; the worker may not exist yet
    Idle,
    /// Periodic trigger firing
    Running,
    /// Shutdown in progress
    ShuttingDown,
    /// Shut down; no further saves will be accepted
    Stopped,
}

enum Job {
    Save,
    /// Drain marker: acknowledged once every job queued before it has run
    Drain(Sender<()>),
}

struct Worker {
    tx: Sender<Job>,
    handle: JoinHandle<()>,
}

struct Timer {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

struct Inner {
    state: SchedulerState,
    worker: Option<Worker>,
    timer: Option<Timer>,
}

/// Periodic, serialized persistence of a shared pet
///
/// Manual saves and periodic autosaves funnel through the same single-worker
/// queue, so jobs execute one at a time in submission order.
pub struct Autosaver {
    store: Arc<SaveStore>,
    pet: SharedPet,
    cancel: Arc<AtomicBool>,
    inner: Mutex<Inner>,
}

impl Autosaver {
    /// Create an idle scheduler; no thread is spawned until it is needed
    pub fn new(store: Arc<SaveStore>, pet: SharedPet) -> Self {
        Self {
            store,
            pet,
            cancel: Arc::new(AtomicBool::new(false)),
            inner: Mutex::new(Inner {
                state: SchedulerState::Idle,
                worker: None,
                timer: None,
            }),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SchedulerState {
        self.lock_inner().state
    }

    /// Begin firing the periodic trigger every `period`
    ///
    /// Lazily creates the single background worker on first use. Calling
    /// `start` while already running is a no-op, as is calling it after
    /// shutdown has begun.
    pub fn start(&self, period: Duration) {
        let mut inner = self.lock_inner();
        match inner.state {
            SchedulerState::Running => return,
            SchedulerState::ShuttingDown | SchedulerState::Stopped => {
                tracing::warn!(state = ?inner.state, "Ignoring start() on a shut-down scheduler");
                return;
            }
            SchedulerState::Idle => {}
        }

        let worker_tx = self.ensure_worker(&mut inner);
        let (stop_tx, stop_rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("pawkeep-autosave-timer".into())
            .spawn(move || loop {
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {
                        if worker_tx.send(Job::Save).is_err() {
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            });
        match spawned {
            Ok(handle) => {
                inner.timer = Some(Timer { stop_tx, handle });
                inner.state = SchedulerState::Running;
                tracing::info!(period_ms = period.as_millis() as u64, "Autosave started");
            }
            Err(error) => {
                tracing::error!(%error, "Failed to spawn the autosave timer");
            }
        }
    }

    /// Queue a manual save through the serializing worker
    ///
    /// Returns immediately; the save runs on the worker in submission order
    /// relative to any pending autosaves. A failure inside the job is
    /// logged, not returned.
    pub fn save_now(&self) {
        let mut inner = self.lock_inner();
        if matches!(
            inner.state,
            SchedulerState::ShuttingDown | SchedulerState::Stopped
        ) {
            tracing::warn!(state = ?inner.state, "save_now() ignored after shutdown");
            return;
        }
        let tx = self.ensure_worker(&mut inner);
        if tx.send(Job::Save).is_err() {
            tracing::warn!("save_now() dropped: worker queue is closed");
        }
    }

    /// Cancel the periodic trigger
    ///
    /// Idempotent and safe to call when never started. Queued jobs still
    /// run; only the trigger stops.
    pub fn stop(&self) {
        let mut inner = self.lock_inner();
        Self::stop_timer(&mut inner);
        if inner.state == SchedulerState::Running {
            inner.state = SchedulerState::Idle;
        }
    }

    /// Shut down: stop the trigger, drain queued work within `timeout`,
    /// then perform one final synchronous save
    ///
    /// Idempotent; a second call returns `Ok` immediately without saving
    /// again. If the worker does not drain in time, whatever remains queued
    /// is discarded (logged as degradation). The final save still captures
    /// the state as of shutdown, so loss is bounded to the window since the
    /// last completed save.
    ///
    /// ## Errors
    ///
    /// The final synchronous save's `PersistError`, if it fails.
    pub fn shutdown(&self, timeout: Duration) -> Result<(), PersistError> {
        let mut inner = self.lock_inner();
        if inner.state == SchedulerState::Stopped {
            return Ok(());
        }
        inner.state = SchedulerState::ShuttingDown;
        Self::stop_timer(&mut inner);

        if let Some(Worker { tx, handle }) = inner.worker.take() {
            let (ack_tx, ack_rx) = mpsc::channel();
            let drained =
                tx.send(Job::Drain(ack_tx)).is_ok() && ack_rx.recv_timeout(timeout).is_ok();
            // Closing the queue: nothing further is accepted.
            drop(tx);
            if drained {
                let _ = handle.join();
            } else {
                self.cancel.store(true, Ordering::SeqCst);
                tracing::warn!(
                    timeout_ms = timeout.as_millis() as u64,
                    "Save worker did not drain in time; discarding queued saves"
                );
            }
        }

        inner.state = SchedulerState::Stopped;
        let result = self.store.save(&self.pet);
        match &result {
            Ok(()) => tracing::info!("Final shutdown save complete"),
            Err(error) => tracing::error!(%error, "Final shutdown save failed"),
        }
        result
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create the background worker if it does not exist yet; it is created
    /// at most once and reused for the scheduler's lifetime
    fn ensure_worker(&self, inner: &mut Inner) -> Sender<Job> {
        if let Some(worker) = &inner.worker {
            return worker.tx.clone();
        }
        let (tx, rx) = mpsc::channel::<Job>();
        let store = Arc::clone(&self.store);
        let pet = Arc::clone(&self.pet);
        let cancel = Arc::clone(&self.cancel);
        let spawned = thread::Builder::new()
            .name("pawkeep-save-worker".into())
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    match job {
                        Job::Save => {
                            if cancel.load(Ordering::SeqCst) {
                                continue;
                            }
                            if let Err(error) = store.save(&pet) {
                                tracing::warn!(%error, "Background save failed; scheduler keeps running");
                            }
                        }
                        Job::Drain(ack) => {
                            let _ = ack.send(());
                        }
                    }
                }
            });
        match spawned {
            Ok(handle) => {
                let worker = Worker {
                    tx: tx.clone(),
                    handle,
                };
                inner.worker = Some(worker);
            }
            Err(error) => {
                // Sends into the orphaned channel fail and get logged by the
                // callers; the next ensure_worker call retries the spawn.
                tracing::error!(%error, "Failed to spawn the save worker");
            }
        }
        tx
    }

    fn stop_timer(inner: &mut Inner) {
        if let Some(Timer { stop_tx, handle }) = inner.timer.take() {
            let _ = stop_tx.send(());
            let _ = handle.join();
        }
    }
}
