//! Cancellable fixed-interval background task.
//!
//! # Invariants
//! - The first tick runs immediately after spawn, then once per interval.
//! - Ticks never overlap: they run sequentially on one thread.
//! - `stop` (or drop) wakes the thread and joins it; no tick starts afterwards.
//!   A tick already running is not interrupted, so `stop` blocks until it
//!   returns.

use log::{debug, warn};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handle to a running periodic task.
pub struct PeriodicTask {
    name: String,
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
    ticking: Arc<AtomicBool>,
}

impl PeriodicTask {
    /// Spawns a named thread that calls `tick` now and every `interval`.
    pub fn spawn<F>(name: impl Into<String>, interval: Duration, mut tick: F) -> io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let name = name.into();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let ticking = Arc::new(AtomicBool::new(false));
        let thread_ticking = Arc::clone(&ticking);
        let thread = thread::Builder::new().name(name.clone()).spawn(move || loop {
            thread_ticking.store(true, Ordering::SeqCst);
            tick();
            thread_ticking.store(false, Ordering::SeqCst);
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        })?;
        debug!(
            "event=task_start module=sync status=ok task={name} interval_ms={}",
            interval.as_millis()
        );

        Ok(Self {
            name,
            stop_tx: Some(stop_tx),
            thread: Some(thread),
            ticking,
        })
    }

    /// Stops the task and joins its thread.
    ///
    /// Blocks until an in-flight tick returns; a tick doing network I/O can
    /// hold this for as long as its own timeouts allow. Check
    /// [`PeriodicTask::is_ticking`] first to tell the user about the wait.
    pub fn stop(mut self) {
        self.shutdown_inner();
    }

    /// Whether a tick is executing right now.
    pub fn is_ticking(&self) -> bool {
        self.ticking.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    fn shutdown_inner(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!(
                    "event=task_stop module=sync status=error task={} error_code=tick_panicked",
                    self.name
                );
                return;
            }
            debug!("event=task_stop module=sync status=ok task={}", self.name);
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}
