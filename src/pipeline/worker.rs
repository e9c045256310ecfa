//! Core worker abstraction and runner for the translation pipeline.

use crate::pipeline::error::{ErrorReporter, WorkerError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Outcome of one worker step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Work was done; step again immediately.
    Continue,
    /// Nothing to do right now; sleep for the poll interval before stepping again.
    Idle,
    /// The worker has finished its job; stop the loop.
    Done,
}

/// A worker in the translation pipeline.
///
/// Each worker runs in its own thread and communicates with the others only
/// through the shared session memory. Unlike a channel-driven stage, a worker
/// is polled: the runner calls `step` repeatedly until the worker reports
/// `Done`, the shutdown flag is set, or a fatal error occurs.
pub trait Worker: Send + 'static {
    /// Performs one unit of work.
    ///
    /// Returns:
    /// - `Ok(StepOutcome::Continue)` - Work was done, more may be pending
    /// - `Ok(StepOutcome::Idle)` - Nothing to do, back off for one poll interval
    /// - `Ok(StepOutcome::Done)` - The worker's input is exhausted
    /// - `Err(WorkerError)` - Processing failed
    fn step(&mut self) -> Result<StepOutcome, WorkerError>;

    /// Returns the name of this worker for logging and error reporting.
    fn name(&self) -> &'static str;

    /// Called when the worker is shutting down.
    ///
    /// Override this to perform cleanup operations.
    fn shutdown(&mut self) {}
}

/// Runs a worker in a dedicated thread.
pub struct WorkerRunner {
    /// Handle to the spawned thread.
    handle: Option<JoinHandle<()>>,
    /// Name of the worker (cached for error reporting).
    worker_name: &'static str,
}

impl WorkerRunner {
    /// Spawns a worker in a dedicated thread.
    ///
    /// # Arguments
    /// * `worker` - The worker implementation to run
    /// * `running` - Shared shutdown flag; the loop exits when it goes false
    /// * `poll_interval` - Sleep duration after an `Idle` step
    /// * `error_reporter` - Reporter for handling errors
    pub fn spawn<W: Worker>(
        mut worker: W,
        running: Arc<AtomicBool>,
        poll_interval: Duration,
        error_reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let worker_name = worker.name();

        let handle = thread::spawn(move || {
            Self::run_worker(&mut worker, &running, poll_interval, error_reporter);
        });

        Self {
            handle: Some(handle),
            worker_name,
        }
    }

    /// Main polling loop for the worker.
    fn run_worker<W: Worker>(
        worker: &mut W,
        running: &AtomicBool,
        poll_interval: Duration,
        error_reporter: Arc<dyn ErrorReporter>,
    ) {
        let worker_name = worker.name();

        while running.load(Ordering::SeqCst) {
            match worker.step() {
                Ok(StepOutcome::Continue) => {}
                Ok(StepOutcome::Idle) => {
                    thread::sleep(poll_interval);
                }
                Ok(StepOutcome::Done) => {
                    break;
                }
                Err(WorkerError::Recoverable(msg)) => {
                    // Report but continue processing
                    error_reporter.report(worker_name, &WorkerError::Recoverable(msg));
                    thread::sleep(poll_interval);
                }
                Err(WorkerError::Fatal(msg)) => {
                    // Report and shutdown
                    error_reporter.report(worker_name, &WorkerError::Fatal(msg));
                    break;
                }
            }
        }

        // Cleanup on shutdown
        worker.shutdown();
    }

    /// Waits for the worker thread to complete.
    pub fn join(mut self) -> Result<(), String> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| format!("Worker '{}' thread panicked", self.worker_name))
        } else {
            Ok(())
        }
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| h.is_finished())
            .unwrap_or(true)
    }

    /// Returns the name of the worker.
    pub fn name(&self) -> &'static str {
        self.worker_name
    }

    /// Takes the raw thread handle, leaving the runner empty.
    pub(crate) fn take_handle(&mut self) -> Option<JoinHandle<()>> {
        self.handle.take()
    }
}
