//! Error types and reporting for pipeline workers.

use std::fmt;

/// Errors that can occur during worker processing.
#[derive(Debug, Clone)]
pub enum WorkerError {
    /// Recoverable error that allows the worker to continue processing.
    Recoverable(String),
    /// Fatal error that requires the worker to shut down.
    Fatal(String),
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::Recoverable(msg) => write!(f, "Recoverable error: {}", msg),
            WorkerError::Fatal(msg) => write!(f, "Fatal error: {}", msg),
        }
    }
}

impl std::error::Error for WorkerError {}

/// Trait for reporting worker errors.
pub trait ErrorReporter: Send + Sync {
    /// Reports an error from a worker.
    fn report(&self, worker: &str, error: &WorkerError);
}

/// Simple error reporter that logs to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, worker: &str, error: &WorkerError) {
        eprintln!("[{}] {}", worker, error);
    }
}
