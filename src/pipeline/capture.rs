//! Capture worker: moves microphone samples into the ingress queue.

use crate::audio::AudioSource;
use crate::memory::SessionMemory;
use crate::pipeline::error::WorkerError;
use crate::pipeline::worker::{StepOutcome, Worker};
use std::sync::Arc;

/// Consecutive read failures tolerated before the worker gives up.
const MAX_CONSECUTIVE_ERRORS: u32 = 5;

/// Polls the audio source and appends everything it captures to the
/// session's ingress queue.
pub struct CaptureWorker {
    source: Box<dyn AudioSource>,
    memory: Arc<SessionMemory>,
    started: bool,
    consecutive_errors: u32,
}

impl CaptureWorker {
    pub fn new(source: Box<dyn AudioSource>, memory: Arc<SessionMemory>) -> Self {
        Self {
            source,
            memory,
            started: false,
            consecutive_errors: 0,
        }
    }
}

impl Worker for CaptureWorker {
    fn step(&mut self) -> Result<StepOutcome, WorkerError> {
        if !self.started {
            self.source
                .start()
                .map_err(|e| WorkerError::Fatal(format!("failed to start audio source: {}", e)))?;
            self.started = true;
        }

        match self.source.read_samples() {
            Ok(samples) => {
                self.consecutive_errors = 0;
                if samples.is_empty() {
                    if self.source.is_finite() {
                        Ok(StepOutcome::Done)
                    } else {
                        Ok(StepOutcome::Idle)
                    }
                } else {
                    self.memory.append_ingress(&samples);
                    Ok(StepOutcome::Continue)
                }
            }
            Err(e) => {
                self.consecutive_errors += 1;
                if self.consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                    Err(WorkerError::Fatal(format!(
                        "audio capture failed {} times in a row: {}",
                        self.consecutive_errors, e
                    )))
                } else {
                    Err(WorkerError::Recoverable(format!(
                        "audio capture error: {}",
                        e
                    )))
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "Capture"
    }

    fn shutdown(&mut self) {
        if self.started && let Err(e) = self.source.stop() {
            eprintln!("[Capture] failed to stop audio source: {}", e);
        }
    }
}
