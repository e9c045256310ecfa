//! Playback worker: feeds synthesized audio to the output device.

use crate::audio::AudioOutput;
use crate::memory::SessionMemory;
use crate::pipeline::error::WorkerError;
use crate::pipeline::worker::{StepOutcome, Worker};
use std::sync::Arc;

/// Drains the egress queue and writes the waveform to the output device in
/// fixed-size chunks.
pub struct PlaybackWorker {
    memory: Arc<SessionMemory>,
    output: Box<dyn AudioOutput>,
    chunk_size: usize,
    started: bool,
}

impl PlaybackWorker {
    pub fn new(memory: Arc<SessionMemory>, output: Box<dyn AudioOutput>, chunk_size: usize) -> Self {
        Self {
            memory,
            output,
            chunk_size,
            started: false,
        }
    }
}

impl Worker for PlaybackWorker {
    fn step(&mut self) -> Result<StepOutcome, WorkerError> {
        if !self.started {
            self.output
                .start()
                .map_err(|e| WorkerError::Fatal(format!("failed to start audio output: {}", e)))?;
            self.started = true;
        }

        let samples = self.memory.drain_egress();
        if samples.is_empty() {
            return Ok(StepOutcome::Idle);
        }

        for chunk in samples.chunks(self.chunk_size) {
            self.output
                .write_chunk(chunk)
                .map_err(|e| WorkerError::Recoverable(format!("playback failed: {}", e)))?;
        }

        Ok(StepOutcome::Continue)
    }

    fn name(&self) -> &'static str {
        "Playback"
    }

    fn shutdown(&mut self) {
        if self.started && let Err(e) = self.output.stop() {
            eprintln!("[Playback] failed to stop audio output: {}", e);
        }
    }
}
