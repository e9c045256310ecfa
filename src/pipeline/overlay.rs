//! Overlay worker: refreshes the caption display at the frame rate.

use crate::memory::SessionMemory;
use crate::overlay::SubtitleSink;
use crate::pipeline::error::WorkerError;
use crate::pipeline::worker::{StepOutcome, Worker};
use std::sync::Arc;

/// Reads the current caption from the mailbox and pushes it to the display.
///
/// Each read counts toward the mailbox's required display count, so a
/// caption stays on screen for at least that many frames before the
/// translator may replace it. `read_overlay` blocks while the mailbox is
/// empty; the handle's stop deadline covers that case.
pub struct OverlayWorker {
    memory: Arc<SessionMemory>,
    sink: Box<dyn SubtitleSink>,
}

impl OverlayWorker {
    pub fn new(memory: Arc<SessionMemory>, sink: Box<dyn SubtitleSink>) -> Self {
        Self { memory, sink }
    }
}

impl Worker for OverlayWorker {
    fn step(&mut self) -> Result<StepOutcome, WorkerError> {
        let text = self.memory.read_overlay();
        self.sink
            .show(&text)
            .map_err(|e| WorkerError::Recoverable(format!("caption display failed: {}", e)))?;

        // Frame-interval pacing.
        Ok(StepOutcome::Idle)
    }

    fn name(&self) -> &'static str {
        "Overlay"
    }
}
