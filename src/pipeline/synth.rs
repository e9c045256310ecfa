//! Synth worker: speaks each new caption exactly once.

use crate::memory::SessionMemory;
use crate::pipeline::error::WorkerError;
use crate::pipeline::worker::{StepOutcome, Worker};
use crate::tts::Synthesizer;
use std::sync::Arc;

/// Consumes each caption from the mailbox once, synthesizes it, and queues
/// the waveform for playback. Blank captions (the silence placeholder) are
/// consumed but not spoken.
pub struct SynthWorker {
    memory: Arc<SessionMemory>,
    synthesizer: Box<dyn Synthesizer>,
    target_language: String,
}

impl SynthWorker {
    pub fn new(
        memory: Arc<SessionMemory>,
        synthesizer: Box<dyn Synthesizer>,
        target_language: &str,
    ) -> Self {
        Self {
            memory,
            synthesizer,
            target_language: target_language.to_string(),
        }
    }
}

impl Worker for SynthWorker {
    fn step(&mut self) -> Result<StepOutcome, WorkerError> {
        match self.memory.read_synth() {
            Some(text) => {
                if text.trim().is_empty() {
                    return Ok(StepOutcome::Idle);
                }

                let waveform = self
                    .synthesizer
                    .synthesize(&text, &self.target_language)
                    .map_err(|e| WorkerError::Recoverable(format!("synthesis failed: {}", e)))?;

                self.memory.append_egress(&waveform);
                Ok(StepOutcome::Continue)
            }
            // Already consumed this caption; poll again shortly.
            None => Ok(StepOutcome::Idle),
        }
    }

    fn name(&self) -> &'static str {
        "Synth"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tts::MockSynthesizer;

    #[test]
    fn test_caption_is_spoken_once() {
        let memory = Arc::new(SessionMemory::new(1).unwrap());
        memory.write("hello");

        let synth = MockSynthesizer::new().with_samples_per_char(10);
        let calls = synth.calls();
        let mut worker = SynthWorker::new(memory.clone(), Box::new(synth), "en");

        assert_eq!(worker.step().unwrap(), StepOutcome::Continue);
        assert_eq!(memory.egress_len(), 50);

        // Second step sees the consumed slot.
        assert_eq!(worker.step().unwrap(), StepOutcome::Idle);
        assert_eq!(memory.egress_len(), 50);
        assert_eq!(*calls.lock().unwrap(), vec!["hello"]);
    }

    #[test]
    fn test_blank_caption_is_consumed_but_not_spoken() {
        let memory = Arc::new(SessionMemory::new(1).unwrap());
        memory.write(" ");

        let synth = MockSynthesizer::new();
        let calls = synth.calls();
        let mut worker = SynthWorker::new(memory.clone(), Box::new(synth), "en");

        assert_eq!(worker.step().unwrap(), StepOutcome::Idle);
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(memory.egress_len(), 0);

        // The consume still counts toward the writer's gate.
        assert_eq!(memory.read_synth(), None);
    }

    #[test]
    fn test_synthesis_failure_is_recoverable() {
        let memory = Arc::new(SessionMemory::new(1).unwrap());
        memory.write("boom");

        let synth = MockSynthesizer::new().with_failure();
        let mut worker = SynthWorker::new(memory.clone(), Box::new(synth), "en");

        match worker.step() {
            Err(WorkerError::Recoverable(msg)) => assert!(msg.contains("synthesis")),
            other => panic!("Expected recoverable error, got {:?}", other),
        }
    }
}
