//! Translator worker: turns captured utterances into translated captions.
//!
//! Once per utterance interval this worker drains the ingress queue, gates
//! out silence, transcribes, cleans, translates, and publishes the result
//! to the caption mailbox. Both the original and translated texts go into
//! the history log.

use crate::defaults;
use crate::memory::{HistoryChannel, SessionMemory};
use crate::pipeline::error::WorkerError;
use crate::pipeline::orchestrator::PipelineEvent;
use crate::pipeline::worker::{StepOutcome, Worker};
use crate::stt::Transcriber;
use crate::translate::Translator;
use std::sync::Arc;

/// Caption published for silent or unrecognizable utterances. Blank rather
/// than empty so the overlay clears visibly and the synthesizer skips it.
pub const SILENCE_PLACEHOLDER: &str = " ";

pub struct TranslatorWorker {
    memory: Arc<SessionMemory>,
    transcriber: Box<dyn Transcriber>,
    translator: Box<dyn Translator>,
    source_language: String,
    target_language: String,
    event_tx: Option<crossbeam_channel::Sender<PipelineEvent>>,
}

impl TranslatorWorker {
    pub fn new(
        memory: Arc<SessionMemory>,
        transcriber: Box<dyn Transcriber>,
        translator: Box<dyn Translator>,
        source_language: &str,
        target_language: &str,
    ) -> Self {
        Self {
            memory,
            transcriber,
            translator,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            event_tx: None,
        }
    }

    /// Sets an optional event sender for caption streaming.
    pub fn with_event_sender(mut self, tx: crossbeam_channel::Sender<PipelineEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    fn process_utterance(&mut self, samples: Vec<f32>) -> Result<(), WorkerError> {
        // Gate on the raw signal; normalizing first would lift noise to
        // full scale and blind the energy check.
        if is_silence(&samples) {
            self.memory.write(SILENCE_PLACEHOLDER);
            return Ok(());
        }

        let normalized = peak_normalize(&samples);

        let raw = self
            .transcriber
            .transcribe(&normalized, &self.source_language)
            .map_err(|e| WorkerError::Recoverable(format!("transcription failed: {}", e)))?;

        let original = clean_text(&raw);
        if original.is_empty() {
            self.memory.write(SILENCE_PLACEHOLDER);
            return Ok(());
        }

        self.memory
            .append_history(original.as_str(), HistoryChannel::Original);

        let translated = if self.source_language == self.target_language {
            original.clone()
        } else {
            self.translator
                .translate(&original, &self.source_language, &self.target_language)
                .map_err(|e| WorkerError::Recoverable(format!("translation failed: {}", e)))?
        };

        self.memory
            .append_history(translated.as_str(), HistoryChannel::Translated);

        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(PipelineEvent::CaptionPublished {
                original: original.clone(),
                translated: translated.clone(),
            });
        }

        self.memory.write(translated);
        Ok(())
    }
}

impl Worker for TranslatorWorker {
    fn step(&mut self) -> Result<StepOutcome, WorkerError> {
        let samples = self.memory.drain_ingress();
        if samples.is_empty() {
            return Ok(StepOutcome::Idle);
        }

        self.process_utterance(samples)?;

        // Utterance-interval pacing regardless of how much was drained.
        Ok(StepOutcome::Idle)
    }

    fn name(&self) -> &'static str {
        "Translator"
    }
}

/// Scale samples so the loudest peak sits at full scale. Quiet microphones
/// otherwise feed the recognizer audio it was not trained on.
pub fn peak_normalize(samples: &[f32]) -> Vec<f32> {
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    if peak <= f32::EPSILON {
        return samples.to_vec();
    }
    samples.iter().map(|&s| s / peak).collect()
}

/// Mean RMS energy over fixed-size windows.
pub fn mean_window_rms(samples: &[f32], window: usize) -> f32 {
    if samples.is_empty() || window == 0 {
        return 0.0;
    }

    let mut sum = 0.0f64;
    let mut windows = 0u32;
    for chunk in samples.chunks(window) {
        let energy: f64 = chunk.iter().map(|&s| (s as f64) * (s as f64)).sum();
        sum += (energy / chunk.len() as f64).sqrt();
        windows += 1;
    }
    (sum / windows as f64) as f32
}

/// Whether an utterance is quiet enough to skip transcription.
pub fn is_silence(samples: &[f32]) -> bool {
    mean_window_rms(samples, defaults::ENERGY_WINDOW) < defaults::SILENCE_RMS_THRESHOLD
}

/// Normalize recognized text: trim, collapse whitespace runs, capitalize
/// the first letter.
pub fn clean_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut chars = collapsed.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
