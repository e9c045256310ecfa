//! Text-to-speech synthesis seam.

use crate::error::{OverdubError, Result};
use std::sync::{Arc, Mutex};

/// Trait for text-to-speech engines.
///
/// Returns the synthesized waveform as f32 PCM at 16kHz mono.
pub trait Synthesizer: Send {
    /// Synthesize speech for `text` in `language`.
    fn synthesize(&mut self, text: &str, language: &str) -> Result<Vec<f32>>;
}

/// Mock synthesizer for testing.
///
/// Produces a waveform whose length is proportional to the input text
/// (`samples_per_char` per character), so tests can assert on sizes
/// without real synthesis.
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    samples_per_char: usize,
    fill_value: f32,
    calls: Arc<Mutex<Vec<String>>>,
    should_fail: bool,
    error_message: String,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self {
            samples_per_char: 100,
            fill_value: 0.25,
            calls: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
            error_message: "mock synthesis error".to_string(),
        }
    }

    /// Configure the waveform length per input character.
    pub fn with_samples_per_char(mut self, count: usize) -> Self {
        self.samples_per_char = count;
        self
    }

    /// Configure the sample value the waveform is filled with.
    pub fn with_fill_value(mut self, value: f32) -> Self {
        self.fill_value = value;
        self
    }

    /// Configure the mock to fail on every call.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    /// Shared handle to the texts synthesized, in call order.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Synthesizer for MockSynthesizer {
    fn synthesize(&mut self, text: &str, _language: &str) -> Result<Vec<f32>> {
        if self.should_fail {
            return Err(OverdubError::Synthesis {
                message: self.error_message.clone(),
            });
        }

        match self.calls.lock() {
            Ok(mut calls) => calls.push(text.to_string()),
            Err(poisoned) => poisoned.into_inner().push(text.to_string()),
        }

        Ok(vec![self.fill_value; text.chars().count() * self.samples_per_char])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_waveform_length_tracks_text() {
        let mut synth = MockSynthesizer::new().with_samples_per_char(10);
        assert_eq!(synth.synthesize("abc", "en").unwrap().len(), 30);
        assert_eq!(synth.synthesize("", "en").unwrap().len(), 0);
    }

    #[test]
    fn test_mock_fill_value() {
        let mut synth = MockSynthesizer::new()
            .with_samples_per_char(2)
            .with_fill_value(0.5);
        assert_eq!(synth.synthesize("a", "en").unwrap(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_mock_records_calls() {
        let mut synth = MockSynthesizer::new();
        let calls = synth.calls();

        synth.synthesize("hello", "en").unwrap();
        synth.synthesize("world", "en").unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["hello", "world"]);
    }

    #[test]
    fn test_mock_failure() {
        let mut synth = MockSynthesizer::new().with_failure();
        match synth.synthesize("x", "en") {
            Err(OverdubError::Synthesis { .. }) => {}
            _ => panic!("Expected Synthesis error"),
        }
    }
}
