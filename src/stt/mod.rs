//! Speech-to-text transcription seam.

use crate::error::{OverdubError, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Trait for speech-to-text engines.
///
/// Takes an utterance of f32 PCM at 16kHz mono and returns the recognized
/// text in the source language. Implementations wrap whatever model or
/// service performs the actual recognition.
pub trait Transcriber: Send {
    /// Transcribe an utterance of audio samples.
    fn transcribe(&mut self, samples: &[f32], language: &str) -> Result<String>;
}

/// Mock transcriber for testing.
///
/// Returns scripted responses in order, repeating the last one once the
/// script runs out. Records every call for later inspection.
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    responses: Arc<Mutex<VecDeque<String>>>,
    last_response: String,
    calls: Arc<Mutex<Vec<(usize, String)>>>,
    should_fail: bool,
    error_message: String,
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            last_response: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
            error_message: "mock transcription error".to_string(),
        }
    }

    /// Configure a single response returned for every call.
    pub fn with_response(mut self, text: &str) -> Self {
        self.last_response = text.to_string();
        self
    }

    /// Configure a sequence of responses returned in order.
    pub fn with_responses(self, texts: &[&str]) -> Self {
        {
            let mut responses = lock_unpoisoned(&self.responses);
            for text in texts {
                responses.push_back((*text).to_string());
            }
        }
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

    /// Shared handle to the recorded (sample_count, language) calls.
    pub fn calls(&self) -> Arc<Mutex<Vec<(usize, String)>>> {
        self.calls.clone()
    }
}

impl Default for MockTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl Transcriber for MockTranscriber {
    fn transcribe(&mut self, samples: &[f32], language: &str) -> Result<String> {
        if self.should_fail {
            return Err(OverdubError::Transcription {
                message: self.error_message.clone(),
            });
        }

        lock_unpoisoned(&self.calls).push((samples.len(), language.to_string()));

        let mut responses = lock_unpoisoned(&self.responses);
        if let Some(next) = responses.pop_front() {
            self.last_response = next.clone();
            Ok(next)
        } else {
            Ok(self.last_response.clone())
        }
    }
}
