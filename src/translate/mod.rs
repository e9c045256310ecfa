//! Text translation seam.

use crate::error::{OverdubError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Trait for text-to-text translation engines.
pub trait Translator: Send {
    /// Translate `text` from `source_language` into `target_language`.
    fn translate(
        &mut self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String>;
}

/// Mock translator for testing.
///
/// Looks up scripted translations by input text, falling back to a
/// decorated echo (`"<text> [lang]"`) for anything unscripted.
#[derive(Debug, Clone)]
pub struct MockTranslator {
    translations: HashMap<String, String>,
    calls: Arc<Mutex<Vec<String>>>,
    should_fail: bool,
    error_message: String,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self {
            translations: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
            error_message: "mock translation error".to_string(),
        }
    }

    /// Map an input text to a fixed translation.
    pub fn with_translation(mut self, input: &str, output: &str) -> Self {
        self.translations.insert(input.to_string(), output.to_string());
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

    /// Shared handle to the texts passed in, in call order.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

impl Default for MockTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for MockTranslator {
    fn translate(
        &mut self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String> {
        if self.should_fail {
            return Err(OverdubError::Translation {
                message: self.error_message.clone(),
            });
        }

        match self.calls.lock() {
            Ok(mut calls) => calls.push(text.to_string()),
            Err(poisoned) => poisoned.into_inner().push(text.to_string()),
        }

        Ok(self
            .translations
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("{} [{}]", text, target_language)))
    }
}
