//! Append-only record of original and translated utterances.
//!
//! The producer appends to both channels in pipeline order (original first,
//! then its translation) so the two sequences stay parallel. Snapshots are
//! owned copies; nothing handed out aliases the internal state. Locking is
//! independent from the mailbox and queues.

use crate::error::{OverdubError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

/// Which side of an utterance to record or snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryChannel {
    Original,
    Translated,
}

#[derive(Debug, Default)]
struct HistoryInner {
    original: Vec<String>,
    translated: Vec<String>,
}

/// Thread-safe two-channel utterance log.
#[derive(Debug, Default)]
pub struct HistoryLog {
    inner: Mutex<HistoryInner>,
}

/// Owned session transcript, serializable for export to the GUI or disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub original: Vec<String>,
    pub translated: Vec<String>,
}

impl Transcript {
    /// Serializes the transcript as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| OverdubError::TranscriptExport {
            message: e.to_string(),
        })
    }

    /// Writes the transcript as JSON to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one utterance to the chosen channel. O(1), never blocks beyond
    /// the critical section.
    pub fn append(&self, text: impl Into<String>, channel: HistoryChannel) {
        let mut inner = self.lock();
        match channel {
            HistoryChannel::Original => inner.original.push(text.into()),
            HistoryChannel::Translated => inner.translated.push(text.into()),
        }
    }

    /// Returns an owned copy of everything recorded on `channel` so far.
    pub fn snapshot(&self, channel: HistoryChannel) -> Vec<String> {
        let inner = self.lock();
        match channel {
            HistoryChannel::Original => inner.original.clone(),
            HistoryChannel::Translated => inner.translated.clone(),
        }
    }

    /// Returns both channels as one owned transcript.
    pub fn transcript(&self) -> Transcript {
        let inner = self.lock();
        Transcript {
            original: inner.original.clone(),
            translated: inner.translated.clone(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HistoryInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
