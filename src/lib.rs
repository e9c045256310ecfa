//! overdub - Live speech-to-speech translation for the desktop
//!
//! Captures speech in one language, shows translated captions, and speaks
//! the translation aloud. Five worker threads coordinate through a shared
//! session memory instead of channels: a single-slot caption mailbox, two
//! audio relay queues, and an append-only transcript log.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod config;
pub mod defaults;
pub mod error;
pub mod memory;
pub mod overlay;
pub mod pipeline;
pub mod stt;
pub mod translate;
pub mod tts;

// Core traits (capture → translate → overlay/speak)
pub use audio::{AudioOutput, AudioSource};
pub use overlay::{CollectorSink, StdoutSink, SubtitleSink};
pub use stt::Transcriber;
pub use translate::Translator;
pub use tts::Synthesizer;

// Session memory
pub use memory::{HistoryChannel, SessionMemory, Transcript};

// Pipeline
pub use pipeline::orchestrator::{Pipeline, PipelineConfig, PipelineEvent, PipelineHandle};

// Error handling
pub use error::{OverdubError, Result};

// Config
pub use config::Config;

// Worker framework (for advanced users)
pub use pipeline::error::{ErrorReporter, WorkerError};
pub use pipeline::worker::Worker;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
