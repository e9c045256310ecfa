//! Error types for overdub.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverdubError {
    // Configuration errors
    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio capture/playback errors
    #[error("Audio device not found: {device}")]
    AudioDeviceNotFound { device: String },

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    #[error("Audio playback failed: {message}")]
    AudioPlayback { message: String },

    // Inference-stage errors (surfaced by external collaborators)
    #[error("Transcription error: {message}")]
    Transcription { message: String },

    #[error("Translation error: {message}")]
    Translation { message: String },

    #[error("Speech synthesis error: {message}")]
    Synthesis { message: String },

    // History export errors
    #[error("Transcript export failed: {message}")]
    TranscriptExport { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, OverdubError>;
