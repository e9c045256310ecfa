//! Default configuration constants for overdub.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

use std::time::Duration;

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and provides a good balance
/// between quality and computational efficiency for voice applications.
pub const SAMPLE_RATE: u32 = 16000;

/// Default audio chunk size in samples for capture and playback.
pub const CHUNK_SIZE: usize = 1024;

/// Default number of overlay reads required before a subtitle slot may be replaced.
///
/// The overlay renderer reads once per video frame; three counted reads keep a
/// subtitle on screen across the expected inter-translation interval while the
/// next utterance is transcribed and translated.
pub const REQUIRED_OVERLAY_READS: u32 = 3;

/// Mean windowed RMS energy below which drained capture audio is treated as silence.
///
/// Silent intervals publish a single-space placeholder slot, which clears the
/// subtitle and is skipped by the synthesizer.
pub const SILENCE_RMS_THRESHOLD: f32 = 0.015;

/// Window size in samples for silence-energy estimation (10ms at 16kHz).
pub const ENERGY_WINDOW: usize = 160;

/// Default source language code for transcription.
pub const SOURCE_LANGUAGE: &str = "es";

/// Default target language code for translation and synthesis.
pub const TARGET_LANGUAGE: &str = "en";

/// Interval between producer utterances (transcribe + translate passes).
///
/// The producer drains the ingress queue once per interval; one second of
/// accumulated audio is the smallest unit worth sending to a speech model.
pub const UTTERANCE_INTERVAL: Duration = Duration::from_millis(1000);

/// Capture thread poll interval (~60Hz, matching typical device callback cadence).
pub const CAPTURE_POLL: Duration = Duration::from_millis(16);

/// Overlay frame interval (~30fps subtitle redisplay).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Synthesizer idle backoff when the current slot is already spoken.
pub const SYNTH_POLL: Duration = Duration::from_millis(10);

/// Playback thread poll interval while the egress queue is empty.
pub const PLAYBACK_POLL: Duration = Duration::from_millis(10);
