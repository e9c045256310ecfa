//! Audio capture and playback.

#[cfg(feature = "cpal-audio")]
pub mod capture;
pub mod output;
pub mod source;
pub mod wav;

#[cfg(feature = "cpal-audio")]
pub use capture::{CpalAudioSource, list_devices};
pub use output::{AudioOutput, CollectingAudioOutput};
pub use source::{AudioSource, FramePhase, MockAudioSource};
pub use wav::WavAudioSource;
