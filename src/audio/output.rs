use crate::error::{OverdubError, Result};
use std::sync::{Arc, Mutex};

/// Trait for audio playback devices.
///
/// The playback worker drains synthesized waveforms from the egress queue and
/// hands them here in fixed-size chunks. Real device backends, loopback sinks,
/// and the test collector all sit behind this seam.
pub trait AudioOutput: Send {
    /// Start the playback stream.
    fn start(&mut self) -> Result<()>;

    /// Stop the playback stream.
    fn stop(&mut self) -> Result<()>;

    /// Write one chunk of f32 PCM samples to the device.
    fn write_chunk(&mut self, samples: &[f32]) -> Result<()>;
}

/// Audio output that collects everything written to it. Used in tests and as
/// a loopback sink when no playback device is wanted.
#[derive(Debug, Clone, Default)]
pub struct CollectingAudioOutput {
    written: Arc<Mutex<Vec<f32>>>,
    is_started: bool,
    should_fail_write: bool,
}

impl CollectingAudioOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the collector to fail on write.
    pub fn with_write_failure(mut self) -> Self {
        self.should_fail_write = true;
        self
    }

    /// Shared handle to the collected samples, usable after the output has
    /// been moved into the pipeline.
    pub fn written(&self) -> Arc<Mutex<Vec<f32>>> {
        self.written.clone()
    }

    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl AudioOutput for CollectingAudioOutput {
    fn start(&mut self) -> Result<()> {
        self.is_started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn write_chunk(&mut self, samples: &[f32]) -> Result<()> {
        if self.should_fail_write {
            return Err(OverdubError::AudioPlayback {
                message: "mock playback error".to_string(),
            });
        }
        match self.written.lock() {
            Ok(mut written) => written.extend_from_slice(samples),
            Err(poisoned) => poisoned.into_inner().extend_from_slice(samples),
        }
        Ok(())
    }
}
