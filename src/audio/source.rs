use crate::error::{OverdubError, Result};

/// Trait for audio capture devices.
///
/// This trait allows swapping implementations (real audio device, WAV file,
/// or mock). Samples are f32 PCM in the range [-1.0, 1.0].
pub trait AudioSource: Send + Sync {
    /// Start capturing audio from the source.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing audio from the source.
    fn stop(&mut self) -> Result<()>;

    /// Read whatever samples have accumulated since the last call.
    ///
    /// An empty vector from a live source means "nothing yet"; from a finite
    /// source it means the source is exhausted.
    fn read_samples(&mut self) -> Result<Vec<f32>>;

    /// Whether this source runs out (file/pipe) or captures forever (mic).
    fn is_finite(&self) -> bool {
        false
    }
}

/// One phase of a scripted frame sequence for the mock source.
#[derive(Debug, Clone)]
pub struct FramePhase {
    /// Samples returned by each read in this phase.
    pub samples: Vec<f32>,
    /// Number of reads this phase lasts.
    pub count: u32,
}

/// Mock audio source for testing
#[derive(Debug, Clone)]
pub struct MockAudioSource {
    is_started: bool,
    phases: Vec<FramePhase>,
    phase_index: usize,
    reads_in_phase: u32,
    finite: bool,
    should_fail_start: bool,
    should_fail_read: bool,
    error_message: String,
}

impl MockAudioSource {
    /// Create a new mock audio source producing silent frames forever.
    pub fn new() -> Self {
        Self {
            is_started: false,
            phases: vec![FramePhase {
                samples: vec![0.0; 160],
                count: u32::MAX,
            }],
            phase_index: 0,
            reads_in_phase: 0,
            finite: true,
            should_fail_start: false,
            should_fail_read: false,
            error_message: "mock audio error".to_string(),
        }
    }

    /// Configure the mock to return a fixed frame on every read.
    pub fn with_samples(mut self, samples: Vec<f32>) -> Self {
        self.phases = vec![FramePhase {
            samples,
            count: u32::MAX,
        }];
        self
    }

    /// Configure the mock to play a sequence of phases, then run out.
    pub fn with_frame_sequence(mut self, phases: Vec<FramePhase>) -> Self {
        self.phases = phases;
        self.phase_index = 0;
        self.reads_in_phase = 0;
        self
    }

    /// Treat exhaustion as "nothing yet" instead of end-of-source.
    pub fn as_live_source(mut self) -> Self {
        self.finite = false;
        self
    }

    /// Configure the mock to fail on start
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on read
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_read = true;
        self
    }

    /// Configure the error message for failures
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl Default for MockAudioSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for MockAudioSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            Err(OverdubError::AudioCapture {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = true;
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<f32>> {
        if self.should_fail_read {
            return Err(OverdubError::AudioCapture {
                message: self.error_message.clone(),
            });
        }

        while let Some(phase) = self.phases.get(self.phase_index) {
            if self.reads_in_phase < phase.count {
                self.reads_in_phase += 1;
                return Ok(phase.samples.clone());
            }
            self.phase_index += 1;
            self.reads_in_phase = 0;
        }

        // Sequence exhausted.
        Ok(Vec::new())
    }

    fn is_finite(&self) -> bool {
        self.finite
    }
}
