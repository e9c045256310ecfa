//! Unbounded drain-all relay queue for raw audio samples.
//!
//! Two instances bridge the device threads and the inference stages: the
//! ingress queue carries captured microphone samples to the transcriber, the
//! egress queue carries synthesized waveforms to playback. Appends and drains
//! never block beyond the critical section; growth is unbounded when the
//! consumer stalls, which callers can observe through `len`.

use std::sync::Mutex;

/// Mutex-protected sample buffer with destructive whole-queue drains.
#[derive(Debug, Default)]
pub struct SampleQueue {
    samples: Mutex<Vec<f32>>,
}

impl SampleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends samples to the tail. O(1) amortized, never blocks, never fails.
    pub fn append(&self, samples: &[f32]) {
        self.lock().extend_from_slice(samples);
    }

    /// Atomically returns and clears all queued samples.
    ///
    /// Returns an empty vector when nothing is queued. Two consecutive drains
    /// yield the full content then nothing.
    pub fn drain(&self) -> Vec<f32> {
        std::mem::take(&mut *self.lock())
    }

    /// Current queue depth in samples (high-water observer, does not consume).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<f32>> {
        match self.samples.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
