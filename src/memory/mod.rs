//! Shared coordination store for one translation session.
//!
//! `SessionMemory` composes the four entities every pipeline thread touches:
//! the single-slot text mailbox, the ingress and egress sample queues, and the
//! utterance history. It is the sole owner of all four — workers receive an
//! `Arc<SessionMemory>` and interact only through the role-scoped methods
//! below. Each entity carries its own lock; no operation spans two entities,
//! so no cross-entity atomicity is needed.
//!
//! One store exists per session. Reconfiguring (languages, read count) means
//! building a new store and a new pipeline around it; independent sessions can
//! coexist, e.g. under test.

pub mod history;
pub mod mailbox;
pub mod queue;

pub use history::{HistoryChannel, HistoryLog, Transcript};
pub use mailbox::TextMailbox;
pub use queue::SampleQueue;

use crate::error::Result;

/// The coordination store shared by the five pipeline threads.
#[derive(Debug)]
pub struct SessionMemory {
    mailbox: TextMailbox,
    ingress: SampleQueue,
    egress: SampleQueue,
    history: HistoryLog,
}

impl SessionMemory {
    /// Builds a store whose mailbox requires `required_reads` overlay reads
    /// per slot.
    ///
    /// # Errors
    /// Fails fast when `required_reads` is zero.
    pub fn new(required_reads: u32) -> Result<Self> {
        Ok(Self {
            mailbox: TextMailbox::new(required_reads)?,
            ingress: SampleQueue::new(),
            egress: SampleQueue::new(),
            history: HistoryLog::new(),
        })
    }

    pub fn required_reads(&self) -> u32 {
        self.mailbox.required_reads()
    }

    // ── Mailbox (producer + overlay/synth consumer roles) ────────────────

    /// Publishes a translated utterance; blocks until the previous slot is
    /// fully consumed by both reader roles.
    pub fn write(&self, content: impl Into<String>) {
        self.mailbox.write(content);
    }

    /// Overlay-role counted repeatable read. Blocks until a slot exists.
    pub fn read_overlay(&self) -> String {
        self.mailbox.read_overlay()
    }

    /// Synth-role single-consume read. Blocks until a slot exists; `None`
    /// once the current slot has already been spoken.
    pub fn read_synth(&self) -> Option<String> {
        self.mailbox.read_synth()
    }

    /// Blocks until a slot newer than `last_seen` exists.
    pub fn wait_for_fresh(&self, last_seen: u64) -> (String, u64) {
        self.mailbox.wait_for_fresh(last_seen)
    }

    // ── Audio relay queues ───────────────────────────────────────────────

    /// Appends captured microphone samples for the transcription stage.
    pub fn append_ingress(&self, samples: &[f32]) {
        self.ingress.append(samples);
    }

    /// Takes and clears all pending captured samples.
    pub fn drain_ingress(&self) -> Vec<f32> {
        self.ingress.drain()
    }

    pub fn ingress_len(&self) -> usize {
        self.ingress.len()
    }

    /// Appends synthesized waveform samples for the playback stage.
    pub fn append_egress(&self, samples: &[f32]) {
        self.egress.append(samples);
    }

    /// Takes and clears all pending synthesized samples.
    pub fn drain_egress(&self) -> Vec<f32> {
        self.egress.drain()
    }

    pub fn egress_len(&self) -> usize {
        self.egress.len()
    }

    // ── History ──────────────────────────────────────────────────────────

    /// Records one utterance on the chosen channel.
    pub fn append_history(&self, text: impl Into<String>, channel: HistoryChannel) {
        self.history.append(text, channel);
    }

    /// Owned copy of one channel's record so far.
    pub fn snapshot_history(&self, channel: HistoryChannel) -> Vec<String> {
        self.history.snapshot(channel)
    }

    /// Owned copy of both channels.
    pub fn transcript(&self) -> Transcript {
        self.history.transcript()
    }
}
