//! Single-slot text mailbox gating one slow writer against two reader roles.
//!
//! The transcribe/translate producer publishes one translated utterance at a
//! time. Two consumers with very different cadences read it: the overlay
//! renderer re-reads the same subtitle once per video frame, and the speech
//! synthesizer must speak each utterance exactly once. A write may only replace
//! the live slot once the overlay has read it `required_reads` times AND the
//! synthesizer has consumed it — both checks happen under the same mutex that
//! installs the replacement, so no reader can observe slot K+1 before slot K is
//! fully retired.

use crate::error::{OverdubError, Result};
use std::sync::{Condvar, Mutex};

/// The single in-flight translated utterance and its consumption bookkeeping.
#[derive(Debug, Clone)]
struct Slot {
    content: String,
    reads_done: u32,
    synth_consumed: bool,
    stamp: u64,
}

impl Slot {
    fn is_consumed(&self, required_reads: u32) -> bool {
        self.reads_done >= required_reads && self.synth_consumed
    }
}

#[derive(Debug)]
struct MailboxInner {
    slot: Option<Slot>,
    /// Stamp assigned to the next write. Starts at 1 so a `wait_for_fresh(0)`
    /// caller sees the very first slot.
    next_stamp: u64,
}

/// Monitor (mutex + condvar) implementing the gated single-slot protocol.
///
/// All four operations linearize through one lock; `write`, `read_overlay`,
/// `read_synth`, and `wait_for_fresh` may block indefinitely waiting for the
/// complementary role to make progress. None of them ever fail.
#[derive(Debug)]
pub struct TextMailbox {
    required_reads: u32,
    inner: Mutex<MailboxInner>,
    changed: Condvar,
}

impl TextMailbox {
    /// Creates a mailbox requiring `required_reads` overlay reads per slot.
    ///
    /// # Errors
    /// Fails fast with `ConfigInvalidValue` when `required_reads` is zero — a
    /// zero-read slot would let the writer overwrite subtitles that were never
    /// shown.
    pub fn new(required_reads: u32) -> Result<Self> {
        if required_reads == 0 {
            return Err(OverdubError::ConfigInvalidValue {
                key: "required_reads".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(Self {
            required_reads,
            inner: Mutex::new(MailboxInner {
                slot: None,
                next_stamp: 1,
            }),
            changed: Condvar::new(),
        })
    }

    /// Returns the configured overlay read count.
    pub fn required_reads(&self) -> u32 {
        self.required_reads
    }

    /// Publishes a new utterance, blocking until the live slot is fully consumed.
    ///
    /// Installs a fresh slot with zeroed bookkeeping and the next stamp, then
    /// wakes every waiter. Blocks indefinitely if a consumer role never
    /// completes its obligation — shutdown handles this by detaching the thread
    /// (see `PipelineHandle::stop`).
    pub fn write(&self, content: impl Into<String>) {
        let mut inner = self.lock_inner();
        while inner
            .slot
            .as_ref()
            .is_some_and(|slot| !slot.is_consumed(self.required_reads))
        {
            inner = self.wait_changed(inner);
        }

        let stamp = inner.next_stamp;
        inner.next_stamp += 1;
        inner.slot = Some(Slot {
            content: content.into(),
            reads_done: 0,
            synth_consumed: false,
            stamp,
        });
        self.changed.notify_all();
    }

    /// Overlay-role read: blocks until a slot exists, then returns its content.
    ///
    /// Each call up to `required_reads` counts toward retiring the slot; calls
    /// beyond the limit return the same content without counting (the renderer
    /// keeps redisplaying the subtitle while the writer prepares the next one).
    pub fn read_overlay(&self) -> String {
        let mut inner = self.lock_inner();
        while inner.slot.is_none() {
            inner = self.wait_changed(inner);
        }

        let required = self.required_reads;
        let mut became_consumed = false;
        let content = match inner.slot.as_mut() {
            Some(slot) => {
                if slot.reads_done < required {
                    slot.reads_done += 1;
                    became_consumed = slot.is_consumed(required);
                }
                slot.content.clone()
            }
            // Unreachable: the wait loop above only exits with a live slot.
            None => String::new(),
        };

        if became_consumed {
            // Slot fully retired — unblock a waiting writer.
            self.changed.notify_all();
        }
        content
    }

    /// Synth-role read: blocks until a slot exists, consumes it exactly once.
    ///
    /// The first call per slot returns `Some(content)`; every later call before
    /// the next write returns `None` so the synthesizer never re-speaks an
    /// utterance.
    pub fn read_synth(&self) -> Option<String> {
        let mut inner = self.lock_inner();
        while inner.slot.is_none() {
            inner = self.wait_changed(inner);
        }

        let required = self.required_reads;
        let mut became_consumed = false;
        let content = inner.slot.as_mut().and_then(|slot| {
            if slot.synth_consumed {
                None
            } else {
                slot.synth_consumed = true;
                became_consumed = slot.is_consumed(required);
                Some(slot.content.clone())
            }
        });

        if became_consumed {
            self.changed.notify_all();
        }
        content
    }

    /// Blocks until a slot newer than `last_seen` exists, then returns it.
    ///
    /// Next-new-value semantics independent of the counted-read protocol: the
    /// returned stamp feeds the next call. Pass 0 to receive the first slot
    /// ever written.
    pub fn wait_for_fresh(&self, last_seen: u64) -> (String, u64) {
        let mut inner = self.lock_inner();
        loop {
            if let Some(slot) = inner.slot.as_ref()
                && slot.stamp > last_seen
            {
                return (slot.content.clone(), slot.stamp);
            }
            inner = self.wait_changed(inner);
        }
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, MailboxInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn wait_changed<'a>(
        &self,
        guard: std::sync::MutexGuard<'a, MailboxInner>,
    ) -> std::sync::MutexGuard<'a, MailboxInner> {
        match self.changed.wait(guard) {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
