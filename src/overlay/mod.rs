//! Subtitle display seam.

use crate::error::Result;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Trait for subtitle display surfaces.
///
/// The overlay worker refreshes the current caption at the video frame
/// rate. Implementations render it wherever captions live, such as a
/// terminal line or a window overlay.
pub trait SubtitleSink: Send {
    /// Display the current caption text.
    fn show(&mut self, text: &str) -> Result<()>;
}

/// Subtitle sink that records every text shown. Used in tests.
#[derive(Debug, Clone, Default)]
pub struct CollectorSink {
    shown: Arc<Mutex<Vec<String>>>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the captions shown, in display order.
    pub fn shown(&self) -> Arc<Mutex<Vec<String>>> {
        self.shown.clone()
    }
}

impl SubtitleSink for CollectorSink {
    fn show(&mut self, text: &str) -> Result<()> {
        match self.shown.lock() {
            Ok(mut shown) => shown.push(text.to_string()),
            Err(poisoned) => poisoned.into_inner().push(text.to_string()),
        }
        Ok(())
    }
}

/// Subtitle sink that rewrites a single terminal line in place.
#[derive(Debug, Default)]
pub struct StdoutSink {
    last_shown: String,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubtitleSink for StdoutSink {
    fn show(&mut self, text: &str) -> Result<()> {
        // Skip the redraw when nothing changed; captions repeat every frame.
        if text == self.last_shown {
            return Ok(());
        }

        let mut stdout = std::io::stdout().lock();
        write!(stdout, "\r\x1b[2K{}", text)?;
        stdout.flush()?;
        self.last_shown = text.to_string();
        Ok(())
    }
}
