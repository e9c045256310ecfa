//! Translation pipeline that runs from startup until shutdown.

use crate::audio::{AudioOutput, AudioSource};
use crate::defaults;
use crate::error::Result;
use crate::memory::{SessionMemory, Transcript};
use crate::overlay::SubtitleSink;
use crate::pipeline::capture::CaptureWorker;
use crate::pipeline::error::{ErrorReporter, LogReporter};
use crate::pipeline::overlay::OverlayWorker;
use crate::pipeline::playback::PlaybackWorker;
use crate::pipeline::synth::SynthWorker;
use crate::pipeline::translator::TranslatorWorker;
use crate::pipeline::worker::WorkerRunner;
use crate::stt::Transcriber;
use crate::translate::Translator;
use crate::tts::Synthesizer;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Events emitted while the pipeline runs.
///
/// Sent on a non-blocking crossbeam channel when one is configured, so a
/// control surface can stream captions without touching the session memory.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A new caption was produced and published.
    CaptionPublished { original: String, translated: String },
}

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Language spoken into the microphone
    pub source_language: String,
    /// Language captions and speech are produced in
    pub target_language: String,
    /// Overlay reads required before a caption may be replaced
    pub required_reads: u32,
    /// Playback chunk size in samples
    pub chunk_size: usize,
    /// How often the capture worker polls the audio source
    pub capture_poll: Duration,
    /// Minimum spacing between processed utterances
    pub utterance_interval: Duration,
    /// Caption refresh interval (one video frame)
    pub frame_interval: Duration,
    /// Synth worker poll interval when the slot is already consumed
    pub synth_poll: Duration,
    /// Playback worker poll interval when the egress queue is empty
    pub playback_poll: Duration,
    /// Optional event sender for caption streaming (crossbeam, non-blocking)
    pub event_tx: Option<crossbeam_channel::Sender<PipelineEvent>>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
            target_language: defaults::TARGET_LANGUAGE.to_string(),
            required_reads: defaults::REQUIRED_OVERLAY_READS,
            chunk_size: defaults::CHUNK_SIZE,
            capture_poll: defaults::CAPTURE_POLL,
            utterance_interval: defaults::UTTERANCE_INTERVAL,
            frame_interval: defaults::FRAME_INTERVAL,
            synth_poll: defaults::SYNTH_POLL,
            playback_poll: defaults::PLAYBACK_POLL,
            event_tx: None,
        }
    }
}

impl PipelineConfig {
    /// Builds a pipeline config from a loaded [`crate::config::Config`].
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            source_language: config.translation.source_language.clone(),
            target_language: config.translation.target_language.clone(),
            required_reads: config.memory.required_reads,
            chunk_size: config.audio.chunk_size,
            ..Default::default()
        }
    }
}

/// Handle to a running pipeline.
pub struct PipelineHandle {
    /// Flag to signal shutdown
    running: Arc<AtomicBool>,
    /// Join handles for spawned threads
    threads: Vec<JoinHandle<()>>,
    /// Shared session memory, kept for transcript access after stop
    memory: Arc<SessionMemory>,
}

impl PipelineHandle {
    /// Stops the pipeline and returns the session transcript.
    ///
    /// Waits up to 1s for threads to finish. Workers blocked on the caption
    /// mailbox cannot observe the shutdown flag, so after the deadline the
    /// remaining threads are detached — they die with the process.
    pub fn stop(mut self) -> Transcript {
        // Signal shutdown
        self.running.store(false, Ordering::SeqCst);

        let deadline = Instant::now() + Duration::from_secs(1);
        let poll_interval = Duration::from_millis(50);

        loop {
            // Drain finished threads, joining each to catch panics
            let mut remaining = Vec::new();
            for handle in self.threads.drain(..) {
                if handle.is_finished() {
                    if let Err(panic_info) = handle.join() {
                        let msg = panic_info
                            .downcast_ref::<&str>()
                            .copied()
                            .or_else(|| panic_info.downcast_ref::<String>().map(|s| s.as_str()))
                            .unwrap_or("unknown panic");
                        eprintln!("overdub: pipeline thread panicked: {msg}");
                    }
                } else {
                    remaining.push(handle);
                }
            }
            self.threads = remaining;

            if self.threads.is_empty() {
                break;
            }

            if Instant::now() >= deadline {
                eprintln!(
                    "overdub: shutdown timeout — {} thread(s) still running, detaching",
                    self.threads.len()
                );
                // Dropping JoinHandles detaches threads; they die with the process.
                break;
            }

            thread::sleep(poll_interval);
        }

        self.memory.transcript()
    }

    /// Returns true if the pipeline is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Shared session memory of the running pipeline.
    pub fn memory(&self) -> Arc<SessionMemory> {
        self.memory.clone()
    }

    /// Snapshot of the transcript so far, without stopping.
    pub fn transcript(&self) -> Transcript {
        self.memory.transcript()
    }
}

/// Translation pipeline: capture → translator → {overlay, synth → playback},
/// coordinated through a shared [`SessionMemory`].
pub struct Pipeline {
    config: PipelineConfig,
    error_reporter: Arc<dyn ErrorReporter>,
}

impl Pipeline {
    /// Creates a new pipeline with default error reporter.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            error_reporter: Arc::new(LogReporter),
        }
    }

    /// Sets a custom error reporter.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Starts the pipeline.
    ///
    /// # Arguments
    /// * `audio_source` - Audio capture source
    /// * `transcriber` - Speech-to-text engine
    /// * `translator` - Text translation engine
    /// * `synthesizer` - Text-to-speech engine
    /// * `subtitle_sink` - Caption display surface
    /// * `audio_output` - Playback device for synthesized speech
    ///
    /// # Returns
    /// Handle to control and stop the pipeline
    pub fn start(
        self,
        audio_source: Box<dyn AudioSource>,
        transcriber: Box<dyn Transcriber>,
        translator: Box<dyn Translator>,
        synthesizer: Box<dyn Synthesizer>,
        subtitle_sink: Box<dyn SubtitleSink>,
        audio_output: Box<dyn AudioOutput>,
    ) -> Result<PipelineHandle> {
        let memory = Arc::new(SessionMemory::new(self.config.required_reads)?);
        let running = Arc::new(AtomicBool::new(true));

        let capture = CaptureWorker::new(audio_source, memory.clone());

        let mut translator_worker = TranslatorWorker::new(
            memory.clone(),
            transcriber,
            translator,
            &self.config.source_language,
            &self.config.target_language,
        );
        if let Some(ref event_tx) = self.config.event_tx {
            translator_worker = translator_worker.with_event_sender(event_tx.clone());
        }

        let overlay = OverlayWorker::new(memory.clone(), subtitle_sink);
        let synth = SynthWorker::new(
            memory.clone(),
            synthesizer,
            &self.config.target_language,
        );
        let playback = PlaybackWorker::new(memory.clone(), audio_output, self.config.chunk_size);

        let runners = [
            WorkerRunner::spawn(
                capture,
                running.clone(),
                self.config.capture_poll,
                self.error_reporter.clone(),
            ),
            WorkerRunner::spawn(
                translator_worker,
                running.clone(),
                self.config.utterance_interval,
                self.error_reporter.clone(),
            ),
            WorkerRunner::spawn(
                overlay,
                running.clone(),
                self.config.frame_interval,
                self.error_reporter.clone(),
            ),
            WorkerRunner::spawn(
                synth,
                running.clone(),
                self.config.synth_poll,
                self.error_reporter.clone(),
            ),
            WorkerRunner::spawn(
                playback,
                running.clone(),
                self.config.playback_poll,
                self.error_reporter.clone(),
            ),
        ];

        let threads = runners
            .into_iter()
            .filter_map(|mut runner| runner.take_handle())
            .collect();

        Ok(PipelineHandle {
            running,
            threads,
            memory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{CollectingAudioOutput, FramePhase, MockAudioSource};
    use crate::overlay::CollectorSink;
    use crate::stt::MockTranscriber;
    use crate::translate::MockTranslator;
    use crate::tts::MockSynthesizer;

    /// Fast intervals so tests complete in tens of milliseconds.
    fn test_config() -> PipelineConfig {
        PipelineConfig {
            required_reads: 1,
            capture_poll: Duration::from_millis(1),
            utterance_interval: Duration::from_millis(5),
            frame_interval: Duration::from_millis(1),
            synth_poll: Duration::from_millis(1),
            playback_poll: Duration::from_millis(1),
            ..Default::default()
        }
    }

    fn loud_phase(count: u32) -> FramePhase {
        FramePhase {
            samples: (0..1600)
                .map(|i| if i % 2 == 0 { 0.8 } else { -0.8 })
                .collect(),
            count,
        }
    }

    #[test]
    fn test_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.source_language, "es");
        assert_eq!(config.target_language, "en");
        assert_eq!(config.required_reads, 3);
        assert_eq!(config.chunk_size, 1024);
        assert!(config.event_tx.is_none());
    }

    #[test]
    fn test_config_from_loaded_config() {
        let mut loaded = crate::config::Config::default();
        loaded.translation.source_language = "de".to_string();
        loaded.memory.required_reads = 7;

        let config = PipelineConfig::from_config(&loaded);
        assert_eq!(config.source_language, "de");
        assert_eq!(config.required_reads, 7);
        assert_eq!(config.utterance_interval, defaults::UTTERANCE_INTERVAL);
    }

    #[test]
    fn test_start_rejects_zero_required_reads() {
        let config = PipelineConfig {
            required_reads: 0,
            ..test_config()
        };
        let result = Pipeline::new(config).start(
            Box::new(MockAudioSource::new()),
            Box::new(MockTranscriber::new()),
            Box::new(MockTranslator::new()),
            Box::new(MockSynthesizer::new()),
            Box::new(CollectorSink::new()),
            Box::new(CollectingAudioOutput::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_handle_is_running() {
        let running = Arc::new(AtomicBool::new(true));
        let handle = PipelineHandle {
            running: running.clone(),
            threads: vec![],
            memory: Arc::new(SessionMemory::new(1).unwrap()),
        };

        assert!(handle.is_running());

        running.store(false, Ordering::SeqCst);
        assert!(!handle.is_running());
    }

    #[test]
    fn test_handle_stop_sets_running_false() {
        let running = Arc::new(AtomicBool::new(true));
        let handle = PipelineHandle {
            running: running.clone(),
            threads: vec![],
            memory: Arc::new(SessionMemory::new(1).unwrap()),
        };

        let _transcript = handle.stop();
        assert!(!running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_stop_timeout_on_stuck_thread() {
        let running = Arc::new(AtomicBool::new(true));

        let stuck_running = running.clone();
        let stuck_handle = thread::spawn(move || {
            while stuck_running.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(10));
            }
            // Simulate being stuck even after running=false
            thread::park();
        });

        let handle = PipelineHandle {
            running: running.clone(),
            threads: vec![stuck_handle],
            memory: Arc::new(SessionMemory::new(1).unwrap()),
        };

        let start = Instant::now();
        let _transcript = handle.stop();
        let elapsed = start.elapsed();

        assert!(
            elapsed < Duration::from_secs(5),
            "stop() took {:?} — should complete within the deadline even with stuck threads",
            elapsed
        );
        assert!(!running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_pipeline_end_to_end_with_mocks() {
        let audio_source = Box::new(MockAudioSource::new().with_frame_sequence(vec![loud_phase(1)]));
        let transcriber = Box::new(MockTranscriber::new().with_response("hola mundo"));
        let translator =
            Box::new(MockTranslator::new().with_translation("Hola mundo", "Hello world"));
        let synthesizer = Box::new(MockSynthesizer::new().with_samples_per_char(10));

        let sink = CollectorSink::new();
        let shown = sink.shown();
        let output = CollectingAudioOutput::new();
        let written = output.written();

        let handle = Pipeline::new(test_config())
            .start(
                audio_source,
                transcriber,
                translator,
                synthesizer,
                Box::new(sink),
                Box::new(output),
            )
            .unwrap();
        assert!(handle.is_running());

        // Wait for the caption to reach both consumers.
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            let spoken = !written.lock().unwrap().is_empty();
            let displayed = shown
                .lock()
                .unwrap()
                .iter()
                .any(|t| t == "Hello world");
            if spoken && displayed {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }

        let transcript = handle.stop();

        assert_eq!(transcript.original, vec!["Hola mundo"]);
        assert_eq!(transcript.translated, vec!["Hello world"]);
        assert!(shown.lock().unwrap().iter().any(|t| t == "Hello world"));
        // "Hello world" is 11 chars at 10 samples each.
        assert_eq!(written.lock().unwrap().len(), 110);
    }

    #[test]
    fn test_pipeline_emits_caption_events() {
        let (event_tx, event_rx) = crossbeam_channel::unbounded();
        let config = PipelineConfig {
            event_tx: Some(event_tx),
            ..test_config()
        };

        let audio_source = Box::new(MockAudioSource::new().with_frame_sequence(vec![loud_phase(1)]));
        let transcriber = Box::new(MockTranscriber::new().with_response("hola"));
        let translator = Box::new(MockTranslator::new().with_translation("Hola", "Hello"));

        let handle = Pipeline::new(config)
            .start(
                audio_source,
                transcriber,
                translator,
                Box::new(MockSynthesizer::new()),
                Box::new(CollectorSink::new()),
                Box::new(CollectingAudioOutput::new()),
            )
            .unwrap();

        let event = event_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(
            event,
            PipelineEvent::CaptionPublished {
                original: "Hola".to_string(),
                translated: "Hello".to_string(),
            }
        );

        let _transcript = handle.stop();
    }

    #[test]
    fn test_pipeline_silent_audio_produces_no_transcript() {
        let audio_source = Box::new(
            MockAudioSource::new()
                .with_frame_sequence(vec![FramePhase {
                    samples: vec![0.001; 1600],
                    count: 1,
                }]),
        );
        let transcriber = Box::new(MockTranscriber::new().with_response("should not appear"));

        let sink = CollectorSink::new();
        let shown = sink.shown();

        let handle = Pipeline::new(test_config())
            .start(
                audio_source,
                transcriber,
                Box::new(MockTranslator::new()),
                Box::new(MockSynthesizer::new()),
                Box::new(sink),
                Box::new(CollectingAudioOutput::new()),
            )
            .unwrap();

        // Wait for the placeholder caption to show.
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if !shown.lock().unwrap().is_empty() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }

        let transcript = handle.stop();
        assert!(transcript.original.is_empty());
        assert!(transcript.translated.is_empty());
        assert!(shown.lock().unwrap().iter().all(|t| t == " "));
    }

    #[test]
    fn test_pipeline_source_start_failure_stops_cleanly() {
        let audio_source = Box::new(MockAudioSource::new().with_start_failure());

        let handle = Pipeline::new(test_config())
            .start(
                audio_source,
                Box::new(MockTranscriber::new()),
                Box::new(MockTranslator::new()),
                Box::new(MockSynthesizer::new()),
                Box::new(CollectorSink::new()),
                Box::new(CollectingAudioOutput::new()),
            )
            .unwrap();

        thread::sleep(Duration::from_millis(50));

        let transcript = handle.stop();
        assert!(transcript.original.is_empty());
    }
}
