//! Worker threads and orchestration for the live translation pipeline.

pub mod capture;
pub mod error;
pub mod orchestrator;
pub mod overlay;
pub mod playback;
pub mod synth;
pub mod translator;
pub mod worker;

pub use capture::CaptureWorker;
pub use error::{ErrorReporter, LogReporter, WorkerError};
pub use orchestrator::{Pipeline, PipelineConfig, PipelineEvent, PipelineHandle};
pub use overlay::OverlayWorker;
pub use playback::PlaybackWorker;
pub use synth::SynthWorker;
pub use translator::TranslatorWorker;
pub use worker::{StepOutcome, Worker, WorkerRunner};
