//! Services shared by the pipeline and its frontends

pub mod progress;

#[cfg(feature = "cli")]
pub use progress::{create_cli_progress_reporter, BarProgressReporter};
pub use progress::{
    ConsoleProgressReporter, NoOpProgressReporter, PipelineStage, ProgressReporter, StageUpdate,
    UploadOutcome, UploadProgress,
};
