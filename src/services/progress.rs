//! Progress reporting service
//!
//! This module separates progress reporting from the pipeline itself, so the
//! CLI can draw a progress bar while library users stay silent.

use instant::Instant;

/// Phases of a bulk upload run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Extracting the archive into the scratch directory
    ArchiveStaging,
    /// Deriving product metadata from the staged tree
    ProductScan,
    /// Writing product descriptions
    DescriptionGeneration,
    /// Posting products to the ingestion endpoint
    Uploading,
    /// Removing the scratch directory
    Cleanup,
    /// Run finished
    Completed,
}

impl PipelineStage {
    /// Get a human-readable description of the stage
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            PipelineStage::ArchiveStaging => "Extracting archive",
            PipelineStage::ProductScan => "Gathering images and metadata",
            PipelineStage::DescriptionGeneration => "Writing product descriptions",
            PipelineStage::Uploading => "Uploading products",
            PipelineStage::Cleanup => "Cleaning up scratch directory",
            PipelineStage::Completed => "All uploads done",
        }
    }

    /// One-based position of the stage in a run
    #[must_use]
    pub fn step(&self) -> u8 {
        match self {
            PipelineStage::ArchiveStaging => 1,
            PipelineStage::ProductScan => 2,
            PipelineStage::DescriptionGeneration => 3,
            PipelineStage::Uploading => 4,
            PipelineStage::Cleanup => 5,
            PipelineStage::Completed => 6,
        }
    }
}

/// Stage change with timing information
#[derive(Debug, Clone)]
pub struct StageUpdate {
    pub stage: PipelineStage,
    /// Elapsed time since the run started (milliseconds)
    pub elapsed_ms: u64,
}

impl StageUpdate {
    #[must_use]
    pub fn new(stage: PipelineStage, run_started: Instant) -> Self {
        Self {
            stage,
            elapsed_ms: run_started.elapsed().as_millis() as u64,
        }
    }
}

/// Result of one upload attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    Failed,
}

/// Progress after one upload attempt
#[derive(Debug, Clone)]
pub struct UploadProgress {
    /// Zero-based index of the item just attempted
    pub index: usize,
    pub total: usize,
    pub title: String,
    pub outcome: UploadOutcome,
}

impl UploadProgress {
    /// Percentage of items attempted so far
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        (((self.index + 1) * 100) / self.total).min(100) as u8
    }
}

/// Trait for progress reporting implementations
pub trait ProgressReporter: Send + Sync {
    /// Report that the run entered a new stage
    fn report_stage(&self, update: StageUpdate);

    /// Uploads are about to start
    fn start_uploads(&self, total: usize);

    /// Report the outcome of one upload
    fn report_upload(&self, update: &UploadProgress);

    /// All uploads were attempted
    fn finish_uploads(&self, uploaded: usize, failed: usize);
}

/// No-op progress reporter that discards all updates
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report_stage(&self, _update: StageUpdate) {}

    fn start_uploads(&self, _total: usize) {}

    fn report_upload(&self, _update: &UploadProgress) {}

    fn finish_uploads(&self, _uploaded: usize, _failed: usize) {}
}

/// Progress reporter that writes plain log lines
pub struct ConsoleProgressReporter {
    verbose: bool,
}

impl ConsoleProgressReporter {
    /// Create a new console progress reporter
    ///
    /// # Arguments
    /// * `verbose` - Whether to include timings and per-item percentages
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report_stage(&self, update: StageUpdate) {
        if self.verbose {
            tracing::info!(
                "[{}/6] {} ({}ms elapsed)",
                update.stage.step(),
                update.stage.description(),
                update.elapsed_ms
            );
        } else {
            tracing::info!("[{}/6] {}", update.stage.step(), update.stage.description());
        }
    }

    fn start_uploads(&self, total: usize) {
        tracing::debug!(total, "Starting uploads");
    }

    fn report_upload(&self, update: &UploadProgress) {
        if self.verbose {
            tracing::debug!(
                "[{}%] {}/{} {}",
                update.percent(),
                update.index + 1,
                update.total,
                update.title
            );
        }
    }

    fn finish_uploads(&self, uploaded: usize, failed: usize) {
        tracing::info!("Uploads finished. Uploaded: {uploaded}, Failed: {failed}");
    }
}

/// Progress reporter drawing an indicatif bar over the upload loop
#[cfg(feature = "cli")]
pub struct BarProgressReporter {
    bar: indicatif::ProgressBar,
    inner: ConsoleProgressReporter,
}

#[cfg(feature = "cli")]
impl BarProgressReporter {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        let bar = indicatif::ProgressBar::hidden();
        if let Ok(style) = indicatif::ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }

        Self {
            bar,
            inner: ConsoleProgressReporter::new(verbose),
        }
    }
}

#[cfg(feature = "cli")]
impl ProgressReporter for BarProgressReporter {
    fn report_stage(&self, update: StageUpdate) {
        self.inner.report_stage(update);
    }

    fn start_uploads(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar
            .set_draw_target(indicatif::ProgressDrawTarget::stderr());
        self.inner.start_uploads(total);
    }

    fn report_upload(&self, update: &UploadProgress) {
        self.bar.set_message(update.title.clone());
        self.bar.inc(1);
        self.inner.report_upload(update);
    }

    fn finish_uploads(&self, uploaded: usize, failed: usize) {
        self.bar.finish_with_message(format!(
            "Completed! Uploaded: {uploaded}, Failed: {failed}"
        ));
        self.inner.finish_uploads(uploaded, failed);
    }
}

/// Create the progress reporter used by the CLI
///
/// # Arguments
/// * `show_bar` - Draw an indicatif bar during uploads
/// * `verbose` - Include timings in stage lines
#[cfg(feature = "cli")]
#[must_use]
pub fn create_cli_progress_reporter(show_bar: bool, verbose: bool) -> Box<dyn ProgressReporter> {
    if show_bar {
        Box::new(BarProgressReporter::new(verbose))
    } else {
        Box::new(ConsoleProgressReporter::new(verbose))
    }
}
