//! Bulk upload pipeline
//!
//! stage archive → gather metadata → write descriptions → upload → clean up.
//! Every phase runs to completion before the next starts and each upload is
//! awaited before the next one is sent.

use crate::archive::{stage_archive, ScratchDir};
use crate::catalog::{scan_products, ProductScan};
use crate::config::UploadConfig;
use crate::describe::{DescriptionGenerator, TextGenerator};
use crate::error::{BulkUploadError, Result};
use crate::services::{NoOpProgressReporter, PipelineStage, ProgressReporter, StageUpdate};
use crate::tracing_config::{events, spans};
use crate::upload::{UploadDispatcher, UploadFailure, UploadItem, UploadSummary};
use instant::Instant;
use reqwest::Client;
use tracing::Instrument;

/// What a finished run did
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Entries (files and folders) in the archive
    pub archive_entries: usize,
    /// Products found with enough path depth
    pub products_found: usize,
    /// Images skipped for insufficient depth
    pub skipped: usize,
    /// Titles uploaded successfully
    pub uploaded: Vec<String>,
    /// Uploads that failed
    pub failed: Vec<UploadFailure>,
}

impl RunSummary {
    fn new(archive_entries: usize, scan: &ProductScan, uploads: UploadSummary) -> Self {
        Self {
            archive_entries,
            products_found: scan.entries.len(),
            skipped: scan.skipped.len(),
            uploaded: uploads.uploaded,
            failed: uploads.failed,
        }
    }

    /// Whether every found product was uploaded
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs the bulk upload pipeline for one configuration
pub struct BulkUploader {
    config: UploadConfig,
    describer: DescriptionGenerator,
    dispatcher: UploadDispatcher,
    progress: Box<dyn ProgressReporter>,
}

impl BulkUploader {
    /// Validate the configuration and build the HTTP collaborators
    ///
    /// # Errors
    /// - `BulkUploadError::InvalidConfig` for invalid settings
    /// - `BulkUploadError::Network` if the HTTP client cannot be built
    pub fn new(config: UploadConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BulkUploadError::network_error("Failed to create HTTP client", e))?;

        let describer = DescriptionGenerator::from_config(client.clone(), &config.text_generation);
        let dispatcher = UploadDispatcher::new(client, config.endpoint.clone());

        Ok(Self {
            config,
            describer,
            dispatcher,
            progress: Box::new(NoOpProgressReporter),
        })
    }

    /// Replace the progress reporter
    #[must_use]
    pub fn with_progress_reporter(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Replace the text-generation backend (enables enhanced descriptions)
    #[must_use]
    pub fn with_text_generator(mut self, backend: Box<dyn TextGenerator>) -> Self {
        self.describer =
            DescriptionGenerator::with_backend(backend, self.config.text_generation.max_tokens);
        self
    }

    #[must_use]
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Run the whole pipeline
    ///
    /// Per-item failures end up in the returned summary; the scratch directory
    /// is removed whether or not uploads succeed.
    ///
    /// # Errors
    /// - `BulkUploadError::Archive` if the archive cannot be staged (nothing is uploaded)
    /// - `BulkUploadError::Io` if the staged tree cannot be scanned
    pub async fn run(&self) -> Result<RunSummary> {
        let span = spans::session(&self.config.archive_path, &self.config.endpoint);
        self.run_phases().instrument(span).await
    }

    async fn run_phases(&self) -> Result<RunSummary> {
        let started = Instant::now();

        self.enter(PipelineStage::ArchiveStaging, started);
        let scratch = {
            let _span = spans::archive_staging(&self.config.scratch_dir).entered();
            stage_archive(&self.config.archive_path, &self.config.scratch_dir)?
        };
        let archive_entries = scratch.entries();

        self.enter(PipelineStage::ProductScan, started);
        let scan = scan_products(scratch.path())?;
        tracing::info!("Found {} products to upload.", scan.entries.len());
        if !scan.skipped.is_empty() {
            tracing::warn!(
                "Skipped {} image(s) not under Gender/Category folders",
                scan.skipped.len()
            );
        }

        self.enter(PipelineStage::DescriptionGeneration, started);
        let items = self.describe_all(&scan).await;

        self.enter(PipelineStage::Uploading, started);
        let uploads = self.dispatcher.upload_all(&items, self.progress.as_ref()).await;

        self.enter(PipelineStage::Cleanup, started);
        Self::cleanup(scratch);

        self.enter(PipelineStage::Completed, started);
        events::performance_metric("bulk_upload", started.elapsed().as_millis() as u64);

        Ok(RunSummary::new(archive_entries, &scan, uploads))
    }

    async fn describe_all(&self, scan: &ProductScan) -> Vec<UploadItem> {
        let enhanced = self.describer.is_enhanced();
        let mut items = Vec::with_capacity(scan.entries.len());

        for entry in &scan.entries {
            let description = self
                .describer
                .describe(&entry.title, &entry.gender, &entry.category)
                .instrument(spans::description(&entry.title, enhanced))
                .await;
            items.push(UploadItem::from_entry(entry.clone(), description));
        }

        items
    }

    fn cleanup(scratch: ScratchDir) {
        tracing::debug!(path = %scratch.path().display(), "Removing scratch directory");
        scratch.cleanup();
    }

    fn enter(&self, stage: PipelineStage, started: Instant) {
        self.progress.report_stage(StageUpdate::new(stage, started));
    }
}
