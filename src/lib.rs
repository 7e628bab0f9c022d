#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Catalog Bulk Upload
//!
//! Batch importer for product images. A zip archive laid out as
//! `Gender/Category/[Subcategory/]image.jpg` is extracted into a scratch
//! directory, each image becomes a product whose title, gender and category
//! come from its path, a description is written (from a template or a
//! chat-completion service), and every product is posted to a catalog
//! ingestion endpoint as `multipart/form-data`.
//!
//! ## Features
//!
//! - **Archive staging**: fresh scratch directory per run, removed afterwards
//! - **Path metadata**: readable titles from file names, labels from folders
//! - **Descriptions**: templates, or an OpenAI-compatible chat API with fallback
//! - **Sequential uploads**: one request per product, failures never stop the batch
//! - **CLI Integration**: optional command-line interface (enable with `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use catalog_bulk_upload::{BulkUploader, UploadConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = UploadConfig::builder()
//!     .archive_path("pictures.zip")
//!     .endpoint("http://127.0.0.1:5001/api/products")
//!     .build()?;
//!
//! let summary = BulkUploader::new(config)?.run().await?;
//! println!("Uploaded {} of {}", summary.uploaded.len(), summary.products_found);
//! # Ok(())
//! # }
//! ```
//!
//! ### Feature Flags
//!
//! - `cli` (default): command-line interface, progress bar and subscriber setup
//! - `tracing-json`: JSON log output
//! - `tracing-files`: log to a file

pub mod archive;
pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod describe;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod tracing_config;
pub mod upload;

// Public API exports
pub use archive::{remove_scratch_dir, stage_archive, ScratchDir};
pub use catalog::{pretty_title, scan_products, ProductEntry, ProductScan};
pub use config::{TextGenerationConfig, UploadConfig, UploadConfigBuilder};
pub use describe::{DescriptionGenerator, OpenAiChatClient, TextGenerator};
pub use error::{BulkUploadError, Result};
pub use pipeline::{BulkUploader, RunSummary};
pub use services::{
    ConsoleProgressReporter, NoOpProgressReporter, PipelineStage, ProgressReporter,
    UploadOutcome, UploadProgress,
};
pub use upload::{UploadDispatcher, UploadFailure, UploadItem, UploadSummary};

pub use tracing_config::{events, spans, TracingConfig, TracingFormat, TracingOutput};
