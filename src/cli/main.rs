//! Bulk upload CLI
//!
//! Command-line interface around [`BulkUploader`]. Running without flags uses
//! the built-in defaults for archive, endpoint and scratch directory.

use super::config::CliConfigBuilder;
use crate::{
    config::{DEFAULT_ARCHIVE_PATH, DEFAULT_ENDPOINT, DEFAULT_SCRATCH_DIR},
    config::{DEFAULT_MAX_TOKENS, DEFAULT_TEXT_GENERATION_BASE_URL, DEFAULT_TEXT_GENERATION_MODEL},
    pipeline::{BulkUploader, RunSummary},
    services::create_cli_progress_reporter,
    tracing_config::{events, TracingConfig, TracingFormat},
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Upload product images from a zip archive to a catalog backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "catalog-bulk-upload")]
pub struct Cli {
    /// Zip archive laid out as Gender/Category/[Subcategory/]image
    #[arg(short, long, value_name = "ZIP", default_value = DEFAULT_ARCHIVE_PATH)]
    pub archive: PathBuf,

    /// Catalog ingestion endpoint
    #[arg(short, long, value_name = "URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Scratch directory for extraction (deleted before and after the run)
    #[arg(long, value_name = "DIR", default_value = DEFAULT_SCRATCH_DIR)]
    pub scratch_dir: PathBuf,

    /// API key for generated descriptions; templates are used when empty
    #[arg(long, value_name = "KEY", default_value = "", hide_default_value = true)]
    pub openai_api_key: String,

    /// Chat model used for descriptions
    #[arg(long, value_name = "MODEL", default_value = DEFAULT_TEXT_GENERATION_MODEL)]
    pub openai_model: String,

    /// Base URL of the chat-completion API
    #[arg(long, value_name = "URL", default_value = DEFAULT_TEXT_GENERATION_BASE_URL)]
    pub openai_base_url: String,

    /// Token cap for each generated description
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long, value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Disable the upload progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = CliLogFormat::Console)]
    pub log_format: CliLogFormat,

    /// Write logs to this file instead of the console
    #[cfg(feature = "tracing-files")]
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliLogFormat {
    Console,
    Compact,
    #[cfg(feature = "tracing-json")]
    Json,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(&cli).await.map(|_| ())
}

/// Run the CLI with already parsed arguments
///
/// # Errors
/// - Invalid arguments
/// - Archive staging failures (nothing is uploaded in that case)
pub async fn run(cli: &Cli) -> Result<RunSummary> {
    init_tracing(cli).context("Failed to initialize tracing")?;

    CliConfigBuilder::validate_cli(cli).context("Invalid CLI arguments")?;
    let config = CliConfigBuilder::from_cli(cli).context("Failed to build configuration")?;

    info!("Archive: {}", config.archive_path.display());
    info!("Endpoint: {}", config.endpoint);
    if config.text_generation.is_enabled() {
        info!("Descriptions: {} via {}", config.text_generation.model, config.text_generation.base_url);
    } else {
        info!("Descriptions: template");
    }

    let uploader = BulkUploader::new(config)
        .context("Failed to create bulk uploader")?
        .with_progress_reporter(create_cli_progress_reporter(!cli.no_progress, cli.verbose > 0));

    let summary = match uploader.run().await {
        Ok(summary) => summary,
        Err(e) => {
            events::error_with_context(&e, "bulk upload aborted");
            return Err(e).context("Bulk upload aborted");
        },
    };

    print_summary(&summary);
    Ok(summary)
}

/// Initialize tracing based on verbosity level and log flags
fn init_tracing(cli: &Cli) -> Result<()> {
    let format = match cli.log_format {
        CliLogFormat::Console => TracingFormat::Console,
        CliLogFormat::Compact => TracingFormat::Compact,
        #[cfg(feature = "tracing-json")]
        CliLogFormat::Json => TracingFormat::Json,
    };

    #[allow(unused_mut)]
    let mut config = TracingConfig::new()
        .with_verbosity(cli.verbose)
        .with_format(format)
        .with_session_id(uuid::Uuid::new_v4().to_string());

    #[cfg(feature = "tracing-files")]
    if let Some(path) = &cli.log_file {
        config = config.with_output(crate::tracing_config::TracingOutput::File(path.clone()));
    }

    config
        .init()
        .context("Failed to initialize tracing subscriber")
}

fn print_summary(summary: &RunSummary) {
    info!("Upload summary:");
    info!("  ├─ Archive entries: {}", summary.archive_entries);
    info!("  ├─ Products found: {}", summary.products_found);
    info!("  ├─ Skipped paths: {}", summary.skipped);
    info!("  ├─ Uploaded: {}", summary.uploaded.len());
    info!("  └─ Failed: {}", summary.failed.len());

    if !summary.is_complete() {
        warn!("Some products failed to upload:");
        for failure in &summary.failed {
            error!("  • {}: {}", failure.image_path.display(), failure.error);
        }
    }

    info!("All uploads done!");
}
