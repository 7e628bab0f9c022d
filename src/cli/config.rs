//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::Cli;
use crate::config::UploadConfig;
use anyhow::{bail, Context, Result};
use std::time::Duration;

/// Convert CLI arguments to an `UploadConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build `UploadConfig` from CLI arguments
    pub(crate) fn from_cli(cli: &Cli) -> Result<UploadConfig> {
        let config = UploadConfig::builder()
            .archive_path(&cli.archive)
            .scratch_dir(&cli.scratch_dir)
            .endpoint(cli.endpoint.trim())
            .request_timeout(cli.timeout_secs.map(Duration::from_secs))
            .api_key(cli.openai_api_key.trim())
            .text_generation_base_url(cli.openai_base_url.trim())
            .model(cli.openai_model.trim())
            .max_tokens(cli.max_tokens)
            .build()
            .context("Configuration validation failed")?;

        Ok(config)
    }

    /// Validate CLI arguments for consistency
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        if cli.timeout_secs == Some(0) {
            bail!("--timeout-secs must be at least 1");
        }

        if cli.archive == cli.scratch_dir {
            bail!(
                "Archive and scratch directory must differ: {}",
                cli.archive.display()
            );
        }

        if cli.archive.is_dir() {
            bail!("Archive path is a directory: {}", cli.archive.display());
        }

        Ok(())
    }
}
