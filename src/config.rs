//! Configuration types for the bulk upload pipeline

use crate::error::{BulkUploadError, Result};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Catalog ingestion endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5001/api/products";

/// Archive read when none is configured
pub const DEFAULT_ARCHIVE_PATH: &str = "pictures.zip";

/// Scratch directory the archive is extracted into
pub const DEFAULT_SCRATCH_DIR: &str = "temp_bulk_upload";

/// Base URL of the chat-completion API
pub const DEFAULT_TEXT_GENERATION_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat model asked for product descriptions
pub const DEFAULT_TEXT_GENERATION_MODEL: &str = "gpt-3.5-turbo";

/// Token cap for a generated description
pub const DEFAULT_MAX_TOKENS: u32 = 60;

const MAX_TOKENS_LIMIT: u32 = 4096;

/// Settings for the optional text-generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGenerationConfig {
    /// API key; blank disables enhanced descriptions
    pub api_key: String,

    /// Base URL, `/chat/completions` is appended
    pub base_url: String,

    /// Model name sent with each request
    pub model: String,

    /// Completion token cap
    pub max_tokens: u32,
}

impl Default for TextGenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_TEXT_GENERATION_BASE_URL.to_string(),
            model: DEFAULT_TEXT_GENERATION_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl TextGenerationConfig {
    /// Whether descriptions should be requested from the service
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Full chat-completions URL
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Configuration for one bulk upload run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Zip archive holding the product images
    pub archive_path: PathBuf,

    /// Scratch directory owned by the run (deleted before and after)
    pub scratch_dir: PathBuf,

    /// Catalog ingestion endpoint
    pub endpoint: String,

    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,

    /// Text-generation settings
    pub text_generation: TextGenerationConfig,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_PATH),
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: None,
            text_generation: TextGenerationConfig::default(),
        }
    }
}

impl UploadConfig {
    /// Create a new configuration builder
    ///
    /// # Examples
    ///
    /// ```rust
    /// use catalog_bulk_upload::UploadConfig;
    ///
    /// let config = UploadConfig::builder()
    ///     .archive_path("spring.zip")
    ///     .endpoint("http://localhost:5001/api/products")
    ///     .build()
    ///     .unwrap();
    /// assert!(!config.text_generation.is_enabled());
    /// ```
    #[must_use]
    pub fn builder() -> UploadConfigBuilder {
        UploadConfigBuilder::default()
    }

    /// Validate all configuration parameters
    ///
    /// # Validation Rules
    ///
    /// - Endpoint and text-generation base URL: absolute http(s) URLs
    /// - Max tokens: 1-4096
    /// - Archive path: non-empty
    /// - Scratch directory: non-empty, not the filesystem root, not the current directory
    /// - Request timeout: non-zero when set
    ///
    /// # Errors
    /// - `BulkUploadError::InvalidConfig` describing the first rule that failed
    pub fn validate(&self) -> Result<()> {
        validate_http_url("endpoint", &self.endpoint)?;
        validate_http_url("text generation base URL", &self.text_generation.base_url)?;

        if self.text_generation.max_tokens == 0
            || self.text_generation.max_tokens > MAX_TOKENS_LIMIT
        {
            return Err(BulkUploadError::config_value_error(
                "max tokens",
                self.text_generation.max_tokens,
                "1-4096",
                Some(DEFAULT_MAX_TOKENS),
            ));
        }

        if self.text_generation.model.trim().is_empty() {
            return Err(BulkUploadError::invalid_config(
                "Text generation model must not be empty",
            ));
        }

        if self.archive_path.as_os_str().is_empty() {
            return Err(BulkUploadError::invalid_config(
                "Archive path must not be empty",
            ));
        }

        validate_scratch_dir(&self.scratch_dir)?;

        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(BulkUploadError::invalid_config(
                "Request timeout must be greater than zero",
            ));
        }

        Ok(())
    }
}

fn validate_http_url(name: &str, value: &str) -> Result<()> {
    let url = reqwest::Url::parse(value)
        .map_err(|e| BulkUploadError::invalid_config(format!("Invalid {name} '{value}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(BulkUploadError::invalid_config(format!(
            "Invalid {name} '{value}': unsupported scheme '{other}'"
        ))),
    }
}

/// The scratch directory is removed recursively, so refuse paths that would wipe
/// the working tree or the filesystem.
fn validate_scratch_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(BulkUploadError::invalid_config(
            "Scratch directory must not be empty",
        ));
    }

    let only_root_or_cur = path.components().all(|c| {
        matches!(
            c,
            Component::RootDir | Component::Prefix(_) | Component::CurDir
        )
    });
    if only_root_or_cur {
        return Err(BulkUploadError::invalid_config(format!(
            "Refusing to use '{}' as scratch directory",
            path.display()
        )));
    }

    Ok(())
}

/// Builder for `UploadConfig`
#[derive(Debug, Default)]
pub struct UploadConfigBuilder {
    config: UploadConfig,
}

impl UploadConfigBuilder {
    /// Set archive path
    #[must_use]
    pub fn archive_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.archive_path = path.into();
        self
    }

    /// Set scratch directory
    #[must_use]
    pub fn scratch_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.scratch_dir = path.into();
        self
    }

    /// Set ingestion endpoint
    #[must_use]
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set per-request timeout
    #[must_use]
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set text-generation API key (blank keeps template descriptions)
    #[must_use]
    pub fn api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.config.text_generation.api_key = key.into();
        self
    }

    /// Set text-generation base URL
    #[must_use]
    pub fn text_generation_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.config.text_generation.base_url = url.into();
        self
    }

    /// Set text-generation model
    #[must_use]
    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.config.text_generation.model = model.into();
        self
    }

    /// Set completion token cap
    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.config.text_generation.max_tokens = max_tokens;
        self
    }

    /// Build the configuration with validation
    ///
    /// # Errors
    /// - Any rule checked by [`UploadConfig::validate`]
    pub fn build(self) -> Result<UploadConfig> {
        let config = self.config;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = UploadConfig::default();
        assert_eq!(config.archive_path, PathBuf::from("pictures.zip"));
        assert_eq!(config.scratch_dir, PathBuf::from("temp_bulk_upload"));
        assert_eq!(config.endpoint, "http://127.0.0.1:5001/api/products");
        assert!(config.request_timeout.is_none());
        assert!(!config.text_generation.is_enabled());
        assert_eq!(config.text_generation.max_tokens, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = UploadConfig::builder()
            .archive_path("drop.zip")
            .scratch_dir("/tmp/drop")
            .endpoint("https://catalog.example.com/api/products")
            .api_key("sk-test")
            .model("gpt-4o-mini")
            .max_tokens(80)
            .request_timeout(Some(Duration::from_secs(30)))
            .build()
            .unwrap();

        assert_eq!(config.archive_path, PathBuf::from("drop.zip"));
        assert_eq!(config.scratch_dir, PathBuf::from("/tmp/drop"));
        assert!(config.text_generation.is_enabled());
        assert_eq!(config.text_generation.model, "gpt-4o-mini");
        assert_eq!(config.text_generation.max_tokens, 80);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_blank_api_key_is_disabled() {
        let config = UploadConfig::builder().api_key("   ").build().unwrap();
        assert!(!config.text_generation.is_enabled());
    }

    #[test]
    fn test_completions_url() {
        let mut text = TextGenerationConfig::default();
        assert_eq!(
            text.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
        text.base_url = "http://127.0.0.1:9999/".to_string();
        assert_eq!(text.completions_url(), "http://127.0.0.1:9999/chat/completions");
    }

    #[test]
    fn test_config_validation() {
        assert!(UploadConfig::builder().endpoint("not a url").build().is_err());
        assert!(UploadConfig::builder()
            .endpoint("ftp://example.com/upload")
            .build()
            .is_err());
        assert!(UploadConfig::builder().max_tokens(0).build().is_err());
        assert!(UploadConfig::builder().max_tokens(5000).build().is_err());
        assert!(UploadConfig::builder().model(" ").build().is_err());
        assert!(UploadConfig::builder().archive_path("").build().is_err());
        assert!(UploadConfig::builder()
            .request_timeout(Some(Duration::ZERO))
            .build()
            .is_err());
    }

    #[test]
    fn test_dangerous_scratch_dirs_rejected() {
        assert!(UploadConfig::builder().scratch_dir("").build().is_err());
        assert!(UploadConfig::builder().scratch_dir(".").build().is_err());
        assert!(UploadConfig::builder().scratch_dir("/").build().is_err());
        assert!(UploadConfig::builder().scratch_dir("./scratch").build().is_ok());
    }
}
