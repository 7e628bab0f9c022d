//! Error types for bulk upload operations

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for bulk upload operations
pub type Result<T> = std::result::Result<T, BulkUploadError>;

/// Directory layout every product image must follow inside the archive
pub const EXPECTED_LAYOUT: &str = "[Gender]/[Category]/[Subcategory]/image";

/// Error types for the bulk upload pipeline
#[derive(Error, Debug)]
pub enum BulkUploadError {
    /// Archive missing, unreadable or corrupt. Aborts the run.
    #[error("Archive error: {0}")]
    Archive(String),

    /// A file sits too shallow in the staged tree to carry product metadata
    #[error("Skipping {}: needs {}", .path.display(), EXPECTED_LAYOUT)]
    SkippedPath {
        /// Path relative to the scratch root
        path: PathBuf,
    },

    /// Text-generation service failed; the caller falls back to a template
    #[error("Description generation error: {0}")]
    DescriptionGeneration(String),

    /// A single upload failed
    #[error("Upload failed for {}: {reason}", .path.display())]
    Upload {
        /// Image that was being uploaded
        path: PathBuf,
        /// Transport error, status line or file error
        reason: String,
        /// Response body text, when the server answered at all
        body: Option<String>,
    },

    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP client could not be set up
    #[error("Network error: {0}")]
    Network(String),
}

impl BulkUploadError {
    /// Create a new archive error
    pub fn archive<S: Into<String>>(msg: S) -> Self {
        Self::Archive(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new description generation error
    pub fn description<S: Into<String>>(msg: S) -> Self {
        Self::DescriptionGeneration(msg.into())
    }

    /// Create a skipped path error
    pub fn skipped_path<P: AsRef<Path>>(path: P) -> Self {
        Self::SkippedPath {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create archive error with operation context
    pub fn archive_error<P: AsRef<Path>, E: std::fmt::Display>(
        operation: &str,
        path: P,
        error: E,
    ) -> Self {
        Self::Archive(format!(
            "Failed to {} '{}': {}",
            operation,
            path.as_ref().display(),
            error
        ))
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<Path>>(operation: &str, path: P, error: &std::io::Error) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// Create network error with context
    pub fn network_error<E: std::fmt::Display>(context: &str, error: E) -> Self {
        Self::Network(format!("{}: {}", context, error))
    }

    /// Create upload error for a given image
    pub fn upload_error<P: AsRef<Path>, S: Into<String>>(
        path: P,
        reason: S,
        body: Option<String>,
    ) -> Self {
        Self::Upload {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
            body,
        }
    }

    /// Create configuration error with valid ranges
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
        recommended: Option<T>,
    ) -> Self {
        let recommendation = match recommended {
            Some(rec) => format!(" Recommended: {}", rec),
            None => String::new(),
        };

        Self::InvalidConfig(format!(
            "Invalid {}: {} (valid range: {}).{}",
            parameter, value, valid_range, recommendation
        ))
    }

    /// Whether this error terminates a run rather than a single item
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Archive(_) | Self::InvalidConfig(_) | Self::Network(_) | Self::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BulkUploadError::invalid_config("test config error");
        assert!(matches!(err, BulkUploadError::InvalidConfig(_)));

        let err = BulkUploadError::archive("corrupt");
        assert!(matches!(err, BulkUploadError::Archive(_)));
    }

    #[test]
    fn test_error_display() {
        let err = BulkUploadError::invalid_config("Empty endpoint");
        assert_eq!(err.to_string(), "Invalid configuration: Empty endpoint");

        let err = BulkUploadError::skipped_path("men/shirt1.png");
        assert_eq!(
            err.to_string(),
            "Skipping men/shirt1.png: needs [Gender]/[Category]/[Subcategory]/image"
        );
    }

    #[test]
    fn test_enhanced_error_context() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = BulkUploadError::archive_error("open archive", Path::new("pictures.zip"), io_error);
        let error_string = err.to_string();
        assert!(error_string.contains("open archive"));
        assert!(error_string.contains("pictures.zip"));

        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = BulkUploadError::file_io_error("read image", Path::new("/tmp/a.jpg"), &io_error);
        assert!(err.to_string().contains("read image"));
        assert!(err.to_string().contains("/tmp/a.jpg"));

        let err = BulkUploadError::config_value_error("max tokens", 0, "1-4096", Some(60));
        let error_string = err.to_string();
        assert!(error_string.contains("max tokens"));
        assert!(error_string.contains("1-4096"));
        assert!(error_string.contains("Recommended: 60"));
    }

    #[test]
    fn test_upload_error_keeps_body() {
        let err = BulkUploadError::upload_error(
            "men/tops/tees/a.jpg",
            "HTTP status server error (500 Internal Server Error)",
            Some("boom".to_string()),
        );
        match &err {
            BulkUploadError::Upload { path, body, .. } => {
                assert_eq!(path, Path::new("men/tops/tees/a.jpg"));
                assert_eq!(body.as_deref(), Some("boom"));
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("Upload failed for men/tops/tees/a.jpg"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(BulkUploadError::archive("bad").is_fatal());
        assert!(BulkUploadError::invalid_config("bad").is_fatal());
        assert!(!BulkUploadError::skipped_path("a.jpg").is_fatal());
        assert!(!BulkUploadError::description("quota").is_fatal());
        assert!(!BulkUploadError::upload_error("a.jpg", "refused", None).is_fatal());
    }
}
