//! Upload dispatcher for the catalog ingestion endpoint
//!
//! Items are posted one at a time as `multipart/form-data`. A failed item is
//! recorded and the dispatcher moves on to the next one; nothing is retried.

use crate::catalog::ProductEntry;
use crate::error::{BulkUploadError, Result};
use crate::services::{ProgressReporter, UploadOutcome, UploadProgress};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::Instrument;

/// Multipart field carrying the image bytes
pub const IMAGE_FIELD: &str = "image_file";

/// One product ready to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    pub image_path: PathBuf,
    pub title: String,
    pub description: String,
    pub gender: String,
    pub category: String,
}

impl UploadItem {
    /// Attach a description to scanned product metadata
    #[must_use]
    pub fn from_entry(entry: ProductEntry, description: String) -> Self {
        Self {
            image_path: entry.image_path,
            title: entry.title,
            description,
            gender: entry.gender,
            category: entry.category,
        }
    }
}

/// A failed upload as reported to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub image_path: PathBuf,
    pub error: String,
    pub body: Option<String>,
}

/// Outcome of uploading a batch
#[derive(Debug, Clone, Default)]
pub struct UploadSummary {
    /// Titles uploaded successfully, in upload order
    pub uploaded: Vec<String>,
    pub failed: Vec<UploadFailure>,
}

impl UploadSummary {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.uploaded.len() + self.failed.len()
    }
}

/// MIME type sent with the image part
#[must_use]
pub fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Posts upload items to the ingestion endpoint
#[derive(Debug, Clone)]
pub struct UploadDispatcher {
    client: Client,
    endpoint: String,
}

impl UploadDispatcher {
    #[must_use]
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn build_form(item: &UploadItem) -> Result<Form> {
        let bytes = tokio::fs::read(&item.image_path).await.map_err(|e| {
            BulkUploadError::upload_error(&item.image_path, format!("failed to read image: {e}"), None)
        })?;

        let file_name = item
            .image_path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

        let image = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(&item.image_path))
            .map_err(|e| BulkUploadError::upload_error(&item.image_path, e.to_string(), None))?;

        Ok(Form::new()
            .text("title", item.title.clone())
            .text("description", item.description.clone())
            .text("gender", item.gender.clone())
            .text("category", item.category.clone())
            .part(IMAGE_FIELD, image))
    }

    /// Upload a single item
    ///
    /// # Errors
    /// - `BulkUploadError::Upload` when the image cannot be read, the request
    ///   fails, or the endpoint answers with a non-2xx status (body included)
    pub async fn upload(&self, item: &UploadItem) -> Result<()> {
        let form = Self::build_form(item).await?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BulkUploadError::upload_error(&item.image_path, e.to_string(), None))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let reason = response
            .error_for_status_ref()
            .err()
            .map_or_else(|| format!("HTTP status {status}"), |e| e.to_string());
        let body = response.text().await.ok();
        Err(BulkUploadError::upload_error(&item.image_path, reason, body))
    }

    /// Upload every item in order, reporting each outcome
    pub async fn upload_all(
        &self,
        items: &[UploadItem],
        progress: &dyn ProgressReporter,
    ) -> UploadSummary {
        let mut summary = UploadSummary::default();
        progress.start_uploads(items.len());

        for (index, item) in items.iter().enumerate() {
            let span = crate::tracing_config::spans::upload(&item.image_path, &item.title);

            let outcome = match self.upload(item).instrument(span).await {
                Ok(()) => {
                    tracing::info!(
                        "Uploaded: {} ({} / {})",
                        item.title,
                        item.gender,
                        item.category
                    );
                    summary.uploaded.push(item.title.clone());
                    UploadOutcome::Uploaded
                },
                Err(e) => {
                    let (error, body) = match e {
                        BulkUploadError::Upload { reason, body, .. } => (reason, body),
                        other => (other.to_string(), None),
                    };
                    tracing::error!(
                        "Failed for {}: {} / {}",
                        item.image_path.display(),
                        error,
                        body.as_deref().unwrap_or_default()
                    );
                    summary.failed.push(UploadFailure {
                        image_path: item.image_path.clone(),
                        error,
                        body,
                    });
                    UploadOutcome::Failed
                },
            };

            progress.report_upload(&UploadProgress {
                index,
                total: items.len(),
                title: item.title.clone(),
                outcome,
            });
        }

        progress.finish_uploads(summary.uploaded.len(), summary.failed.len());
        summary
    }
}
