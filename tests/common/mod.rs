//! Shared helpers for the integration tests

#![allow(dead_code)]

use catalog_bulk_upload::UploadConfig;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Minimal bytes standing in for image content
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

/// Scratch space for one test run: the archive and scratch dir live inside
pub struct Workspace {
    pub temp: TempDir,
    pub archive: PathBuf,
    pub scratch: PathBuf,
}

impl Workspace {
    /// Create a workspace whose archive holds `files`
    pub fn with_files(files: &[(&str, &[u8])]) -> Self {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pictures.zip");
        let scratch = temp.path().join("temp_bulk_upload");
        write_archive(&archive, files);
        Self {
            temp,
            archive,
            scratch,
        }
    }

    /// Template-mode configuration pointing at `endpoint`
    pub fn config(&self, endpoint: &str) -> UploadConfig {
        UploadConfig::builder()
            .archive_path(&self.archive)
            .scratch_dir(&self.scratch)
            .endpoint(endpoint)
            .build()
            .unwrap()
    }
}

/// Write a zip archive containing `files` at `path`
pub fn write_archive(path: &Path, files: &[(&str, &[u8])]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    for (name, data) in files {
        zip.start_file(*name, FileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

/// Endpoint URL on a mock server
pub fn products_url(server_uri: &str) -> String {
    format!("{server_uri}/api/products")
}
