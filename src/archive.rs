//! Archive staging and scratch directory lifetime
//!
//! The archive is extracted into a scratch directory owned by a single run.
//! [`ScratchDir`] removes that directory when the run cleans up or when the
//! guard is dropped on an early return.

use crate::error::{BulkUploadError, Result};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Guard over a staged scratch directory
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    entries: usize,
}

impl ScratchDir {
    /// Root of the staged tree
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries (files and folders) the archive held
    #[must_use]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Remove the scratch directory now
    pub fn cleanup(self) {
        drop(self);
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        remove_scratch_dir(&self.path);
    }
}

/// Remove a scratch directory, logging but otherwise ignoring failures
pub fn remove_scratch_dir(path: &Path) {
    if !path.exists() {
        return;
    }

    match fs::remove_dir_all(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed scratch directory"),
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove scratch directory"
        ),
    }
}

/// Extract `archive_path` into a fresh `scratch_dir`
///
/// Any previous contents of `scratch_dir` are removed first. Entry names that
/// would resolve outside the scratch directory are rejected by the zip reader.
///
/// # Errors
/// - `BulkUploadError::Archive` if the archive is missing, unreadable or corrupt,
///   or the scratch directory cannot be created. Nothing is left on disk in that case.
pub fn stage_archive(archive_path: &Path, scratch_dir: &Path) -> Result<ScratchDir> {
    remove_scratch_dir(scratch_dir);

    tracing::info!(
        archive = %archive_path.display(),
        scratch_dir = %scratch_dir.display(),
        "Extracting archive"
    );

    match extract_into(archive_path, scratch_dir) {
        Ok(entries) => {
            tracing::debug!(entries, "Archive extracted");
            Ok(ScratchDir {
                path: scratch_dir.to_path_buf(),
                entries,
            })
        },
        Err(e) => {
            remove_scratch_dir(scratch_dir);
            Err(e)
        },
    }
}

fn extract_into(archive_path: &Path, scratch_dir: &Path) -> Result<usize> {
    let file = File::open(archive_path)
        .map_err(|e| BulkUploadError::archive_error("open archive", archive_path, e))?;

    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| BulkUploadError::archive_error("read archive", archive_path, e))?;

    fs::create_dir_all(scratch_dir)
        .map_err(|e| BulkUploadError::archive_error("create scratch directory", scratch_dir, e))?;

    archive
        .extract(scratch_dir)
        .map_err(|e| BulkUploadError::archive_error("extract archive", archive_path, e))?;

    Ok(archive.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn write_archive(path: &Path, files: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        for (name, data) in files {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_stage_preserves_hierarchy() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pictures.zip");
        write_archive(
            &archive,
            &[
                ("women/dresses/summer/floral_dress.jpg", b"jpg"),
                ("men/shirts/formal/oxford.png", b"png"),
            ],
        );

        let scratch = temp.path().join("scratch");
        let staged = stage_archive(&archive, &scratch).unwrap();

        assert_eq!(staged.entries(), 2);
        assert_eq!(
            fs::read(scratch.join("women/dresses/summer/floral_dress.jpg")).unwrap(),
            b"jpg"
        );
        assert!(scratch.join("men/shirts/formal/oxford.png").is_file());

        staged.cleanup();
        assert!(!scratch.exists());
    }

    #[test]
    fn test_stage_clears_previous_contents() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pictures.zip");
        write_archive(&archive, &[("a/b/c/new.gif", b"gif")]);

        let scratch = temp.path().join("scratch");
        fs::create_dir_all(scratch.join("left/over")).unwrap();
        fs::write(scratch.join("left/over/stale.jpg"), b"stale").unwrap();

        let staged = stage_archive(&archive, &scratch).unwrap();
        assert!(!scratch.join("left").exists());
        assert!(staged.path().join("a/b/c/new.gif").is_file());
    }

    #[test]
    fn test_missing_archive_is_archive_error() {
        let temp = TempDir::new().unwrap();
        let scratch = temp.path().join("scratch");

        let err = stage_archive(&temp.path().join("missing.zip"), &scratch).unwrap_err();
        assert!(matches!(err, BulkUploadError::Archive(_)));
        assert!(err.is_fatal());
        assert!(!scratch.exists());
    }

    #[test]
    fn test_corrupt_archive_is_archive_error() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.zip");
        fs::write(&archive, b"this is not a zip file").unwrap();
        let scratch = temp.path().join("scratch");

        let err = stage_archive(&archive, &scratch).unwrap_err();
        assert!(matches!(err, BulkUploadError::Archive(_)));
        assert!(err.to_string().contains("broken.zip"));
        assert!(!scratch.exists());
    }

    #[test]
    fn test_guard_removes_on_drop() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pictures.zip");
        write_archive(&archive, &[("x/y/z/pic.jpeg", b"1")]);
        let scratch = temp.path().join("scratch");

        {
            let _staged = stage_archive(&archive, &scratch).unwrap();
            assert!(scratch.exists());
        }
        assert!(!scratch.exists());
    }

    #[test]
    fn test_remove_missing_scratch_is_noop() {
        let temp = TempDir::new().unwrap();
        remove_scratch_dir(&temp.path().join("never-created"));
    }
}
