//! Product metadata derived from the staged folder layout
//!
//! Every image must live at least at `Gender/Category/file`. Folder names
//! become the gender and category, an optional third folder (the subcategory)
//! prefixes the title, and the file name is turned into a readable product title.

use crate::error::{BulkUploadError, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Image extensions accepted for upload (compared case-insensitively)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Gender, category and file name
pub const MIN_PATH_SEGMENTS: usize = 3;

/// Metadata derived for one image before a description exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductEntry {
    /// Image location on disk
    pub image_path: PathBuf,
    /// Location relative to the scratch root
    pub relative_path: PathBuf,
    pub title: String,
    pub gender: String,
    pub category: String,
}

/// Result of scanning the staged tree
#[derive(Debug, Clone, Default)]
pub struct ProductScan {
    /// Products in traversal order (sorted by relative path)
    pub entries: Vec<ProductEntry>,
    /// Images skipped for insufficient depth, relative to the scratch root
    pub skipped: Vec<PathBuf>,
    /// Files ignored because they are not images
    pub ignored: usize,
}

/// Check if file is an image based on extension
#[must_use]
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Title-case a string: letters following a letter are lowercased, all other
/// letters are uppercased.
#[must_use]
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;

    for c in input.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    out
}

/// Turn a folder name into a label: `women_wear` becomes `Women Wear`
#[must_use]
pub fn segment_label(segment: &str) -> String {
    title_case(&segment.replace(|c: char| c == '_' || c == '-', " "))
}

/// Turn a file name into a product title
///
/// The extension is dropped, runs of `_`/`-` and whitespace become single
/// spaces and the result is title-cased. Separators at either end are kept
/// as one space.
///
/// ```rust
/// use catalog_bulk_upload::catalog::pretty_title;
///
/// assert_eq!(pretty_title("winter_jacket--blue.JPG"), "Winter Jacket Blue");
/// assert_eq!(pretty_title("Red Scarf"), "Red Scarf");
/// assert_eq!(pretty_title("_silk_scarf.png"), " Silk Scarf");
/// ```
#[must_use]
pub fn pretty_title(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map_or_else(|| filename.to_string(), |s| s.to_string_lossy().into_owned());

    let mut collapsed = String::with_capacity(stem.len());
    let mut in_separator = false;
    for c in stem.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !in_separator {
                collapsed.push(' ');
            }
            in_separator = true;
        } else {
            collapsed.push(c);
            in_separator = false;
        }
    }

    title_case(&collapsed)
}

/// Derive product metadata from a path relative to the scratch root
///
/// # Errors
/// - `BulkUploadError::SkippedPath` when the path has fewer than
///   [`MIN_PATH_SEGMENTS`] segments
pub fn classify(relative_path: &Path) -> Result<(String, String, String)> {
    let segments: Vec<String> = relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.len() < MIN_PATH_SEGMENTS {
        return Err(BulkUploadError::skipped_path(relative_path));
    }
    let (Some(gender), Some(category), Some(file_name)) =
        (segments.first(), segments.get(1), segments.last())
    else {
        return Err(BulkUploadError::skipped_path(relative_path));
    };

    let title = match segments.get(2) {
        Some(subcategory) if segments.len() > MIN_PATH_SEGMENTS => {
            format!("{} {}", segment_label(subcategory), pretty_title(file_name))
        },
        _ => pretty_title(file_name),
    };
    Ok((title, segment_label(gender), segment_label(category)))
}

/// Walk the staged tree and derive metadata for every image
///
/// # Errors
/// - `BulkUploadError::Io` if the scratch root itself cannot be read
pub fn scan_products(root: &Path) -> Result<ProductScan> {
    let mut scan = ProductScan::default();

    if !root.is_dir() {
        return Err(BulkUploadError::file_io_error(
            "scan",
            root,
            &std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                continue;
            },
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !is_image_file(path) {
            tracing::debug!(path = %path.display(), "Ignoring non-image file");
            scan.ignored += 1;
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };

        match classify(relative) {
            Ok((title, gender, category)) => {
                tracing::trace!(%title, %gender, %category, "Derived product metadata");
                scan.entries.push(ProductEntry {
                    image_path: path.to_path_buf(),
                    relative_path: relative.to_path_buf(),
                    title,
                    gender,
                    category,
                });
            },
            Err(e) => {
                tracing::warn!("{}", e);
                scan.skipped.push(relative.to_path_buf());
            },
        }
    }

    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("women wear"), "Women Wear");
        assert_eq!(title_case("OUTERWEAR"), "Outerwear");
        assert_eq!(title_case("2nd skin"), "2Nd Skin");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_pretty_title() {
        assert_eq!(pretty_title("Red Scarf"), "Red Scarf");
        assert_eq!(pretty_title("winter_jacket-blue.JPG"), "Winter Jacket Blue");
        assert_eq!(pretty_title("__silk___scarf--.png"), " Silk Scarf ");
        assert_eq!(pretty_title("- _kurta.gif"), " Kurta");
        assert_eq!(pretty_title("linen   shirt.jpeg"), "Linen Shirt");
    }

    #[test]
    fn test_pretty_title_is_idempotent() {
        let once = pretty_title("kurta_set-embroidered.png");
        assert_eq!(pretty_title(&once), once);
    }

    #[test]
    fn test_segment_label() {
        assert_eq!(segment_label("women_wear"), "Women Wear");
        assert_eq!(segment_label("foot-wear"), "Foot Wear");
        assert_eq!(segment_label("outerwear"), "Outerwear");
    }

    #[test]
    fn test_classify_full_layout() {
        let (title, gender, category) =
            classify(Path::new("women_wear/outerwear/winter/winter_jacket-blue.JPG")).unwrap();
        assert_eq!(gender, "Women Wear");
        assert_eq!(category, "Outerwear");
        assert_eq!(title, "Winter Winter Jacket Blue");
    }

    #[test]
    fn test_classify_deeper_layout_uses_third_segment() {
        let (title, gender, category) =
            classify(Path::new("men/shoes/sneakers/limited/air-runner.png")).unwrap();
        assert_eq!(gender, "Men");
        assert_eq!(category, "Shoes");
        assert_eq!(title, "Sneakers Air Runner");
    }

    #[test]
    fn test_classify_without_subcategory() {
        let (title, gender, category) = classify(Path::new("men/shirts/shirt1.png")).unwrap();
        assert_eq!(gender, "Men");
        assert_eq!(category, "Shirts");
        assert_eq!(title, "Shirt1");
    }

    #[test]
    fn test_classify_shallow_paths_are_skipped() {
        for path in ["men/shirt1.png", "shirt1.png"] {
            let err = classify(Path::new(path)).unwrap_err();
            assert!(
                matches!(err, BulkUploadError::SkippedPath { .. }),
                "{path} should be skipped"
            );
        }
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a/b.JPG")));
        assert!(is_image_file(Path::new("a/b.jpeg")));
        assert!(is_image_file(Path::new("a/b.Gif")));
        assert!(is_image_file(Path::new("b.png")));
        assert!(!is_image_file(Path::new("b.webp")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("jpg")));
    }

    #[test]
    fn test_scan_products() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        let files = [
            "women_wear/outerwear/winter/winter_jacket-blue.JPG",
            "women_wear/accessories/scarves/red_scarf.png",
            "men/shirts/shirt1.png",
            "men/tee.png",
            "men/shirts/formal/readme.txt",
        ];
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"x").unwrap();
        }

        let scan = scan_products(root).unwrap();

        assert_eq!(scan.entries.len(), 3);
        assert_eq!(scan.skipped, vec![PathBuf::from("men/tee.png")]);
        assert_eq!(scan.ignored, 1);

        // Sorted traversal: men before women_wear, accessories before outerwear
        let titles: Vec<&str> = scan.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Shirt1", "Scarves Red Scarf", "Winter Winter Jacket Blue"]
        );
        assert_eq!(scan.entries[0].gender, "Men");
        assert!(scan.entries[1..].iter().all(|e| e.gender == "Women Wear"));
        assert!(scan.entries.iter().all(|e| e.image_path.starts_with(root)));
    }

    #[test]
    fn test_scan_missing_root() {
        let temp = TempDir::new().unwrap();
        assert!(scan_products(&temp.path().join("nope")).is_err());
    }
}
