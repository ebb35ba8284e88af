//! Image discovery and ordering
//!
//! Images are matched to manuscript pages by position, so the order must be
//! stable across runs: numbered files first by the value of their first digit
//! run, then unnumbered files alphabetically.

use crate::constants::IMAGE_EXTENSIONS;
use crate::types::Result;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Ordering key extracted from an image file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSortKey {
    /// Value of the first run of ASCII digits in the stem. `None` sorts last.
    pub number: Option<u128>,
    /// Lowercased file stem
    pub stem: String,
    /// Lowercased full file name, the final tie-break
    pub name: String,
}

impl ImageSortKey {
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Self {
            number: first_number(&stem),
            stem,
            name,
        }
    }
}

impl Ord for ImageSortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_number = match (self.number, other.number) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_number
            .then_with(|| self.stem.cmp(&other.stem))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for ImageSortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A resolved image file and the key it was ordered by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub path: PathBuf,
    pub sort_key: ImageSortKey,
}

/// Parse the first run of digits in `s`. Runs too long for `u128` saturate.
fn first_number(s: &str) -> Option<u128> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = s[start..]
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .unwrap_or_default();
    Some(digits.parse().unwrap_or(u128::MAX))
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Sort image paths into page order.
pub fn order_images(paths: impl IntoIterator<Item = PathBuf>) -> Vec<ImageRef> {
    let mut images: Vec<ImageRef> = paths
        .into_iter()
        .map(|path| ImageRef {
            sort_key: ImageSortKey::from_path(&path),
            path,
        })
        .collect();
    images.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
    images
}

/// Collect the images in `dir` (non-recursive) in page order.
///
/// A missing directory is treated as an empty image set.
pub fn resolve_images(dir: impl AsRef<Path>) -> Result<Vec<ImageRef>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        log::warn!("Image directory {} not found, no images will be used", dir.display());
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if has_image_extension(&path) {
            paths.push(path);
        }
    }

    let images = order_images(paths);

    log::info!("Image order:");
    for image in &images {
        log::info!(
            "  {}",
            image
                .path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default()
        );
    }

    Ok(images)
}

// =============================================================================
// Tests
// =============================================================================
