//! Image color sampling
//!
//! Each illustrated text page borrows its background from the mean color of
//! its paired image and picks black or white text for contrast.

use crate::constants::{LUMA_WEIGHTS, SAMPLE_GRID};
use crate::types::{Color, ComposeError, Result};
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::path::Path;

/// Mean color of a downsampled image, channels in `0.0..=255.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageTone {
    pub mean_r: f32,
    pub mean_g: f32,
    pub mean_b: f32,
}

impl ImageTone {
    /// Average an RGB image after shrinking it to the sampling grid.
    pub fn from_rgb(img: &RgbImage) -> Self {
        let small = imageops::resize(img, SAMPLE_GRID, SAMPLE_GRID, FilterType::Triangle);

        let mut sums = [0u64; 3];
        for pixel in small.pixels() {
            sums[0] += u64::from(pixel[0]);
            sums[1] += u64::from(pixel[1]);
            sums[2] += u64::from(pixel[2]);
        }
        let count = u64::from(small.width()) * u64::from(small.height());
        let count = count.max(1) as f32;

        Self {
            mean_r: sums[0] as f32 / count,
            mean_g: sums[1] as f32 / count,
            mean_b: sums[2] as f32 / count,
        }
    }

    /// The mean color as a fill color.
    pub fn background(&self) -> Color {
        Color::new(self.mean_r / 255.0, self.mean_g / 255.0, self.mean_b / 255.0)
    }

    /// Perceptual luminance in `0.0..=1.0`.
    pub fn luminance(&self) -> f32 {
        let (wr, wg, wb) = LUMA_WEIGHTS;
        (wr * self.mean_r + wg * self.mean_g + wb * self.mean_b) / 255.0
    }

    /// Black or white, whichever contrasts with the background.
    pub fn text_color(&self, threshold: f32) -> Color {
        text_color_for_luminance(self.luminance(), threshold)
    }
}

/// White below the threshold, black at or above it.
pub fn text_color_for_luminance(luminance: f32, threshold: f32) -> Color {
    if luminance < threshold {
        Color::WHITE
    } else {
        Color::BLACK
    }
}

/// Decode an image and compute its tone.
///
/// Decode failures are returned, not absorbed; the caller picks the fallback.
pub fn sample_image(path: impl AsRef<Path>) -> Result<ImageTone> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| ComposeError::Image {
        path: path.to_owned(),
        source,
    })?;
    let tone = ImageTone::from_rgb(&img.to_rgb8());

    log::info!(
        "Avg color for {}: {:.1}, {:.1}, {:.1}",
        display_name(path),
        tone.mean_r,
        tone.mean_g,
        tone.mean_b
    );

    Ok(tone)
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// =============================================================================
// Tests
// =============================================================================
