use crate::constants::*;
use crate::types::{ComposeError, Result};
use serde::{Deserialize, Serialize};

/// Page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    pub fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn usable_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

/// Book layout configuration.
///
/// Sizes are given in inches the way trim sizes are usually quoted; font
/// sizes are in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookOptions {
    pub page_width_in: f32,
    pub page_height_in: f32,
    pub margin_in: f32,
    pub font_size: u32,
    pub min_font_size: u32,
    pub luminance_threshold: f32,
    /// Put a blank page after the title page
    pub title_verso: bool,
    pub output_name: String,
    /// Front-matter pages within this many points of the target are not rescaled
    pub merge_tolerance_pt: f32,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            page_width_in: DEFAULT_PAGE_WIDTH_IN,
            page_height_in: DEFAULT_PAGE_HEIGHT_IN,
            margin_in: DEFAULT_MARGIN_IN,
            font_size: DEFAULT_FONT_SIZE,
            min_font_size: DEFAULT_MIN_FONT_SIZE,
            luminance_threshold: DEFAULT_LUMINANCE_THRESHOLD,
            title_verso: false,
            output_name: "children_book.pdf".to_string(),
            merge_tolerance_pt: 1.0,
        }
    }
}

impl BookOptions {
    /// Load options from JSON file. Missing fields keep their defaults.
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ComposeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ComposeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry {
            width: inch_to_pt(self.page_width_in),
            height: inch_to_pt(self.page_height_in),
            margin: inch_to_pt(self.margin_in),
        }
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !(self.page_width_in > 0.0 && self.page_height_in > 0.0) {
            return Err(ComposeError::Config(
                "Page width and height must be positive".to_string(),
            ));
        }

        if self.margin_in < 0.0 {
            return Err(ComposeError::Config("Margin cannot be negative".to_string()));
        }

        if self.margin_in * 2.0 >= self.page_width_in || self.margin_in * 2.0 >= self.page_height_in
        {
            return Err(ComposeError::Config(format!(
                "Margin {}in leaves no usable area on a {}x{}in page",
                self.margin_in, self.page_width_in, self.page_height_in
            )));
        }

        if self.min_font_size == 0 {
            return Err(ComposeError::Config(
                "Minimum font size must be at least 1".to_string(),
            ));
        }

        if self.min_font_size > self.font_size {
            return Err(ComposeError::Config(format!(
                "Minimum font size {} exceeds base font size {}",
                self.min_font_size, self.font_size
            )));
        }

        if !(0.0..=1.0).contains(&self.luminance_threshold) {
            return Err(ComposeError::Config(
                "Luminance threshold must be between 0 and 1".to_string(),
            ));
        }

        if self.merge_tolerance_pt < 0.0 {
            return Err(ComposeError::Config(
                "Merge tolerance cannot be negative".to_string(),
            ));
        }

        Ok(())
    }
}
