//! Shared constants for book composition
//!
//! Typography, sampling and unit values used by the layout engine.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert inches to points
#[inline]
pub fn inch_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

// =============================================================================
// Default Geometry
// =============================================================================

/// Default trim width in inches
pub const DEFAULT_PAGE_WIDTH_IN: f32 = 8.625;

/// Default trim height in inches
pub const DEFAULT_PAGE_HEIGHT_IN: f32 = 8.75;

/// Default margin on all four sides in inches
pub const DEFAULT_MARGIN_IN: f32 = 1.0;

// =============================================================================
// Typography
// =============================================================================

/// Default body font size (points)
pub const DEFAULT_FONT_SIZE: u32 = 20;

/// Smallest body size tried when fitting a page in the full pipeline
pub const DEFAULT_MIN_FONT_SIZE: u32 = 5;

/// Smallest size tried when fitting a single standalone paragraph
pub const STANDALONE_MIN_FONT_SIZE: u32 = 10;

/// Extra leading added on top of the font size (points)
pub const LEADING_EXTRA: f32 = 4.0;

/// Empty lines between sentences of one paragraph
pub const SENTENCE_GAP_LINES: usize = 1;

/// Empty lines between paragraphs
pub const PARAGRAPH_GAP_LINES: usize = 2;

/// Title page: title size and leading (points)
pub const TITLE_FONT_SIZE: f32 = 26.0;
pub const TITLE_LEADING: f32 = 30.0;

/// Title page: author size and leading (points)
pub const AUTHOR_FONT_SIZE: f32 = 18.0;
pub const AUTHOR_LEADING: f32 = 22.0;

/// Gap between the title block and the author line (points, 0.25in)
pub const TITLE_AUTHOR_GAP: f32 = 18.0;

// =============================================================================
// Color Sampling
// =============================================================================

/// Images are downsampled to a square grid of this size before averaging
pub const SAMPLE_GRID: u32 = 64;

/// Luminance below this picks white text
pub const DEFAULT_LUMINANCE_THRESHOLD: f32 = 0.5;

/// Rec. 601 luma weights
pub const LUMA_WEIGHTS: (f32, f32, f32) = (0.299, 0.587, 0.114);

// =============================================================================
// Images
// =============================================================================

/// Accepted raster extensions, compared case-insensitively
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Images are embedded at 72 dpi so one pixel maps to one point before scaling
pub const IMAGE_DPI: f32 = 72.0;
