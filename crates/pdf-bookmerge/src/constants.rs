//! Shared constants for page normalization

// =============================================================================
// Unit Conversion
// =============================================================================

pub const POINTS_PER_INCH: f32 = 72.0;

#[inline]
pub fn inch_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

// =============================================================================
// Defaults
// =============================================================================

/// Size difference (points) below which a page already counts as target-sized
pub const DEFAULT_TOLERANCE_PT: f32 = 1.0;

/// Fallback when a page has no MediaBox anywhere in its tree (US Letter)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (612.0, 792.0);

/// Page tree depth limit when walking `Parent` links
pub const MAX_TREE_DEPTH: usize = 64;

/// Page attributes a page may inherit from its ancestors
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];
