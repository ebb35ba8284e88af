use crate::boxes::BoxRect;
use crate::constants::{DEFAULT_TOLERANCE_PT, inch_to_pt};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Required file not found: {}", .0.display())]
    MissingResource(PathBuf),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No pages to merge")]
    NoPages,
    #[error("Invalid page: {0}")]
    InvalidPage(String),
}

pub type Result<T> = std::result::Result<T, MergeError>;

/// The page size every output page is normalized to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    /// Pages within this many points of the target on both axes are left
    /// unscaled
    pub tolerance_pt: f32,
}

impl TargetGeometry {
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
            tolerance_pt: DEFAULT_TOLERANCE_PT,
        }
    }

    pub fn from_inches(width_in: f32, height_in: f32) -> Self {
        Self::new(inch_to_pt(width_in), inch_to_pt(height_in))
    }

    pub fn with_tolerance(mut self, tolerance_pt: f32) -> Self {
        self.tolerance_pt = tolerance_pt;
        self
    }

    /// Whether a `width` x `height` page needs no scaling.
    pub fn matches(&self, width: f32, height: f32) -> bool {
        (width - self.width_pt).abs() <= self.tolerance_pt
            && (height - self.height_pt).abs() <= self.tolerance_pt
    }

    /// The target page as a box anchored at the origin.
    pub fn rect(&self) -> BoxRect {
        BoxRect::new(0.0, 0.0, self.width_pt, self.height_pt)
    }
}
