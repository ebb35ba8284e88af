//! Illustrated book body generation
//!
//! Turns a manuscript and a folder of images into the body of a picture
//! book: an optional title page, then each manuscript page set as large as it
//! will fit on a background washed with its image's mean color, followed by
//! that image printed full-bleed.

pub mod assemble;
pub mod bleed;
pub mod color;
pub mod constants;
pub mod fit;
pub mod images;
mod manuscript;
pub mod metrics;
mod options;
pub mod plan;
mod types;

pub use assemble::{BodyReport, build_body, build_body_with_report, generate_body};
pub use bleed::{CoverPlacement, cover_placement};
pub use color::{ImageTone, sample_image, text_color_for_luminance};
pub use fit::{FittedBlock, TextBlock, compose_text, fit_text, split_into_sentences, top_space};
pub use images::{ImageRef, ImageSortKey, order_images, resolve_images};
pub use manuscript::{load_manuscript, parse_manuscript};
pub use options::{BookOptions, PageGeometry};
pub use plan::{PagePlan, PageSlot, PlanSummary};
pub use types::*;
