//! Page geometry normalization for assembled books
//!
//! Combines an externally supplied front matter PDF with a generated body so
//! that every page of the result has the same size and the same five
//! boundary boxes.

pub mod boxes;
pub mod constants;
pub mod copy;
mod io;
pub mod merge;
mod types;

pub use boxes::{BoxRect, PageBoxes, read_media_box, stamp_boxes};
pub use io::{load_pdf, merge_files, save_pdf};
pub use merge::{MergeOutcome, MergeReport, PageFit, merge_documents, normalize_document, page_fit};
pub use types::*;
