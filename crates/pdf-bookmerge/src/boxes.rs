//! Page boundary boxes
//!
//! A PDF page carries up to five rectangles: MediaBox, CropBox, TrimBox,
//! BleedBox and ArtBox. Normalized pages get all five set to the same
//! rectangle. Only the MediaBox is read back, and it may be inherited from
//! the page tree.

use crate::constants::{DEFAULT_PAGE_DIMENSIONS, MAX_TREE_DEPTH};
use crate::types::{MergeError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};

/// A rectangle in default user space, lower-left and upper-right corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxRect {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl BoxRect {
    pub fn new(llx: f32, lly: f32, urx: f32, ury: f32) -> Self {
        Self { llx, lly, urx, ury }
    }

    pub fn width(&self) -> f32 {
        (self.urx - self.llx).abs()
    }

    pub fn height(&self) -> f32 {
        (self.ury - self.lly).abs()
    }

    /// Parse a four-number array. Corners are normalized so that the lower
    /// left comes first.
    pub fn from_object(doc: &Document, obj: &Object) -> Option<Self> {
        let values = resolve(doc, obj)?.as_array().ok()?;
        if values.len() != 4 {
            return None;
        }
        let mut numbers = [0.0f32; 4];
        for (slot, value) in numbers.iter_mut().zip(values) {
            *slot = number(resolve(doc, value)?)?;
        }
        let [x0, y0, x1, y1] = numbers;
        Some(Self::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)))
    }

    pub fn to_object(&self) -> Object {
        Object::Array(vec![
            Object::Real(self.llx),
            Object::Real(self.lly),
            Object::Real(self.urx),
            Object::Real(self.ury),
        ])
    }
}

/// All five boxes of one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBoxes {
    pub media: BoxRect,
    pub crop: BoxRect,
    pub trim: BoxRect,
    pub bleed: BoxRect,
    pub art: BoxRect,
}

impl PageBoxes {
    pub fn uniform(rect: BoxRect) -> Self {
        Self {
            media: rect,
            crop: rect,
            trim: rect,
            bleed: rect,
            art: rect,
        }
    }

    /// Write all five boxes onto a page dictionary.
    pub fn apply(&self, page: &mut Dictionary) {
        page.set("MediaBox", self.media.to_object());
        page.set("CropBox", self.crop.to_object());
        page.set("TrimBox", self.trim.to_object());
        page.set("BleedBox", self.bleed.to_object());
        page.set("ArtBox", self.art.to_object());
    }
}

/// Set every box of `page` to `rect`.
pub fn stamp_boxes(page: &mut Dictionary, rect: &BoxRect) {
    PageBoxes::uniform(*rect).apply(page);
}

/// The effective MediaBox of a page, inherited through the page tree if the
/// page has none of its own.
pub fn read_media_box(doc: &Document, page_id: ObjectId) -> Result<BoxRect> {
    let media = inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|obj| BoxRect::from_object(doc, obj))
        .unwrap_or_else(|| {
            log::warn!(
                "Page {:?} has no MediaBox, assuming {}x{}",
                page_id,
                DEFAULT_PAGE_DIMENSIONS.0,
                DEFAULT_PAGE_DIMENSIONS.1
            );
            BoxRect::new(0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1)
        });
    if media.width() <= 0.0 || media.height() <= 0.0 {
        return Err(MergeError::InvalidPage(format!(
            "page {:?} has an empty MediaBox",
            page_id
        )));
    }
    Ok(media)
}

// =============================================================================
// Page Tree Helpers
// =============================================================================

/// Look up `key` on a page, falling back to its ancestors in the page tree.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Follow a single level of indirection.
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
