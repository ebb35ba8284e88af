//! Full-bleed image pages
//!
//! The image is scaled uniformly until it covers the whole page, then
//! centered. Whatever hangs past the page edge is clipped by the page
//! boundary.

use crate::constants::IMAGE_DPI;
use crate::types::{ComposeError, Result};
use image::{DynamicImage, GenericImageView};
use printpdf::{Op, PdfDocument, Pt, RawImage, RawImageData, RawImageFormat, XObjectTransform};
use std::path::Path;

/// Where and how large an image is drawn on its page (points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverPlacement {
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Cover the page: `scale = max(page_w / img_w, page_h / img_h)`.
pub fn cover_placement(img_width: f32, img_height: f32, page_width: f32, page_height: f32) -> CoverPlacement {
    let scale = (page_width / img_width).max(page_height / img_height);
    let width = img_width * scale;
    let height = img_height * scale;

    CoverPlacement {
        scale,
        x: (page_width - width) / 2.0,
        y: (page_height - height) / 2.0,
        width,
        height,
    }
}

/// Convert a decoded image to printpdf pixels. Images with an alpha channel
/// keep it so printpdf can emit a soft mask.
fn raw_image(decoded: DynamicImage) -> RawImage {
    let (width, height) = decoded.dimensions();
    let (pixels, data_format) = if decoded.color().has_alpha() {
        (decoded.to_rgba8().into_raw(), RawImageFormat::RGBA8)
    } else {
        (decoded.to_rgb8().into_raw(), RawImageFormat::RGB8)
    };
    RawImage {
        pixels: RawImageData::U8(pixels),
        width: width as usize,
        height: height as usize,
        data_format,
        tag: Vec::new(),
    }
}

/// Decode `path`, register it with `doc` and return the drawing operations
/// for a full-bleed page.
pub fn full_bleed_ops(
    doc: &mut PdfDocument,
    path: &Path,
    page_width: f32,
    page_height: f32,
) -> Result<Vec<Op>> {
    let decoded = image::open(path).map_err(|source| ComposeError::Image {
        path: path.to_owned(),
        source,
    })?;

    let (img_width, img_height) = decoded.dimensions();
    let raw = raw_image(decoded);
    let xobject_id = doc.add_image(&raw);

    // At 72 dpi one pixel is one point, so the cover scale applies directly.
    let placement = cover_placement(img_width as f32, img_height as f32, page_width, page_height);
    log::debug!(
        "Full-bleed {}: {}x{}px scaled {:.3} at ({:.1}, {:.1})",
        path.display(),
        img_width,
        img_height,
        placement.scale,
        placement.x,
        placement.y
    );

    Ok(vec![Op::UseXobject {
        id: xobject_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(placement.x)),
            translate_y: Some(Pt(placement.y)),
            scale_x: Some(placement.scale),
            scale_y: Some(placement.scale),
            dpi: Some(IMAGE_DPI),
            rotate: None,
        },
    }])
}
