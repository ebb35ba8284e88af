//! Page geometry normalization and document merging
//!
//! Every output page ends up with identical MediaBox, CropBox, TrimBox,
//! BleedBox and ArtBox equal to the target size. Pages that are off-size by
//! more than the tolerance have their content scaled uniformly to fit and
//! centered on the target page.

use crate::boxes::{BoxRect, read_media_box, stamp_boxes};
use crate::copy::{CopyCache, copy_page, reserve_pages};
use crate::types::*;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// The merged document plus which pages had to be rescaled.
#[derive(Debug)]
pub struct MergeOutcome {
    pub document: Document,
    /// 1-based output page numbers whose content was scaled
    pub transformed_pages: Vec<usize>,
}

impl MergeOutcome {
    pub fn report(&self) -> MergeReport {
        MergeReport {
            total_pages: self.document.get_pages().len(),
            transformed_pages: self.transformed_pages.clone(),
        }
    }
}

/// Summary of a merge once the document has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub total_pages: usize,
    pub transformed_pages: Vec<usize>,
}

/// Uniform scale plus translation applied to an off-size page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFit {
    pub scale: f32,
    pub dx: f32,
    pub dy: f32,
}

/// Compute the fit that places `media` centered inside the target.
///
/// A MediaBox with a non-zero lower-left corner has that offset folded into
/// the translation.
pub fn page_fit(media: &BoxRect, target: &TargetGeometry) -> PageFit {
    let (w, h) = (media.width(), media.height());
    let scale = (target.width_pt / w).min(target.height_pt / h);
    PageFit {
        scale,
        dx: (target.width_pt - w * scale) / 2.0 - media.llx * scale,
        dy: (target.height_pt - h * scale) / 2.0 - media.lly * scale,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PageMode {
    /// Scale off-size pages, stamp the rest
    Fit,
    /// Only stamp the target boxes
    Stamp,
}

// =============================================================================
// Entry Points
// =============================================================================

/// Merge `front` then `body` into a fresh document normalized to `target`.
pub fn merge_documents(
    front: &Document,
    body: &Document,
    target: &TargetGeometry,
) -> Result<MergeOutcome> {
    let mut builder = OutputBuilder::new();
    builder.append(front, target, PageMode::Fit)?;
    builder.append(body, target, PageMode::Stamp)?;
    builder.finish()
}

/// Normalize a single document to `target`, scaling off-size pages.
pub fn normalize_document(doc: &Document, target: &TargetGeometry) -> Result<MergeOutcome> {
    let mut builder = OutputBuilder::new();
    builder.append(doc, target, PageMode::Fit)?;
    builder.finish()
}

// =============================================================================
// Output Construction
// =============================================================================

struct OutputBuilder {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
    transformed_pages: Vec<usize>,
}

impl OutputBuilder {
    fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            kids: Vec::new(),
            transformed_pages: Vec::new(),
        }
    }

    fn append(&mut self, source: &Document, target: &TargetGeometry, mode: PageMode) -> Result<()> {
        let mut cache = CopyCache::new();
        let pages = reserve_pages(&mut self.document, source, &mut cache);

        for (source_id, new_id) in pages {
            let page_number = self.kids.len() + 1;
            let media = read_media_box(source, source_id)?;
            let mut page =
                copy_page(&mut self.document, source, source_id, self.pages_id, &mut cache)?;

            if mode == PageMode::Fit && !target.matches(media.width(), media.height()) {
                let fit = page_fit(&media, target);
                log::debug!(
                    "Page {}: {:.1}x{:.1} -> {:.1}x{:.1} (scale {:.4}, offset {:.1},{:.1})",
                    page_number,
                    media.width(),
                    media.height(),
                    target.width_pt,
                    target.height_pt,
                    fit.scale,
                    fit.dx,
                    fit.dy
                );
                wrap_contents(&mut self.document, &mut page, &fit)?;
                self.transformed_pages.push(page_number);
            }

            stamp_boxes(&mut page, &target.rect());
            self.document.objects.insert(new_id, Object::Dictionary(page));
            self.kids.push(Object::Reference(new_id));
        }
        Ok(())
    }

    fn finish(mut self) -> Result<MergeOutcome> {
        if self.kids.is_empty() {
            return Err(MergeError::NoPages);
        }

        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(self.kids.len() as i64)),
            ("Kids", Object::Array(self.kids)),
        ]);
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.document.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.document.trailer.set("Root", catalog_id);

        Ok(MergeOutcome {
            document: self.document,
            transformed_pages: self.transformed_pages,
        })
    }
}

// =============================================================================
// Content Transform
// =============================================================================

/// Surround the page's content streams with `q s 0 0 s dx dy cm` and `Q`.
fn wrap_contents(output: &mut Document, page: &mut Dictionary, fit: &PageFit) -> Result<()> {
    let prefix = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(fit.scale),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(fit.scale),
                    Object::Real(fit.dx),
                    Object::Real(fit.dy),
                ],
            ),
        ],
    };
    let suffix = Content {
        operations: vec![Operation::new("Q", vec![])],
    };

    let prefix_id = output.add_object(Stream::new(Dictionary::new(), prefix.encode()?));
    // Leading newline keeps `Q` from running into an unterminated last token
    let mut suffix_bytes = b"\n".to_vec();
    suffix_bytes.extend(suffix.encode()?);
    let suffix_id = output.add_object(Stream::new(Dictionary::new(), suffix_bytes));

    let mut contents = vec![Object::Reference(prefix_id)];
    match page.get(b"Contents") {
        // Contents may itself be a reference to an array of stream references
        Ok(Object::Reference(id)) => match output.get_object(*id) {
            Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
            _ => contents.push(Object::Reference(*id)),
        },
        Ok(Object::Array(existing)) => contents.extend(existing.iter().cloned()),
        Ok(_) => {
            return Err(MergeError::InvalidPage(
                "Contents is neither a reference nor an array".to_string(),
            ));
        }
        Err(_) => {}
    }
    contents.push(Object::Reference(suffix_id));

    page.set("Contents", Object::Array(contents));
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> TargetGeometry {
        TargetGeometry::new(621.0, 630.0)
    }

    #[test]
    fn test_fit_letter_page() {
        let fit = page_fit(&BoxRect::new(0.0, 0.0, 612.0, 792.0), &target());
        let scale = 630.0 / 792.0;
        assert!((fit.scale - scale).abs() < 1e-5);
        assert!((fit.dx - (621.0 - 612.0 * scale) / 2.0).abs() < 1e-3);
        assert!(fit.dy.abs() < 1e-3);
    }

    #[test]
    fn test_fit_double_width_page() {
        let fit = page_fit(&BoxRect::new(0.0, 0.0, 1242.0, 630.0), &target());
        assert!((fit.scale - 0.5).abs() < 1e-6);
        assert!(fit.dx.abs() < 1e-3);
        assert!((fit.dy - 630.0 / 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_folds_origin_offset() {
        let at_origin = page_fit(&BoxRect::new(0.0, 0.0, 400.0, 400.0), &target());
        let shifted = page_fit(&BoxRect::new(100.0, 50.0, 500.0, 450.0), &target());
        assert_eq!(at_origin.scale, shifted.scale);
        assert!((shifted.dx - (at_origin.dx - 100.0 * shifted.scale)).abs() < 1e-3);
        assert!((shifted.dy - (at_origin.dy - 50.0 * shifted.scale)).abs() < 1e-3);
    }

    #[test]
    fn test_fitted_content_stays_inside_target() {
        let media = BoxRect::new(0.0, 0.0, 300.0, 900.0);
        let fit = page_fit(&media, &target());
        let right = media.urx * fit.scale + fit.dx;
        let top = media.ury * fit.scale + fit.dy;
        assert!(fit.dx >= 0.0 && right <= 621.0 + 1e-3);
        assert!(fit.dy >= -1e-3 && top <= 630.0 + 1e-3);
    }

    #[test]
    fn test_wrap_contents_brackets_existing_stream() {
        let mut output = Document::with_version("1.7");
        let original = output.add_object(Stream::new(Dictionary::new(), b"0 0 m".to_vec()));
        let mut page = Dictionary::new();
        page.set("Contents", Object::Reference(original));

        let fit = PageFit {
            scale: 0.5,
            dx: 0.0,
            dy: 157.5,
        };
        wrap_contents(&mut output, &mut page, &fit).unwrap();

        let contents = page.get(b"Contents").unwrap().as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1].as_reference().unwrap(), original);

        let prefix_id = contents[0].as_reference().unwrap();
        let prefix = output.get_object(prefix_id).unwrap().as_stream().unwrap();
        let decoded = Content::decode(&prefix.content).unwrap();
        assert_eq!(decoded.operations[0].operator, "q");
        assert_eq!(decoded.operations[1].operator, "cm");
        assert_eq!(decoded.operations[1].operands[0].as_float().unwrap(), 0.5);
    }

    #[test]
    fn test_wrap_contents_flattens_referenced_array() {
        let mut output = Document::with_version("1.7");
        let a = output.add_object(Stream::new(Dictionary::new(), b"0 0 m".to_vec()));
        let b = output.add_object(Stream::new(Dictionary::new(), b"1 1 l".to_vec()));
        let array_id =
            output.add_object(Object::Array(vec![Object::Reference(a), Object::Reference(b)]));
        let mut page = Dictionary::new();
        page.set("Contents", Object::Reference(array_id));

        let fit = PageFit {
            scale: 0.5,
            dx: 0.0,
            dy: 0.0,
        };
        wrap_contents(&mut output, &mut page, &fit).unwrap();

        let contents = page.get(b"Contents").unwrap().as_array().unwrap();
        let ids: Vec<ObjectId> = contents.iter().map(|o| o.as_reference().unwrap()).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(&ids[1..3], &[a, b]);
        assert!(!ids.contains(&array_id));
    }
}
