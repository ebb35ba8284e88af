//! Body document assembly
//!
//! Walks a precomputed [`PagePlan`] and emits one PDF page per slot:
//! title page, washed and fitted text pages, full-bleed image pages and blank
//! partner pages.

use crate::bleed::full_bleed_ops;
use crate::color::{display_name, sample_image};
use crate::constants::*;
use crate::fit::{TextBlock, compose_text, fit_text, layout_lines, top_space};
use crate::images::ImageRef;
use crate::options::{BookOptions, PageGeometry};
use crate::plan::{PagePlan, PageSlot, PlanSummary};
use crate::types::{Color, ComposeError, Manuscript, Result};
use printpdf::{
    BuiltinFont, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg,
    Point, Polygon, PolygonRing, Pt, TextItem, WindingOrder,
};
use std::path::Path;

/// What happened while building the body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyReport {
    pub summary: PlanSummary,
    /// Text pages (1-based) whose text overflows even at the minimum size
    pub overflowed_pages: Vec<usize>,
    /// Font size chosen for each manuscript page, in manuscript order
    pub font_sizes: Vec<u32>,
}

/// Build the body PDF and write it to `output_path`.
pub async fn generate_body(
    manuscript: &Manuscript,
    images: &[ImageRef],
    options: &BookOptions,
    output_path: impl AsRef<Path>,
) -> Result<BodyReport> {
    let manuscript = manuscript.clone();
    let images = images.to_vec();
    let options = options.clone();
    let output_path = output_path.as_ref().to_owned();

    let (bytes, report) =
        tokio::task::spawn_blocking(move || build_body_with_report(&manuscript, &images, &options))
            .await??;

    tokio::fs::write(&output_path, bytes).await?;
    log::info!("Inner book created: {}", output_path.display());

    Ok(report)
}

/// Build the body PDF in memory.
pub fn build_body(
    manuscript: &Manuscript,
    images: &[ImageRef],
    options: &BookOptions,
) -> Result<Vec<u8>> {
    build_body_with_report(manuscript, images, options).map(|(bytes, _)| bytes)
}

/// Build the body PDF in memory along with a report of the layout.
pub fn build_body_with_report(
    manuscript: &Manuscript,
    images: &[ImageRef],
    options: &BookOptions,
) -> Result<(Vec<u8>, BodyReport)> {
    options.validate()?;
    if manuscript.pages.is_empty() {
        return Err(ComposeError::EmptyManuscript);
    }

    let geometry = options.geometry();
    let plan = PagePlan::new(
        manuscript.has_title(),
        options.title_verso,
        manuscript.pages.len(),
        images.len(),
    );

    let mut doc = PdfDocument::new(manuscript.display_title().unwrap_or("Picture Book"));
    let mut pages = Vec::with_capacity(plan.total_pages());
    let mut overflowed_pages = Vec::new();
    let mut font_sizes = Vec::with_capacity(manuscript.pages.len());

    for (page_number, slot) in plan.pages() {
        let ops = match slot {
            PageSlot::Title => title_page_ops(manuscript, &geometry),
            PageSlot::TitleVerso | PageSlot::Blank => Vec::new(),
            PageSlot::Text { manuscript_index } => {
                let theme = plan
                    .theme_for(page_number)
                    .and_then(|idx| images.get(idx))
                    .map(|image| page_theme(&image.path, options.luminance_threshold));
                let (background, text_color) = theme.unwrap_or((None, Color::BLACK));

                let page = TextPage {
                    raw: &manuscript.pages[manuscript_index],
                    background,
                    text_color,
                };
                let (ops, size, overflowed) = page.render(&geometry, options);
                font_sizes.push(size);
                if overflowed {
                    overflowed_pages.push(page_number);
                }
                ops
            }
            PageSlot::Image { image_index } => {
                full_bleed_ops(&mut doc, &images[image_index].path, geometry.width, geometry.height)?
            }
        };
        pages.push(new_page(&geometry, ops));
    }

    doc.with_pages(pages);

    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        log::debug!("PDF writer reported {} warnings", warnings.len());
    }

    let report = BodyReport {
        summary: plan.summary(),
        overflowed_pages,
        font_sizes,
    };
    Ok((bytes, report))
}

// =============================================================================
// Page Theming
// =============================================================================

/// Background wash and text color for a text page paired with `path`.
///
/// An unreadable image means no wash and black text.
fn page_theme(path: &Path, threshold: f32) -> (Option<Color>, Color) {
    match sample_image(path) {
        Ok(tone) => {
            let text_color = tone.text_color(threshold);
            log::info!(
                "Luminance for {}: {:.3} -> {} text",
                display_name(path),
                tone.luminance(),
                if text_color == Color::WHITE { "WHITE" } else { "BLACK" }
            );
            (Some(tone.background()), text_color)
        }
        Err(err) => {
            log::warn!("Failed to compute color for {}: {}", path.display(), err);
            (None, Color::BLACK)
        }
    }
}

// =============================================================================
// Page Content
// =============================================================================

struct TextPage<'a> {
    raw: &'a str,
    background: Option<Color>,
    text_color: Color,
}

impl TextPage<'_> {
    /// Operations for the page plus the chosen size and overflow flag.
    fn render(&self, geometry: &PageGeometry, options: &BookOptions) -> (Vec<Op>, u32, bool) {
        let mut ops = Vec::new();
        if let Some(color) = self.background {
            ops.extend(fill_page_ops(color, geometry.width, geometry.height));
        }

        let paragraphs = compose_text(self.raw);
        let fitted = fit_text(
            &paragraphs,
            BuiltinFont::Helvetica,
            geometry.usable_width(),
            geometry.usable_height(),
            options.font_size,
            options.min_font_size,
        );

        let top = geometry.height
            - geometry.margin
            - top_space(fitted.block.height(), geometry.usable_height());
        ops.extend(block_ops(&fitted.block, geometry, top, self.text_color));

        (ops, fitted.font_size, fitted.overflowed)
    }
}

/// Title stacked over "by {author}", centered as one block.
fn title_page_ops(manuscript: &Manuscript, geometry: &PageGeometry) -> Vec<Op> {
    let Some(title) = manuscript.display_title() else {
        return Vec::new();
    };
    let usable_width = geometry.usable_width();

    let title_block = layout_lines(
        title,
        BuiltinFont::HelveticaBold,
        TITLE_FONT_SIZE,
        TITLE_LEADING,
        usable_width,
    );
    let author_block = manuscript.display_author().map(|author| {
        layout_lines(
            &format!("by {}", author),
            BuiltinFont::HelveticaOblique,
            AUTHOR_FONT_SIZE,
            AUTHOR_LEADING,
            usable_width,
        )
    });

    let mut total_height = title_block.height();
    if let Some(block) = &author_block {
        total_height += TITLE_AUTHOR_GAP + block.height();
    }

    let top = geometry.height - geometry.margin - top_space(total_height, geometry.usable_height());
    let mut ops = block_ops(&title_block, geometry, top, Color::BLACK);

    if let Some(block) = &author_block {
        let author_top = top - title_block.height() - TITLE_AUTHOR_GAP;
        ops.extend(block_ops(block, geometry, author_top, Color::BLACK));
    }
    ops
}

/// Draw a block with each line centered in the usable width. `top` is the
/// y coordinate of the block's upper edge.
fn block_ops(block: &TextBlock, geometry: &PageGeometry, top: f32, color: Color) -> Vec<Op> {
    let mut ops = vec![
        Op::SaveGraphicsState,
        Op::SetFillColor {
            col: color.to_pdf(),
        },
    ];

    let mut baseline = top - block.font_size;
    for line in &block.lines {
        if !line.text.is_empty() {
            let x = geometry.margin + (geometry.usable_width() - line.width) / 2.0;
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point {
                    x: Pt(x),
                    y: Pt(baseline),
                },
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(block.font_size),
                font: block.font,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.text.clone())],
                font: block.font,
            });
            ops.push(Op::EndTextSection);
        }
        baseline -= block.leading;
    }

    ops.push(Op::RestoreGraphicsState);
    ops
}

/// Flat full-page rectangle drawn beneath everything else.
fn fill_page_ops(color: Color, width: f32, height: f32) -> Vec<Op> {
    let corner = |x: f32, y: f32| LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    };

    vec![
        Op::SaveGraphicsState,
        Op::SetFillColor {
            col: color.to_pdf(),
        },
        Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: vec![
                        corner(0.0, 0.0),
                        corner(width, 0.0),
                        corner(width, height),
                        corner(0.0, height),
                    ],
                }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        },
        Op::RestoreGraphicsState,
    ]
}

/// Every body page gets the same media, trim and crop box.
fn new_page(geometry: &PageGeometry, ops: Vec<Op>) -> PdfPage {
    PdfPage::new(
        Mm::from(Pt(geometry.width)),
        Mm::from(Pt(geometry.height)),
        ops,
    )
}
