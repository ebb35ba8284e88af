//! Text fitting
//!
//! A manuscript page must fit on exactly one output page. The fitter tries
//! font sizes from the base size downward and keeps the first one whose
//! wrapped height fits the usable area. When nothing fits, the minimum size is
//! used anyway and the block is flagged as overflowing; text is never cut.

use crate::constants::{LEADING_EXTRA, PARAGRAPH_GAP_LINES, SENTENCE_GAP_LINES};
use crate::metrics::text_width;
use printpdf::BuiltinFont;

// =============================================================================
// Types
// =============================================================================

/// One laid-out line. Blank separator lines have empty text.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub width: f32,
}

impl Line {
    fn blank() -> Self {
        Self {
            text: String::new(),
            width: 0.0,
        }
    }
}

/// Lines set in a single font and size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<Line>,
    pub font: BuiltinFont,
    pub font_size: f32,
    pub leading: f32,
}

impl TextBlock {
    /// Rendered height: one leading per line, blank lines included.
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.leading
    }
}

/// Result of fitting one manuscript page.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedBlock {
    pub block: TextBlock,
    /// Chosen size, within `[min_size, base_size]`
    pub font_size: u32,
    /// True when even the minimum size is taller than the usable height
    pub overflowed: bool,
}

// =============================================================================
// Preprocessing
// =============================================================================

/// Split text after `.`, `!` or `?` when followed by whitespace.
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.trim().chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') && chars.peek().is_some_and(|c| c.is_whitespace()) {
            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }
            sentences.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        sentences.push(current);
    }
    sentences
}

/// Split raw page text into paragraphs (on blank lines) of sentences.
pub fn compose_text(raw: &str) -> Vec<Vec<String>> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in raw.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs
        .iter()
        .map(|p| split_into_sentences(p))
        .filter(|sentences| !sentences.is_empty())
        .collect()
}

// =============================================================================
// Layout
// =============================================================================

/// Greedy word wrap. A word wider than `max_width` gets a line of its own.
pub fn wrap_words(text: &str, font: BuiltinFont, size: f32, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let space = text_width(" ", font, size);
    let mut current_width = 0.0;

    for word in text.split_whitespace() {
        let word_width = text_width(word, font, size);
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
        } else {
            lines.push(Line {
                text: std::mem::take(&mut current),
                width: current_width,
            });
            current.push_str(word);
            current_width = word_width;
        }
    }

    if !current.is_empty() {
        lines.push(Line {
            text: current,
            width: current_width,
        });
    }
    lines
}

/// Lay out a single run of text (used for the title page).
pub fn layout_lines(
    text: &str,
    font: BuiltinFont,
    font_size: f32,
    leading: f32,
    max_width: f32,
) -> TextBlock {
    TextBlock {
        lines: wrap_words(text, font, font_size, max_width),
        font,
        font_size,
        leading,
    }
}

/// Lay out composed paragraphs at one size. Each sentence starts a new line.
pub fn layout_block(
    paragraphs: &[Vec<String>],
    font: BuiltinFont,
    size: u32,
    max_width: f32,
) -> TextBlock {
    let font_size = size as f32;
    let mut lines = Vec::new();

    for (p_idx, sentences) in paragraphs.iter().enumerate() {
        if p_idx > 0 {
            lines.extend(std::iter::repeat_with(Line::blank).take(PARAGRAPH_GAP_LINES));
        }
        for (s_idx, sentence) in sentences.iter().enumerate() {
            if s_idx > 0 {
                lines.extend(std::iter::repeat_with(Line::blank).take(SENTENCE_GAP_LINES));
            }
            lines.extend(wrap_words(sentence, font, font_size, max_width));
        }
    }

    TextBlock {
        lines,
        font,
        font_size,
        leading: font_size + LEADING_EXTRA,
    }
}

// =============================================================================
// Fitting
// =============================================================================

/// Pick the largest size in `[min_size, base_size]` whose block fits.
///
/// Falls back to `min_size` with `overflowed` set when no size fits.
pub fn fit_text(
    paragraphs: &[Vec<String>],
    font: BuiltinFont,
    max_width: f32,
    max_height: f32,
    base_size: u32,
    min_size: u32,
) -> FittedBlock {
    let base_size = base_size.max(1);
    let min_size = min_size.clamp(1, base_size);
    let mut size = base_size;

    loop {
        let block = layout_block(paragraphs, font, size, max_width);
        let height = block.height();
        log::debug!("Trying {}pt: height {:.1} / {:.1}", size, height, max_height);

        if height <= max_height {
            return FittedBlock {
                block,
                font_size: size,
                overflowed: false,
            };
        }
        if size <= min_size {
            log::warn!(
                "Text does not fit even at {}pt ({:.1} > {:.1}), overflowing",
                size,
                height,
                max_height
            );
            return FittedBlock {
                block,
                font_size: size,
                overflowed: true,
            };
        }
        size -= 1;
    }
}

/// Space above a block that centers it vertically, or zero if it does not fit.
pub fn top_space(block_height: f32, usable_height: f32) -> f32 {
    if block_height < usable_height {
        (usable_height - block_height) / 2.0
    } else {
        0.0
    }
}

// =============================================================================
// Tests
// =============================================================================
