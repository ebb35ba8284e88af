//! Advance widths for the built-in Helvetica faces
//!
//! Values are the standard AFM widths in 1/1000 em for the printable ASCII
//! range (0x20..=0x7E). Characters outside that range use the average
//! lowercase width.

use printpdf::BuiltinFont;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const FALLBACK_WIDTH: u16 = 556;

fn char_width(table: &[u16; 95], ch: char) -> u16 {
    let code = ch as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

fn width_table(font: BuiltinFont) -> &'static [u16; 95] {
    match font {
        BuiltinFont::HelveticaBold | BuiltinFont::HelveticaBoldOblique => &HELVETICA_BOLD_WIDTHS,
        _ => &HELVETICA_WIDTHS,
    }
}

/// Width of `text` set in `font` at `size` points.
pub fn text_width(text: &str, font: BuiltinFont, size: f32) -> f32 {
    let table = width_table(font);
    let units: u32 = text.chars().map(|ch| u32::from(char_width(table, ch))).sum();
    units as f32 / 1000.0 * size
}
