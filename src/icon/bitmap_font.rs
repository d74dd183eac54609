//! Minimal 5×7 bitmap font, the last link of the label font chain.
//!
//! Only lowercase ASCII letters are drawn; a space advances without ink and
//! every other character renders as a hollow box. Sizes too small for a
//! one-pixel cell come back blank rather than oversized.

use super::label::LabelMask;

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
/// One blank column between glyphs.
const ADVANCE: u32 = GLYPH_W + 1;
/// One blank row below the baseline.
const LINE_H: u32 = GLYPH_H + 1;

/// Rows top to bottom, bit 4 is the leftmost column.
const LOWERCASE: [[u8; 7]; 26] = [
    [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111], // a
    [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b11110], // b
    [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110], // c
    [0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111], // d
    [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110], // e
    [0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000], // f
    [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110], // g
    [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001], // h
    [0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110], // i
    [0b00010, 0b00000, 0b00110, 0b00010, 0b00010, 0b10010, 0b01100], // j
    [0b10000, 0b10000, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010], // k
    [0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // l
    [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001], // m
    [0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001], // n
    [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110], // o
    [0b00000, 0b00000, 0b11110, 0b10001, 0b11110, 0b10000, 0b10000], // p
    [0b00000, 0b00000, 0b01101, 0b10011, 0b01111, 0b00001, 0b00001], // q
    [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000], // r
    [0b00000, 0b00000, 0b01110, 0b10000, 0b01110, 0b00001, 0b11110], // s
    [0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110], // t
    [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101], // u
    [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // v
    [0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010], // w
    [0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001], // x
    [0b00000, 0b00000, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110], // y
    [0b00000, 0b00000, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111], // z
];

const BLANK: [u8; 7] = [0; 7];
const MISSING: [u8; 7] = [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111];

fn glyph(c: char) -> &'static [u8; 7] {
    match c {
        'a'..='z' => &LOWERCASE[(c as u8 - b'a') as usize],
        ' ' => &BLANK,
        _ => &MISSING,
    }
}

/// Whole-pixel scale so the glyph cell roughly matches `font_size`.
fn cell_size(font_size: f32) -> u32 {
    ((font_size / LINE_H as f32).round() as u32).max(1)
}

/// Rasterize `text` into an opaque coverage mask.
pub fn render(text: &str, font_size: f32) -> LabelMask {
    let cell = cell_size(font_size);
    let count = text.chars().count() as u32;
    let width = (count * ADVANCE * cell).max(1);
    let height = LINE_H * cell;
    let mut mask = LabelMask::new(width, height);

    // Line box may overshoot the requested size by at most 2x.
    if height as f32 > font_size * 2.0 {
        log::debug!("Built-in font cannot draw {text:?} at {font_size}px, leaving it blank");
        return mask;
    }

    for (i, c) in text.chars().enumerate() {
        let origin_x = i as u32 * ADVANCE * cell;
        for (row, &bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1u8 << (GLYPH_W - 1 - col)) == 0 {
                    continue;
                }
                let x0 = origin_x + col * cell;
                let y0 = row as u32 * cell;
                for y in y0..y0 + cell {
                    for x in x0..x0 + cell {
                        mask.cover(x, y, u8::MAX);
                    }
                }
            }
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_has_ink_once_legible() {
        for font_size in [4.0, 5.0, 20.0, 163.0] {
            let mask = render("fn", font_size);
            assert!(mask.ink_bounds().is_some(), "no ink at {font_size}");
        }
    }

    #[test]
    fn test_tiny_sizes_stay_blank_instead_of_oversized() {
        // A 16x16 icon asks for a 2px label.
        for font_size in [1.0, 2.0, 3.0] {
            assert!(render("fn", font_size).ink_bounds().is_none(), "ink at {font_size}");
        }
    }

    #[test]
    fn test_cell_scales_with_font_size() {
        let small = render("fn", 8.0);
        let large = render("fn", 32.0);
        assert_eq!(small.width(), 2 * ADVANCE);
        assert_eq!(large.width(), 2 * ADVANCE * 4);
        assert_eq!(large.height(), LINE_H * 4);
    }

    #[test]
    fn test_unknown_characters_draw_a_box() {
        let mask = render("?", 8.0);
        let bounds = mask.ink_bounds().expect("box glyph has ink");
        assert_eq!((bounds.left, bounds.right), (0, GLYPH_W));
        assert_eq!(mask.get(0, 0), u8::MAX);
        assert_eq!(mask.get(0, GLYPH_H - 1), u8::MAX);
        assert_eq!(mask.get(0, GLYPH_H), 0);
    }

    #[test]
    fn test_space_has_no_ink() {
        assert!(render(" ", 16.0).ink_bounds().is_none());
    }
}
