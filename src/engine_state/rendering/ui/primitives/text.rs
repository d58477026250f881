//! Bitmap text UI primitive.
//!
//! Text is drawn with a built-in 5x7 font covering upper-case letters, digits and the
//! punctuation the overlays need. Lower-case input is drawn upper-case; characters without a
//! glyph advance like a space.

use crate::engine_state::rendering::framebuffer::Framebuffer;

use super::UiElement;

/// Glyph width in pixels.
pub const GLYPH_WIDTH: i32 = 5;
/// Glyph height in pixels.
pub const GLYPH_HEIGHT: usize = 7;
/// Horizontal distance between consecutive glyphs.
pub const ADVANCE: i32 = GLYPH_WIDTH + 1;
/// Vertical distance between lines of overlay text.
pub const LINE_HEIGHT: i32 = 12;

/// Glyph rows, top to bottom; bit 4 is the leftmost column.
static GLYPHS: phf::Map<char, [u8; GLYPH_HEIGHT]> = phf::phf_map! {
    'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
    'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
    'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
    'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
    'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
    'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
    'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
    'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
    'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
    'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
    'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
    'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
    'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
    'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
    'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
    'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
    'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
    'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
    'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
    'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
    'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
    'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
    'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
    'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
    'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
    'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
    '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
    '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
    '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
    '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
    '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
    '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
    '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
    '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
    '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
    '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
    ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
    '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
    '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
};

/// A single line of bitmap text.
#[derive(Debug, Clone, PartialEq)]
pub struct UiText {
    /// Top-left corner of the first glyph in pixels
    pub position: (i32, i32),
    pub text: String,
    /// Glyph color as `0x00RRGGBB`
    pub color: u32,
}

impl UiText {
    pub fn new(position: (i32, i32), text: impl Into<String>, color: u32) -> Self {
        Self {
            position,
            text: text.into(),
            color,
        }
    }

    /// Width of the rendered line in pixels.
    pub fn width(&self) -> i32 {
        let count = self.text.chars().count() as i32;
        if count == 0 {
            0
        } else {
            count * ADVANCE - 1
        }
    }
}

impl UiElement for UiText {
    fn draw(&self, frame: &mut Framebuffer) {
        let (mut x, y) = self.position;
        for character in self.text.chars() {
            if let Some(rows) = GLYPHS.get(&character.to_ascii_uppercase()) {
                for (row, bits) in rows.iter().enumerate() {
                    for column in 0..GLYPH_WIDTH {
                        if bits & (0x10 >> column) != 0 {
                            let px = x + column;
                            let py = y + row as i32;
                            if px >= 0 && py >= 0 {
                                frame.set_pixel(px as usize, py as usize, self.color);
                            }
                        }
                    }
                }
            }
            x += ADVANCE;
        }
    }
}
