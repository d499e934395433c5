//! Synthetic glyph fixtures
//!
//! Renders capital letters from a fixed 5x7 bitmap font so that
//! recognition tests can build templates and probes without shipping
//! image files.

use crate::error::{TestError, TestResult};
use glyphmatch_core::{Pix, PixelDepth};

/// Columns in a font cell
pub const FONT_WIDTH: u32 = 5;
/// Rows in a font cell
pub const FONT_HEIGHT: u32 = 7;

/// Gray value of dark pixels
pub const INK: u8 = 0;
/// Gray value of light pixels
pub const PAPER: u8 = 255;

/// Which way round the glyph is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Dark letter on a light background
    #[default]
    DarkOnLight,
    /// Light letter on a dark background
    LightOnDark,
}

impl Polarity {
    fn colors(self) -> (u8, u8) {
        match self {
            Polarity::DarkOnLight => (INK, PAPER),
            Polarity::LightOnDark => (PAPER, INK),
        }
    }
}

// Row bitmaps, bit 4 is the leftmost column.
const FONT: [[u8; 7]; 26] = [
    [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11], // A
    [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E], // B
    [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E], // C
    [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E], // D
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F], // E
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10], // F
    [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F], // G
    [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11], // H
    [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E], // I
    [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C], // J
    [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11], // K
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F], // L
    [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11], // M
    [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11], // N
    [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // O
    [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10], // P
    [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D], // Q
    [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11], // R
    [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E], // S
    [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04], // T
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E], // U
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04], // V
    [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A], // W
    [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11], // X
    [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04], // Y
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F], // Z
];

fn bitmap(letter: char) -> TestResult<&'static [u8; 7]> {
    let upper = letter.to_ascii_uppercase();
    if !upper.is_ascii_uppercase() {
        return Err(TestError::UnknownGlyph(letter));
    }
    Ok(&FONT[(upper as u8 - b'A') as usize])
}

/// Whether the font cell of `letter` is inked at (`col`, `row`).
pub fn glyph_bit(letter: char, col: u32, row: u32) -> TestResult<bool> {
    let rows = bitmap(letter)?;
    if col >= FONT_WIDTH || row >= FONT_HEIGHT {
        return Ok(false);
    }
    Ok(rows[row as usize] & (0x10 >> col) != 0)
}

/// Render `letter` centered on a `size` x `size` gray canvas.
///
/// Each font pixel becomes a square block of `size / 9` pixels (at least
/// one), leaving a margin of one block on every side.
pub fn render_glyph(letter: char, size: u32, polarity: Polarity) -> TestResult<Pix> {
    let cell = (size / 9).max(1);
    let x0 = size.saturating_sub(FONT_WIDTH * cell) / 2;
    let y0 = size.saturating_sub(FONT_HEIGHT * cell) / 2;
    render_glyph_at(letter, size, size, cell, (x0, y0), polarity)
}

/// Render `letter` on a `width` x `height` gray canvas with its top-left
/// font pixel at `origin` and each font pixel drawn as a `cell` square.
///
/// # Errors
///
/// Returns [`TestError::Geometry`] if the glyph would fall off the canvas.
pub fn render_glyph_at(
    letter: char,
    width: u32,
    height: u32,
    cell: u32,
    origin: (u32, u32),
    polarity: Polarity,
) -> TestResult<Pix> {
    let rows = bitmap(letter)?;
    let (x0, y0) = origin;
    if cell == 0 || x0 + FONT_WIDTH * cell > width || y0 + FONT_HEIGHT * cell > height {
        return Err(TestError::Geometry {
            message: format!(
                "{}x{} cells of {} at ({}, {}) on {}x{}",
                FONT_WIDTH, FONT_HEIGHT, cell, x0, y0, width, height
            ),
        });
    }

    let (fg, bg) = polarity.colors();
    let mut pm = Pix::new(width, height, PixelDepth::Bit8)?.to_mut();
    pm.set_all(bg as u32);

    for (row, bits) in rows.iter().enumerate() {
        for col in 0..FONT_WIDTH {
            if bits & (0x10 >> col) == 0 {
                continue;
            }
            let px = x0 + col * cell;
            let py = y0 + row as u32 * cell;
            for dy in 0..cell {
                for dx in 0..cell {
                    pm.set_pixel_unchecked(px + dx, py + dy, fg as u32);
                }
            }
        }
    }

    Ok(pm.into())
}

/// Number of inked font pixels in `letter`.
pub fn ink_count(letter: char) -> TestResult<u32> {
    Ok(bitmap(letter)?.iter().map(|r| r.count_ones()).sum())
}
