//! PNG image format support
//!
//! Gray PNGs of 8 bits or less decode to 8 bpp (1-bit gray decodes to
//! 1 bpp with black as foreground), indexed images are expanded through
//! their palette to 32 bpp, and color images decode to 32 bpp.

use crate::{IoError, IoResult};
use glyphmatch_core::{Pix, PixelDepth, color};
use png::{BitDepth, ColorType, Decoder, Encoder};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let decoder = Decoder::new(reader);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;
    let palette: Option<Vec<u8>> = info.palette.as_ref().map(|p| p.to_vec());

    let (pix_depth, spp) = match (color_type, bit_depth) {
        (ColorType::Grayscale, BitDepth::One) => (PixelDepth::Bit1, 1),
        (ColorType::Grayscale, _) => (PixelDepth::Bit8, 1),
        (ColorType::GrayscaleAlpha, _) | (ColorType::Rgba, _) => (PixelDepth::Bit32, 4),
        (ColorType::Rgb, _) | (ColorType::Indexed, _) => (PixelDepth::Bit32, 3),
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let mut pix_mut = Pix::new(width, height, pix_depth)?.to_mut();
    pix_mut.set_spp(spp);

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let bits = bit_depth as u32;
    let sixteen = bit_depth == BitDepth::Sixteen;

    // Sub-byte sample at index x of a row
    let packed = |row: &[u8], x: u32| -> u8 {
        let per_byte = 8 / bits;
        let byte = row[(x / per_byte) as usize];
        let shift = 8 - bits * (x % per_byte + 1);
        (byte >> shift) & ((1u16 << bits) - 1) as u8
    };

    for y in 0..height {
        let row = &data[y as usize * bytes_per_row..(y as usize + 1) * bytes_per_row];
        for x in 0..width {
            let xi = x as usize;
            let val = match color_type {
                ColorType::Grayscale if bit_depth == BitDepth::One => {
                    // PNG 0 is black; Pix 1 is black
                    (packed(row, x) ^ 1) as u32
                }
                ColorType::Grayscale if sixteen => row[xi * 2] as u32,
                ColorType::Grayscale if bits < 8 => {
                    let max = (1u32 << bits) - 1;
                    packed(row, x) as u32 * 255 / max
                }
                ColorType::Grayscale => row[xi] as u32,
                ColorType::Indexed => {
                    let idx = if bits < 8 { packed(row, x) } else { row[xi] } as usize;
                    let entry = palette
                        .as_ref()
                        .and_then(|p| p.get(idx * 3..idx * 3 + 3))
                        .ok_or_else(|| {
                            IoError::InvalidData(format!("palette index {} out of range", idx))
                        })?;
                    color::compose_rgb(entry[0], entry[1], entry[2])
                }
                ColorType::GrayscaleAlpha => {
                    let (g, a) = if sixteen {
                        (row[xi * 4], row[xi * 4 + 2])
                    } else {
                        (row[xi * 2], row[xi * 2 + 1])
                    };
                    color::compose_rgba(g, g, g, a)
                }
                ColorType::Rgb => {
                    let s = if sixteen { 2 } else { 1 };
                    let i = xi * 3 * s;
                    color::compose_rgb(row[i], row[i + s], row[i + 2 * s])
                }
                ColorType::Rgba => {
                    let s = if sixteen { 2 } else { 1 };
                    let i = xi * 4 * s;
                    color::compose_rgba(row[i], row[i + s], row[i + 2 * s], row[i + 3 * s])
                }
            };
            pix_mut.set_pixel_unchecked(x, y, val);
        }
    }

    Ok(pix_mut.into())
}

/// Write a PNG image
///
/// 1 bpp writes 1-bit gray, 8 bpp writes 8-bit gray, and 32 bpp writes
/// RGB or RGBA depending on the samples per pixel.
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();

    let (color_type, bit_depth, bytes_per_row) = match pix.depth() {
        PixelDepth::Bit1 => (ColorType::Grayscale, BitDepth::One, width.div_ceil(8)),
        PixelDepth::Bit8 => (ColorType::Grayscale, BitDepth::Eight, width),
        PixelDepth::Bit32 if pix.spp() == 4 => (ColorType::Rgba, BitDepth::Eight, width * 4),
        PixelDepth::Bit32 => (ColorType::Rgb, BitDepth::Eight, width * 3),
    };
    let bytes_per_row = bytes_per_row as usize;

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(bit_depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let mut data = vec![0u8; bytes_per_row * height as usize];

    for y in 0..height {
        let row = &mut data[y as usize * bytes_per_row..(y as usize + 1) * bytes_per_row];
        for x in 0..width {
            let val = pix.get_pixel_unchecked(x, y);
            let xi = x as usize;
            match pix.depth() {
                PixelDepth::Bit1 => {
                    // Background (0) is written as white
                    if val == 0 {
                        row[xi / 8] |= 0x80 >> (xi % 8);
                    }
                }
                PixelDepth::Bit8 => row[xi] = val as u8,
                PixelDepth::Bit32 if pix.spp() == 4 => {
                    row[xi * 4] = color::red(val);
                    row[xi * 4 + 1] = color::green(val);
                    row[xi * 4 + 2] = color::blue(val);
                    row[xi * 4 + 3] = color::alpha(val);
                }
                PixelDepth::Bit32 => {
                    let (r, g, b) = color::extract_rgb(val);
                    row[xi * 3] = r;
                    row[xi * 3 + 1] = g;
                    row[xi * 3 + 2] = b;
                }
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}
