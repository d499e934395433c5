//! PNM (Portable Any Map) format support
//!
//! Reads PBM, PGM and PPM in both ASCII (P1/P2/P3) and binary (P4/P5/P6)
//! form. Writing always produces the binary variants.

use crate::{IoError, IoResult};
use glyphmatch_core::{Pix, PixelDepth, color};
use std::io::{Read, Write};

struct Header {
    kind: u8,
    width: u32,
    height: u32,
    maxval: u32,
}

/// Cursor over the header tokens of a PNM byte stream.
struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn skip_space(&mut self) {
        while self.pos < self.data.len() {
            match self.data[self.pos] {
                b'#' => {
                    while self.pos < self.data.len() && self.data[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                c if c.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }
    }

    fn number(&mut self) -> IoResult<u32> {
        self.skip_space();
        let start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        std::str::from_utf8(&self.data[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| IoError::InvalidData(format!("bad PNM number at byte {}", start)))
    }

    /// Next single bit digit (P1 allows digits without separators)
    fn bit(&mut self) -> IoResult<u32> {
        self.skip_space();
        match self.data.get(self.pos) {
            Some(b'0') => {
                self.pos += 1;
                Ok(0)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(1)
            }
            _ => Err(IoError::InvalidData("bad PBM bit".to_string())),
        }
    }
}

fn parse_header(tokens: &mut Tokens<'_>) -> IoResult<Header> {
    let data = tokens.data;
    if data.len() < 2 || data[0] != b'P' || !(b'1'..=b'6').contains(&data[1]) {
        return Err(IoError::InvalidData("missing PNM magic".to_string()));
    }
    let kind = data[1] - b'0';
    tokens.pos = 2;

    let width = tokens.number()?;
    let height = tokens.number()?;
    let maxval = if kind == 1 || kind == 4 {
        1
    } else {
        tokens.number()?
    };
    if maxval == 0 || maxval > 65535 {
        return Err(IoError::InvalidData(format!("bad PNM maxval {}", maxval)));
    }

    // Exactly one whitespace byte separates the header from binary data
    if kind >= 4 {
        tokens.pos += 1;
    }

    Ok(Header {
        kind,
        width,
        height,
        maxval,
    })
}

/// Read a PNM image from a reader.
///
/// # Returns
/// A `Pix` at 1 bpp (PBM), 8 bpp (PGM), or 32 bpp (PPM).
pub fn read_pnm<R: Read>(mut reader: R) -> IoResult<Pix> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    read_pnm_mem(&data)
}

/// Decode a PNM image held in memory.
pub fn read_pnm_mem(data: &[u8]) -> IoResult<Pix> {
    let mut tokens = Tokens { data, pos: 0 };
    let h = parse_header(&mut tokens)?;

    let depth = match h.kind {
        1 | 4 => PixelDepth::Bit1,
        2 | 5 => PixelDepth::Bit8,
        _ => PixelDepth::Bit32,
    };
    let mut pm = Pix::new(h.width, h.height, depth)?.to_mut();

    let wide = h.maxval > 255;
    let scale = |v: u32| -> u32 {
        if h.maxval == 255 {
            v
        } else {
            (v * 255 + h.maxval / 2) / h.maxval
        }
    };

    let body = &data[tokens.pos.min(data.len())..];
    let mut at = 0usize;
    let mut sample = |tokens: &mut Tokens<'_>| -> IoResult<u32> {
        if h.kind <= 3 {
            return tokens.number();
        }
        let size = if wide { 2 } else { 1 };
        let bytes = body
            .get(at..at + size)
            .ok_or_else(|| IoError::InvalidData("PNM data truncated".to_string()))?;
        at += size;
        Ok(if wide {
            ((bytes[0] as u32) << 8) | bytes[1] as u32
        } else {
            bytes[0] as u32
        })
    };

    match h.kind {
        1 => {
            for y in 0..h.height {
                for x in 0..h.width {
                    let bit = tokens.bit()?;
                    pm.set_pixel_unchecked(x, y, bit);
                }
            }
        }
        4 => {
            let row_bytes = h.width.div_ceil(8) as usize;
            for y in 0..h.height {
                let start = y as usize * row_bytes;
                let row = body
                    .get(start..start + row_bytes)
                    .ok_or_else(|| IoError::InvalidData("PBM data truncated".to_string()))?;
                for x in 0..h.width {
                    let bit = (row[(x / 8) as usize] >> (7 - (x % 8))) & 1;
                    pm.set_pixel_unchecked(x, y, bit as u32);
                }
            }
        }
        2 | 5 => {
            for y in 0..h.height {
                for x in 0..h.width {
                    let v = scale(sample(&mut tokens)?.min(h.maxval));
                    pm.set_pixel_unchecked(x, y, v);
                }
            }
        }
        _ => {
            for y in 0..h.height {
                for x in 0..h.width {
                    let r = scale(sample(&mut tokens)?.min(h.maxval)) as u8;
                    let g = scale(sample(&mut tokens)?.min(h.maxval)) as u8;
                    let b = scale(sample(&mut tokens)?.min(h.maxval)) as u8;
                    pm.set_pixel_unchecked(x, y, color::compose_rgb(r, g, b));
                }
            }
        }
    }

    Ok(pm.into())
}

/// Write a `Pix` as binary PNM to a writer.
///
/// Chooses P4 (1 bpp), P5 (8 bpp grayscale), or P6 (32 bpp RGB)
/// based on the pixel depth.
pub fn write_pnm<W: Write>(pix: &Pix, mut writer: W) -> IoResult<()> {
    let (w, h) = (pix.width(), pix.height());

    match pix.depth() {
        PixelDepth::Bit1 => {
            write!(writer, "P4\n{} {}\n", w, h)?;
            let mut row = vec![0u8; w.div_ceil(8) as usize];
            for y in 0..h {
                row.fill(0);
                for x in 0..w {
                    if pix.get_pixel_unchecked(x, y) != 0 {
                        row[(x / 8) as usize] |= 0x80 >> (x % 8);
                    }
                }
                writer.write_all(&row)?;
            }
        }
        PixelDepth::Bit8 => {
            write!(writer, "P5\n{} {}\n255\n", w, h)?;
            let mut row = Vec::with_capacity(w as usize);
            for y in 0..h {
                row.clear();
                row.extend((0..w).map(|x| pix.get_pixel_unchecked(x, y) as u8));
                writer.write_all(&row)?;
            }
        }
        PixelDepth::Bit32 => {
            write!(writer, "P6\n{} {}\n255\n", w, h)?;
            let mut row = Vec::with_capacity(w as usize * 3);
            for y in 0..h {
                row.clear();
                for x in 0..w {
                    let (r, g, b) = color::extract_rgb(pix.get_pixel_unchecked(x, y));
                    row.extend_from_slice(&[r, g, b]);
                }
                writer.write_all(&row)?;
            }
        }
    }

    Ok(())
}
