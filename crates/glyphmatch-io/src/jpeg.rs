//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate and writes them with
//! `jpeg-encoder`. Grayscale decodes to 8 bpp; RGB and CMYK decode to
//! 32 bpp. Binary images are written as 8-bit grayscale.

use crate::{IoError, IoResult};
use glyphmatch_core::{Pix, PixelDepth, color};
use std::io::{Read, Write};

/// Default quality used by [`crate::write_image`]
pub const DEFAULT_QUALITY: u8 = 90;

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
///
/// # Returns
/// A `Pix` at 8 bpp (grayscale) or 32 bpp (RGB).
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG info unavailable".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;
    let npix = (width * height) as usize;

    let pix = match info.pixel_format {
        jpeg_decoder::PixelFormat::L8 => Pix::from_gray_samples(width, height, &data)?,
        jpeg_decoder::PixelFormat::L16 => {
            // Keep the high byte of each big-endian sample
            let samples: Vec<u8> = data.chunks_exact(2).map(|c| c[0]).collect();
            Pix::from_gray_samples(width, height, &samples)?
        }
        jpeg_decoder::PixelFormat::RGB24 => {
            check_len(&data, npix * 3)?;
            rgb_from_fn(width, height, |i| {
                color::compose_rgb(data[i * 3], data[i * 3 + 1], data[i * 3 + 2])
            })?
        }
        jpeg_decoder::PixelFormat::CMYK32 => {
            check_len(&data, npix * 4)?;
            rgb_from_fn(width, height, |i| {
                let k = data[i * 4 + 3] as u32;
                let ch = |c: u8| ((255 - c as u32) * (255 - k) / 255) as u8;
                color::compose_rgb(ch(data[i * 4]), ch(data[i * 4 + 1]), ch(data[i * 4 + 2]))
            })?
        }
    };

    Ok(pix)
}

fn check_len(data: &[u8], expected: usize) -> IoResult<()> {
    if data.len() < expected {
        return Err(IoError::InvalidData(format!(
            "JPEG data too short: {} < {}",
            data.len(),
            expected
        )));
    }
    Ok(())
}

fn rgb_from_fn(width: u32, height: u32, f: impl Fn(usize) -> u32) -> IoResult<Pix> {
    let mut pm = Pix::new(width, height, PixelDepth::Bit32)?.to_mut();
    for y in 0..height {
        for x in 0..width {
            pm.set_pixel_unchecked(x, y, f((y * width + x) as usize));
        }
    }
    Ok(pm.into())
}

/// Write a `Pix` as JPEG.
///
/// # Arguments
/// * `pix`     - The image to encode (dimensions must fit in 16 bits)
/// * `writer`  - Destination writer
/// * `quality` - Encoder quality, 1..=100
pub fn write_jpeg<W: Write>(pix: &Pix, writer: W, quality: u8) -> IoResult<()> {
    let (width, height) = (pix.width(), pix.height());
    let (w16, h16) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "JPEG dimensions too large: {}x{}",
                width, height
            )));
        }
    };

    let (data, color_type) = match pix.depth() {
        PixelDepth::Bit32 => {
            let mut data = Vec::with_capacity((width * height * 3) as usize);
            for y in 0..height {
                for x in 0..width {
                    let (r, g, b) = color::extract_rgb(pix.get_pixel_unchecked(x, y));
                    data.extend_from_slice(&[r, g, b]);
                }
            }
            (data, jpeg_encoder::ColorType::Rgb)
        }
        _ => {
            let gray = pix.convert_to_8()?;
            let mut data = Vec::with_capacity((width * height) as usize);
            for y in 0..height {
                for x in 0..width {
                    data.push(gray.get_pixel_unchecked(x, y) as u8);
                }
            }
            (data, jpeg_encoder::ColorType::Luma)
        }
    };

    let encoder = jpeg_encoder::Encoder::new(writer, quality.clamp(1, 100));
    encoder
        .encode(&data, w16, h16, color_type)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))
}
