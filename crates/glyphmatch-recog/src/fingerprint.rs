//! Fingerprint codec
//!
//! Converts a glyph image into a 1024-bit fingerprint:
//!
//! 1. Resample to 32x32 ([`scale_to_size`])
//! 2. Reduce to 8 bpp grayscale
//! 3. Threshold at the mean intensity; the majority class (pixels above
//!    the mean, or pixels at or below it) becomes the foreground
//! 4. Shift the foreground so its centroid lands on (16, 16), clipping
//!    pixels pushed outside the frame
//! 5. Pack row-major, bit `y * 32 + x`, least significant bit first
//!
//! Choosing the majority class makes the result independent of whether
//! the glyph is dark on light or light on dark.

use crate::error::{RecogError, RecogResult};
use glyphmatch_core::{Pix, PixelDepth};
use glyphmatch_transform::scale_to_size;
use std::fmt;

/// Side of the normalized frame in pixels
pub const FRAME_SIZE: u32 = 32;
/// Number of bits in a fingerprint
pub const FINGERPRINT_BITS: usize = (FRAME_SIZE * FRAME_SIZE) as usize;
/// Number of bytes in a fingerprint
pub const FINGERPRINT_BYTES: usize = FINGERPRINT_BITS / 8;

const CENTER: i32 = (FRAME_SIZE / 2) as i32;

/// A packed 32x32 binary glyph
///
/// Always exactly [`FINGERPRINT_BYTES`] long; immutable once built.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_BYTES]);

impl Fingerprint {
    /// All bits clear
    pub const fn zeroed() -> Self {
        Fingerprint([0; FINGERPRINT_BYTES])
    }

    /// Wrap an exact-size byte array
    pub const fn from_array(bytes: [u8; FINGERPRINT_BYTES]) -> Self {
        Fingerprint(bytes)
    }

    /// Copy a fingerprint out of a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::FingerprintLength`] unless the slice is
    /// exactly [`FINGERPRINT_BYTES`] long.
    pub fn from_bytes(bytes: &[u8]) -> RecogResult<Self> {
        let array: [u8; FINGERPRINT_BYTES] =
            bytes
                .try_into()
                .map_err(|_| RecogError::FingerprintLength {
                    expected: FINGERPRINT_BYTES,
                    actual: bytes.len(),
                })?;
        Ok(Fingerprint(array))
    }

    /// Build from per-bit predicates in row-major order
    pub fn from_fn(mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut fp = Fingerprint::zeroed();
        for y in 0..FRAME_SIZE {
            for x in 0..FRAME_SIZE {
                if f(x, y) {
                    fp.set(x, y);
                }
            }
        }
        fp
    }

    /// The packed bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_BYTES] {
        &self.0
    }

    /// Whether the pixel at (`x`, `y`) is foreground
    ///
    /// Coordinates outside the frame read as background.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= FRAME_SIZE || y >= FRAME_SIZE {
            return false;
        }
        self.bit((y * FRAME_SIZE + x) as usize)
    }

    /// Bit `i` in packing order
    #[inline]
    pub fn bit(&self, i: usize) -> bool {
        (self.0[i / 8] >> (i % 8)) & 1 == 1
    }

    #[inline]
    fn set(&mut self, x: u32, y: u32) {
        let i = (y * FRAME_SIZE + x) as usize;
        self.0[i / 8] |= 1 << (i % 8);
    }

    /// Number of foreground bits
    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|b| b.count_ones()).sum()
    }

    /// Move every foreground pixel by (`dx`, `dy`), dropping pixels that
    /// leave the frame.
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        let mut out = Fingerprint::zeroed();
        for y in 0..FRAME_SIZE {
            for x in 0..FRAME_SIZE {
                if !self.get(x, y) {
                    continue;
                }
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if in_frame(nx) && in_frame(ny) {
                    out.set(nx as u32, ny as u32);
                }
            }
        }
        out
    }

    /// The bits as 1024 `'0'`/`'1'` characters in packing order
    pub fn to_bit_string(&self) -> String {
        (0..FINGERPRINT_BITS)
            .map(|i| if self.bit(i) { '1' } else { '0' })
            .collect()
    }

    /// Render as a 32x32 1 bpp image (foreground = 1)
    pub fn to_pix(&self) -> RecogResult<Pix> {
        let mut pm = Pix::new(FRAME_SIZE, FRAME_SIZE, PixelDepth::Bit1)?.to_mut();
        for y in 0..FRAME_SIZE {
            for x in 0..FRAME_SIZE {
                if self.get(x, y) {
                    pm.set_pixel_unchecked(x, y, 1);
                }
            }
        }
        Ok(pm.into())
    }
}

impl Default for Fingerprint {
    fn default() -> Self {
        Fingerprint::zeroed()
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprint")
            .field("ones", &self.count_ones())
            .finish()
    }
}

impl From<[u8; FINGERPRINT_BYTES]> for Fingerprint {
    fn from(bytes: [u8; FINGERPRINT_BYTES]) -> Self {
        Fingerprint(bytes)
    }
}

#[inline]
fn in_frame(v: i32) -> bool {
    (0..FRAME_SIZE as i32).contains(&v)
}

/// Which intensity class was taken as foreground
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Pixels at or below the mean were the majority
    DarkForeground,
    /// Pixels above the mean were the majority (or the classes tied)
    LightForeground,
}

/// Result of mean-threshold binarization over a 32x32 frame
#[derive(Debug, Clone)]
pub struct Binarized {
    /// Foreground flags in row-major order
    pub mask: [bool; FINGERPRINT_BITS],
    /// Integer mean intensity used as the threshold
    pub threshold: u8,
    /// Class chosen as foreground
    pub polarity: Polarity,
    /// Number of foreground pixels
    pub foreground: u32,
}

/// Intermediate products of [`encode_with_debug`]
#[derive(Debug, Clone)]
pub struct EncodeDebug {
    /// The binarized frame before recentering (foreground = 1)
    pub binary: Pix,
    /// Mean-intensity threshold
    pub threshold: u8,
    /// Class chosen as foreground
    pub polarity: Polarity,
    /// Integer foreground centroid before recentering
    pub centroid: (i32, i32),
    /// Number of foreground pixels before clipping
    pub foreground: u32,
}

/// Threshold 1024 gray samples at their mean and pick the majority class.
pub fn adaptive_binarize(samples: &[u8; FINGERPRINT_BITS]) -> Binarized {
    let sum: u32 = samples.iter().map(|&v| v as u32).sum();
    let threshold = (sum >> 10) as u8;

    let above = samples.iter().filter(|&&v| v > threshold).count() as u32;
    let below = FINGERPRINT_BITS as u32 - above;

    let polarity = if below > above {
        Polarity::DarkForeground
    } else {
        Polarity::LightForeground
    };

    let mut mask = [false; FINGERPRINT_BITS];
    for (m, &v) in mask.iter_mut().zip(samples.iter()) {
        *m = match polarity {
            Polarity::DarkForeground => v <= threshold,
            Polarity::LightForeground => v > threshold,
        };
    }

    Binarized {
        mask,
        threshold,
        polarity,
        foreground: below.max(above),
    }
}

/// Recenter a foreground mask on its centroid and pack it.
///
/// The centroid is the truncated integer mean of the foreground
/// coordinates, or (16, 16) for an empty mask.
pub fn center_and_pack(mask: &[bool; FINGERPRINT_BITS]) -> (Fingerprint, (i32, i32)) {
    let (mut sx, mut sy, mut count) = (0i32, 0i32, 0i32);
    for (i, _) in mask.iter().enumerate().filter(|(_, m)| **m) {
        sx += (i as u32 % FRAME_SIZE) as i32;
        sy += (i as u32 / FRAME_SIZE) as i32;
        count += 1;
    }
    let (cx, cy) = if count > 0 {
        (sx / count, sy / count)
    } else {
        (CENTER, CENTER)
    };

    let mut fp = Fingerprint::zeroed();
    for (i, _) in mask.iter().enumerate().filter(|(_, m)| **m) {
        let nx = (i as u32 % FRAME_SIZE) as i32 - cx + CENTER;
        let ny = (i as u32 / FRAME_SIZE) as i32 - cy + CENTER;
        if in_frame(nx) && in_frame(ny) {
            fp.set(nx as u32, ny as u32);
        }
    }

    (fp, (cx, cy))
}

/// Resample to the frame size and reduce to gray samples
fn normalize(pix: &Pix) -> RecogResult<[u8; FINGERPRINT_BITS]> {
    let framed = scale_to_size(pix, FRAME_SIZE, FRAME_SIZE)?;
    let gray = framed.convert_to_8()?;

    let mut samples = [0u8; FINGERPRINT_BITS];
    for y in 0..FRAME_SIZE {
        for x in 0..FRAME_SIZE {
            samples[(y * FRAME_SIZE + x) as usize] = gray.get_pixel_unchecked(x, y) as u8;
        }
    }
    Ok(samples)
}

/// Encode a glyph image (1, 8 or 32 bpp, any size) into a fingerprint
pub fn encode(pix: &Pix) -> RecogResult<Fingerprint> {
    let samples = normalize(pix)?;
    let bin = adaptive_binarize(&samples);
    Ok(center_and_pack(&bin.mask).0)
}

/// Encode and also return the intermediate binarization for inspection
pub fn encode_with_debug(pix: &Pix) -> RecogResult<(Fingerprint, EncodeDebug)> {
    let samples = normalize(pix)?;
    let bin = adaptive_binarize(&samples);
    let (fp, centroid) = center_and_pack(&bin.mask);

    let mut pm = Pix::new(FRAME_SIZE, FRAME_SIZE, PixelDepth::Bit1)?.to_mut();
    for (i, _) in bin.mask.iter().enumerate().filter(|(_, m)| **m) {
        pm.set_pixel_unchecked(i as u32 % FRAME_SIZE, i as u32 / FRAME_SIZE, 1);
    }

    let debug = EncodeDebug {
        binary: pm.into(),
        threshold: bin.threshold,
        polarity: bin.polarity,
        centroid,
        foreground: bin.foreground,
    };
    Ok((fp, debug))
}
