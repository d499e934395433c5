//! Pixel depth conversion functions
//!
//! Reduction of any supported depth to 8 bpp grayscale, conversion of
//! grayscale back to RGB, and intensity inversion.

use super::{Pix, PixelDepth};
use crate::color;
use crate::error::Result;

impl Pix {
    /// Convert to 8 bpp grayscale.
    ///
    /// - 1 bpp: foreground (1) becomes 0 (black), background becomes 255
    /// - 8 bpp: returned as a cheap clone
    /// - 32 bpp: luminance with weights 0.299 / 0.587 / 0.114
    pub fn convert_to_8(&self) -> Result<Pix> {
        if self.depth() == PixelDepth::Bit8 {
            return Ok(self.clone());
        }

        let (w, h) = (self.width(), self.height());
        let mut out = Pix::new(w, h, PixelDepth::Bit8)?.to_mut();
        for y in 0..h {
            for x in 0..w {
                let val = self.get_pixel_unchecked(x, y);
                let gray = match self.depth() {
                    PixelDepth::Bit1 => {
                        if val == 1 {
                            0
                        } else {
                            255
                        }
                    }
                    PixelDepth::Bit32 => {
                        let (r, g, b) = color::extract_rgb(val);
                        color::luminance(r, g, b) as u32
                    }
                    PixelDepth::Bit8 => val,
                };
                out.set_pixel_unchecked(x, y, gray);
            }
        }
        Ok(out.into())
    }

    /// Convert to 32 bpp RGB by replicating the gray value.
    pub fn convert_to_32(&self) -> Result<Pix> {
        if self.depth() == PixelDepth::Bit32 {
            return Ok(self.clone());
        }

        let gray = self.convert_to_8()?;
        let (w, h) = (self.width(), self.height());
        let mut out = Pix::new(w, h, PixelDepth::Bit32)?.to_mut();
        for y in 0..h {
            for x in 0..w {
                let g = gray.get_pixel_unchecked(x, y) as u8;
                out.set_pixel_unchecked(x, y, color::compose_rgb(g, g, g));
            }
        }
        Ok(out.into())
    }

    /// Invert pixel intensities.
    ///
    /// Binary images swap foreground and background; gray and RGB
    /// images map each sample `v` to `255 - v` (alpha is preserved).
    pub fn invert(&self) -> Result<Pix> {
        let (w, h) = (self.width(), self.height());
        let mut out = Pix::new(w, h, self.depth())?.to_mut();
        out.set_spp(self.spp());
        for y in 0..h {
            for x in 0..w {
                let val = self.get_pixel_unchecked(x, y);
                let inv = match self.depth() {
                    PixelDepth::Bit1 => val ^ 1,
                    PixelDepth::Bit8 => 255 - val,
                    PixelDepth::Bit32 => {
                        let (r, g, b) = color::extract_rgb(val);
                        color::compose_rgba(255 - r, 255 - g, 255 - b, color::alpha(val))
                    }
                };
                out.set_pixel_unchecked(x, y, inv);
            }
        }
        Ok(out.into())
    }
}
