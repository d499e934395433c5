//! glyphmatch-core - Image container for glyph recognition
//!
//! This crate provides the image type shared by the rest of the workspace:
//!
//! - [`Pix`] / [`PixMut`] - The image container (immutable / mutable)
//! - [`PixelDepth`] - Supported pixel depths (1, 8 and 32 bpp)
//! - [`color`] - Packing helpers for 32-bit RGB pixels
//!
//! Grayscale reduction and inversion live in [`pix::convert`].

pub mod error;
pub mod pix;

pub use error::{Error, Result};
pub use pix::{Pix, PixMut, PixelDepth};

/// Color channel helpers for 32-bit RGBA pixels.
///
/// # Pixel format
///
/// 32-bit pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
pub mod color {
    /// Shift amounts for extracting color channels
    pub const RED_SHIFT: u32 = 24;
    pub const GREEN_SHIFT: u32 = 16;
    pub const BLUE_SHIFT: u32 = 8;
    pub const ALPHA_SHIFT: u32 = 0;

    /// Extract red component from a 32-bit pixel.
    #[inline]
    pub fn red(pixel: u32) -> u8 {
        ((pixel >> RED_SHIFT) & 0xff) as u8
    }

    /// Extract green component from a 32-bit pixel.
    #[inline]
    pub fn green(pixel: u32) -> u8 {
        ((pixel >> GREEN_SHIFT) & 0xff) as u8
    }

    /// Extract blue component from a 32-bit pixel.
    #[inline]
    pub fn blue(pixel: u32) -> u8 {
        ((pixel >> BLUE_SHIFT) & 0xff) as u8
    }

    /// Extract alpha component from a 32-bit pixel.
    #[inline]
    pub fn alpha(pixel: u32) -> u8 {
        ((pixel >> ALPHA_SHIFT) & 0xff) as u8
    }

    /// Compose a 32-bit RGB pixel (alpha = 255).
    #[inline]
    pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
        ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
            | (255 << ALPHA_SHIFT)
    }

    /// Compose a 32-bit RGBA pixel.
    #[inline]
    pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
        ((r as u32) << RED_SHIFT)
            | ((g as u32) << GREEN_SHIFT)
            | ((b as u32) << BLUE_SHIFT)
            | ((a as u32) << ALPHA_SHIFT)
    }

    /// Extract RGB values from a 32-bit pixel.
    #[inline]
    pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
        (red(pixel), green(pixel), blue(pixel))
    }

    /// Luminance of an RGB triple.
    ///
    /// Weights 0.299 / 0.587 / 0.114, rounded to nearest.
    #[inline]
    pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
        let sum = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
        ((sum + 500) / 1000) as u8
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_compose_and_extract() {
            let pixel = compose_rgb(10, 20, 30);
            assert_eq!(extract_rgb(pixel), (10, 20, 30));
            assert_eq!(alpha(pixel), 255);

            let pixel = compose_rgba(1, 2, 3, 4);
            assert_eq!(red(pixel), 1);
            assert_eq!(green(pixel), 2);
            assert_eq!(blue(pixel), 3);
            assert_eq!(alpha(pixel), 4);
        }

        #[test]
        fn test_luminance_extremes() {
            assert_eq!(luminance(0, 0, 0), 0);
            assert_eq!(luminance(255, 255, 255), 255);
            // Green dominates the weighting
            assert!(luminance(0, 255, 0) > luminance(255, 0, 0));
            assert!(luminance(255, 0, 0) > luminance(0, 0, 255));
        }
    }
}
