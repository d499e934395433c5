//! Image scaling operations
//!
//! Provides the resamplers used to normalize glyph images:
//! - Sampling (nearest neighbor)
//! - Linear interpolation (for upscaling)
//! - Area mapping (for downscaling with anti-aliasing)
//!
//! Binary images are promoted to 8 bpp before interpolating methods run;
//! sampling keeps the input depth.

use crate::{TransformError, TransformResult};
use glyphmatch_core::{Pix, PixelDepth, color};

/// Scaling method to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMethod {
    /// Nearest-neighbor sampling (fastest, pixelated results)
    Sampling,
    /// Bilinear interpolation (good for upscaling)
    Linear,
    /// Area mapping (best for downscaling, anti-aliased)
    AreaMap,
    /// Area mapping when shrinking in both directions, linear otherwise
    #[default]
    Auto,
}

/// Scale an image to a specific size using [`ScaleMethod::Auto`]
///
/// # Arguments
/// * `pix` - Input image
/// * `width` - Target width (must be > 0)
/// * `height` - Target height (must be > 0)
pub fn scale_to_size(pix: &Pix, width: u32, height: u32) -> TransformResult<Pix> {
    scale_to_size_with_method(pix, width, height, ScaleMethod::Auto)
}

/// Scale an image to a specific size with an explicit method
pub fn scale_to_size_with_method(
    pix: &Pix,
    width: u32,
    height: u32,
    method: ScaleMethod,
) -> TransformResult<Pix> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidScaleFactor(format!(
            "target size must be positive, got {}x{}",
            width, height
        )));
    }
    if pix.width() == width && pix.height() == height {
        return Ok(pix.clone());
    }

    let shrinking = width < pix.width() && height < pix.height();
    match method {
        ScaleMethod::Sampling => scale_sampled(pix, width, height),
        ScaleMethod::AreaMap => scale_area_map(&promote_binary(pix)?, width, height),
        ScaleMethod::Auto if shrinking => scale_area_map(&promote_binary(pix)?, width, height),
        ScaleMethod::Linear | ScaleMethod::Auto => {
            scale_linear(&promote_binary(pix)?, width, height)
        }
    }
}

fn promote_binary(pix: &Pix) -> TransformResult<Pix> {
    if pix.depth() == PixelDepth::Bit1 {
        Ok(pix.convert_to_8()?)
    } else {
        Ok(pix.clone())
    }
}

/// Split a pixel into float channels (gray uses channel 0 only).
#[inline]
fn unpack(depth: PixelDepth, val: u32) -> [f32; 4] {
    match depth {
        PixelDepth::Bit32 => [
            color::red(val) as f32,
            color::green(val) as f32,
            color::blue(val) as f32,
            color::alpha(val) as f32,
        ],
        _ => [val as f32, 0.0, 0.0, 0.0],
    }
}

#[inline]
fn pack(depth: PixelDepth, ch: [f32; 4]) -> u32 {
    let q = |v: f32| (v + 0.5).clamp(0.0, 255.0) as u8;
    match depth {
        PixelDepth::Bit32 => color::compose_rgba(q(ch[0]), q(ch[1]), q(ch[2]), q(ch[3])),
        _ => q(ch[0]) as u32,
    }
}

fn scale_sampled(pix: &Pix, width: u32, height: u32) -> TransformResult<Pix> {
    let (ws, hs) = (pix.width(), pix.height());
    let mut out = Pix::new(width, height, pix.depth())?.to_mut();
    out.set_spp(pix.spp());

    for y in 0..height {
        let sy = ((y as u64 * hs as u64 + hs as u64 / 2) / height as u64).min(hs as u64 - 1);
        for x in 0..width {
            let sx = ((x as u64 * ws as u64 + ws as u64 / 2) / width as u64).min(ws as u64 - 1);
            let val = pix.get_pixel_unchecked(sx as u32, sy as u32);
            out.set_pixel_unchecked(x, y, val);
        }
    }

    Ok(out.into())
}

fn scale_linear(pix: &Pix, width: u32, height: u32) -> TransformResult<Pix> {
    let depth = pix.depth();
    let (ws, hs) = (pix.width(), pix.height());
    let fx = ws as f32 / width as f32;
    let fy = hs as f32 / height as f32;

    let mut out = Pix::new(width, height, depth)?.to_mut();
    out.set_spp(pix.spp());

    for y in 0..height {
        let syf = ((y as f32 + 0.5) * fy - 0.5).clamp(0.0, (hs - 1) as f32);
        let y0 = syf.floor() as u32;
        let y1 = (y0 + 1).min(hs - 1);
        let dy = syf - y0 as f32;
        for x in 0..width {
            let sxf = ((x as f32 + 0.5) * fx - 0.5).clamp(0.0, (ws - 1) as f32);
            let x0 = sxf.floor() as u32;
            let x1 = (x0 + 1).min(ws - 1);
            let dx = sxf - x0 as f32;

            let p00 = unpack(depth, pix.get_pixel_unchecked(x0, y0));
            let p10 = unpack(depth, pix.get_pixel_unchecked(x1, y0));
            let p01 = unpack(depth, pix.get_pixel_unchecked(x0, y1));
            let p11 = unpack(depth, pix.get_pixel_unchecked(x1, y1));

            let mut ch = [0.0f32; 4];
            for c in 0..4 {
                let top = p00[c] * (1.0 - dx) + p10[c] * dx;
                let bot = p01[c] * (1.0 - dx) + p11[c] * dx;
                ch[c] = top * (1.0 - dy) + bot * dy;
            }
            out.set_pixel_unchecked(x, y, pack(depth, ch));
        }
    }

    Ok(out.into())
}

/// Source spans and weights covered by each destination index.
fn area_weights(src_len: u32, dst_len: u32) -> Vec<Vec<(u32, f32)>> {
    let ratio = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * ratio;
            let end = (d + 1) as f64 * ratio;
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src_len);
            (first..last)
                .filter_map(|s| {
                    let lo = start.max(s as f64);
                    let hi = end.min((s + 1) as f64);
                    (hi > lo).then(|| (s, ((hi - lo) / ratio) as f32))
                })
                .collect()
        })
        .collect()
}

fn scale_area_map(pix: &Pix, width: u32, height: u32) -> TransformResult<Pix> {
    let depth = pix.depth();
    let xw = area_weights(pix.width(), width);
    let yw = area_weights(pix.height(), height);

    let mut out = Pix::new(width, height, depth)?.to_mut();
    out.set_spp(pix.spp());

    for (y, ys) in yw.iter().enumerate() {
        for (x, xs) in xw.iter().enumerate() {
            let mut ch = [0.0f32; 4];
            for &(sy, wy) in ys {
                for &(sx, wx) in xs {
                    let p = unpack(depth, pix.get_pixel_unchecked(sx, sy));
                    let w = wx * wy;
                    for c in 0..4 {
                        ch[c] += p[c] * w;
                    }
                }
            }
            out.set_pixel_unchecked(x as u32, y as u32, pack(depth, ch));
        }
    }

    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(w: u32, h: u32, val: u8) -> Pix {
        Pix::from_gray_samples(w, h, &vec![val; (w * h) as usize]).unwrap()
    }

    #[test]
    fn test_same_size_is_identity() {
        let pix = uniform(32, 32, 77);
        let out = scale_to_size(&pix, 32, 32).unwrap();
        assert!(out.equals(&pix));
    }

    #[test]
    fn test_zero_target_rejected() {
        let pix = uniform(8, 8, 0);
        assert!(scale_to_size(&pix, 0, 8).is_err());
    }

    #[test]
    fn test_area_map_preserves_uniform_value() {
        let pix = uniform(100, 70, 200);
        let out = scale_to_size(&pix, 32, 32).unwrap();
        assert_eq!((out.width(), out.height()), (32, 32));
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(out.get_pixel(x, y), Some(200));
            }
        }
    }

    #[test]
    fn test_area_weights_sum_to_one() {
        for (src, dst) in [(100u32, 32u32), (64, 32), (33, 32), (7, 3)] {
            for spans in area_weights(src, dst) {
                let total: f32 = spans.iter().map(|&(_, w)| w).sum();
                assert!((total - 1.0).abs() < 1e-4, "{src}->{dst}: {total}");
            }
        }
    }

    #[test]
    fn test_area_map_halves_checkerboard_blocks() {
        // 2x2 blocks of 0/255 collapse to the block value at half size
        let mut samples = vec![0u8; 64 * 64];
        for y in 0..64 {
            for x in 0..64 {
                if ((x / 2) + (y / 2)) % 2 == 0 {
                    samples[y * 64 + x] = 255;
                }
            }
        }
        let pix = Pix::from_gray_samples(64, 64, &samples).unwrap();
        let out = scale_to_size_with_method(&pix, 32, 32, ScaleMethod::AreaMap).unwrap();
        assert_eq!(out.get_pixel(0, 0), Some(255));
        assert_eq!(out.get_pixel(1, 0), Some(0));
    }

    #[test]
    fn test_linear_upscale_uniform() {
        let pix = uniform(4, 4, 50);
        let out = scale_to_size(&pix, 32, 32).unwrap();
        assert_eq!(out.get_pixel(31, 31), Some(50));
    }

    #[test]
    fn test_sampling_keeps_binary_depth() {
        let pix = Pix::new(64, 64, PixelDepth::Bit1).unwrap();
        let out = scale_to_size_with_method(&pix, 32, 32, ScaleMethod::Sampling).unwrap();
        assert_eq!(out.depth(), PixelDepth::Bit1);
    }

    #[test]
    fn test_rgb_area_map() {
        let mut pm = Pix::new(8, 8, PixelDepth::Bit32).unwrap().to_mut();
        pm.set_all(color::compose_rgb(10, 20, 30));
        let out = scale_to_size(&Pix::from(pm), 4, 4).unwrap();
        assert_eq!(out.get_rgb(2, 2), Some((10, 20, 30)));
    }
}
