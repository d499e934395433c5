//! Orthogonal rotation and flip operations
//!
//! Rotations are exact pixel permutations, so they work identically for
//! every supported depth. Quarter turns are counted clockwise.

use crate::TransformResult;
use glyphmatch_core::{Pix, PixMut};

/// Rotate an image by 90-degree increments
///
/// # Arguments
/// * `pix` - Input image
/// * `quads` - Number of 90-degree clockwise rotations (taken modulo 4)
///
/// # Returns
/// The rotated image
pub fn rotate_orth(pix: &Pix, quads: u32) -> TransformResult<Pix> {
    match quads % 4 {
        0 => Ok(pix.deep_clone()),
        1 => rotate_90(pix, true),
        2 => rotate_180(pix),
        _ => rotate_90(pix, false),
    }
}

/// Rotate an image 90 degrees
///
/// # Arguments
/// * `pix` - Input image
/// * `clockwise` - If true, rotate clockwise; otherwise counterclockwise
pub fn rotate_90(pix: &Pix, clockwise: bool) -> TransformResult<Pix> {
    let w = pix.width();
    let h = pix.height();

    // Output dimensions are swapped
    let mut out_mut = Pix::new(h, w, pix.depth())?.to_mut();
    out_mut.set_spp(pix.spp());

    rotate_90_impl(pix, &mut out_mut, clockwise, w, h);

    Ok(out_mut.into())
}

fn rotate_90_impl(src: &Pix, dst: &mut PixMut, clockwise: bool, w: u32, h: u32) {
    for y in 0..h {
        for x in 0..w {
            let val = src.get_pixel_unchecked(x, y);
            let (nx, ny) = if clockwise {
                (h - 1 - y, x)
            } else {
                (y, w - 1 - x)
            };
            dst.set_pixel_unchecked(nx, ny, val);
        }
    }
}

/// Rotate an image 180 degrees
pub fn rotate_180(pix: &Pix) -> TransformResult<Pix> {
    let w = pix.width();
    let h = pix.height();

    let mut out_mut = Pix::new(w, h, pix.depth())?.to_mut();
    out_mut.set_spp(pix.spp());

    for y in 0..h {
        for x in 0..w {
            let val = pix.get_pixel_unchecked(x, y);
            out_mut.set_pixel_unchecked(w - 1 - x, h - 1 - y, val);
        }
    }

    Ok(out_mut.into())
}

/// Flip an image left-right (horizontal mirror)
pub fn flip_lr(pix: &Pix) -> TransformResult<Pix> {
    let w = pix.width();
    let h = pix.height();

    let mut out_mut = Pix::new(w, h, pix.depth())?.to_mut();
    out_mut.set_spp(pix.spp());

    for y in 0..h {
        for x in 0..w {
            let val = pix.get_pixel_unchecked(x, y);
            out_mut.set_pixel_unchecked(w - 1 - x, y, val);
        }
    }

    Ok(out_mut.into())
}

/// Flip an image top-bottom (vertical mirror)
pub fn flip_tb(pix: &Pix) -> TransformResult<Pix> {
    let w = pix.width();
    let h = pix.height();

    let mut out_mut = Pix::new(w, h, pix.depth())?.to_mut();
    out_mut.set_spp(pix.spp());

    for y in 0..h {
        for x in 0..w {
            let val = pix.get_pixel_unchecked(x, y);
            out_mut.set_pixel_unchecked(x, h - 1 - y, val);
        }
    }

    Ok(out_mut.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphmatch_core::PixelDepth;

    fn ramp(w: u32, h: u32) -> Pix {
        let samples: Vec<u8> = (0..w * h).map(|i| i as u8).collect();
        Pix::from_gray_samples(w, h, &samples).unwrap()
    }

    #[test]
    fn test_rotate_90_clockwise_corners() {
        let pix = ramp(3, 2);
        let r = rotate_90(&pix, true).unwrap();
        assert_eq!((r.width(), r.height()), (2, 3));
        // Top-left of the source moves to the top-right
        assert_eq!(r.get_pixel(1, 0), pix.get_pixel(0, 0));
        // Bottom-left of the source moves to the top-left
        assert_eq!(r.get_pixel(0, 0), pix.get_pixel(0, 1));
    }

    #[test]
    fn test_rotate_90_ccw_inverts_cw() {
        let pix = ramp(5, 4);
        let cw = rotate_90(&pix, true).unwrap();
        let back = rotate_90(&cw, false).unwrap();
        assert!(back.equals(&pix));
    }

    #[test]
    fn test_rotate_180_is_double_flip() {
        let pix = ramp(4, 3);
        let r = rotate_180(&pix).unwrap();
        let flipped = flip_tb(&flip_lr(&pix).unwrap()).unwrap();
        assert!(r.equals(&flipped));
    }

    #[test]
    fn test_rotate_orth_binary() {
        let mut pm = Pix::new(33, 5, PixelDepth::Bit1).unwrap().to_mut();
        pm.set_pixel(32, 0, 1).unwrap();
        let pix: Pix = pm.into();
        let r = rotate_orth(&pix, 1).unwrap();
        assert_eq!(r.get_pixel(4, 32), Some(1));
        let r4 = rotate_orth(&rotate_orth(&r, 2).unwrap(), 1).unwrap();
        assert!(r4.equals(&pix));
    }
}
