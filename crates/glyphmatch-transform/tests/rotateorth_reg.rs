//! Orthogonal rotation regression test
//!
//! 直交回転(0°, 90°, 180°, 270°)をテスト。
//! 合成グリフ画像を使い、すべてのビット深度で正確な回転を検証。

use glyphmatch_core::{Pix, PixelDepth};
use glyphmatch_test::{Polarity, RegParams, render_glyph_at};
use glyphmatch_transform::{flip_lr, flip_tb, rotate_90, rotate_180, rotate_orth};

fn to_binary(gray: &Pix) -> Pix {
    let mut pm = Pix::new(gray.width(), gray.height(), PixelDepth::Bit1)
        .unwrap()
        .to_mut();
    for y in 0..gray.height() {
        for x in 0..gray.width() {
            if gray.get_pixel_unchecked(x, y) < 128 {
                pm.set_pixel_unchecked(x, y, 1);
            }
        }
    }
    pm.into()
}

#[test]
fn rotateorth_reg() {
    let mut rp = RegParams::new("rotateorth");

    // Non-square canvas so swapped dimensions are visible
    let pix8 = render_glyph_at('F', 45, 30, 3, (4, 2), Polarity::DarkOnLight).unwrap();
    let pix1 = to_binary(&pix8);
    let pix32 = pix8.convert_to_32().unwrap();

    test_orth_rotation(&mut rp, &pix1, "1bpp");
    test_orth_rotation(&mut rp, &pix8, "8bpp");
    test_orth_rotation(&mut rp, &pix32, "32bpp");

    assert!(rp.cleanup(), "rotateorth regression test failed");
}

fn test_orth_rotation(rp: &mut RegParams, pixs: &Pix, label: &str) {
    let w = pixs.width();
    let h = pixs.height();
    eprintln!("Testing {} orthogonal rotation: {}x{}", label, w, h);

    // --- rotate_orth(0) = identity ---
    let r0 = rotate_orth(pixs, 0).expect("rotate_orth 0");
    rp.compare_pix(pixs, &r0);

    // --- rotate_orth(1) = 90° CW ---
    let r1 = rotate_orth(pixs, 1).expect("rotate_orth 1");
    rp.compare_values(h as f64, r1.width() as f64, 0.0);
    rp.compare_values(w as f64, r1.height() as f64, 0.0);
    let r90 = rotate_90(pixs, true).expect("rotate_90 cw");
    rp.compare_pix(&r1, &r90);
    // top-left corner lands in the top-right
    rp.compare_values(
        pixs.get_pixel(0, 0).unwrap() as f64,
        r1.get_pixel(h - 1, 0).unwrap() as f64,
        0.0,
    );

    // --- rotate_orth(2) = 180° = both flips ---
    let r2 = rotate_orth(pixs, 2).expect("rotate_orth 2");
    let r180 = rotate_180(pixs).expect("rotate_180");
    rp.compare_pix(&r2, &r180);
    let flipped = flip_lr(&flip_tb(pixs).expect("flip_tb")).expect("flip_lr");
    rp.compare_pix(&r2, &flipped);

    // --- rotate_orth(3) = 90° CCW ---
    let r3 = rotate_orth(pixs, 3).expect("rotate_orth 3");
    let r90ccw = rotate_90(pixs, false).expect("rotate_90 ccw");
    rp.compare_pix(&r3, &r90ccw);

    // --- 4 quarter turns = identity ---
    let r4 = rotate_orth(&r3, 1).expect("4th rotation");
    rp.compare_pix(pixs, &r4);
    let r5 = rotate_orth(pixs, 5).expect("rotate_orth 5");
    rp.compare_pix(&r1, &r5);
}
