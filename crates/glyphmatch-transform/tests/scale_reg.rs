//! Scale regression test
//!
//! 各種スケーリング操作をテスト。
//! 32x32 への正規化で使う縮小・拡大の寸法と画素値を検証。

use glyphmatch_core::PixelDepth;
use glyphmatch_test::{Polarity, RegParams, render_glyph, render_glyph_at};
use glyphmatch_transform::{ScaleMethod, scale_to_size, scale_to_size_with_method};

#[test]
fn scale_reg() {
    let mut rp = RegParams::new("scale");

    let pixs = render_glyph('H', 96, Polarity::DarkOnLight).expect("render H");
    eprintln!("Image size: {}x{}", pixs.width(), pixs.height());

    // --- Test 1: downscale to the fingerprint frame ---
    let small = scale_to_size(&pixs, 32, 32).expect("scale_to_size 32");
    rp.compare_values(32.0, small.width() as f64, 0.0);
    rp.compare_values(32.0, small.height() as f64, 0.0);
    rp.compare_values(8.0, small.depth().bits() as f64, 0.0);

    // Corners are background, the crossbar center is ink.
    // 10 px cells at (23, 13): the bar spans y 43..53, column 2 spans x 43..53
    rp.compare_values(255.0, small.get_pixel(0, 0).unwrap() as f64, 0.0);
    rp.compare_values(0.0, small.get_pixel(16, 15).unwrap() as f64, 0.0);

    // --- Test 2: upscale a small glyph ---
    let tiny = render_glyph_at('H', 7, 9, 1, (1, 1), Polarity::DarkOnLight).expect("tiny H");
    let big = scale_to_size(&tiny, 32, 32).expect("upscale");
    rp.compare_values(32.0, big.width() as f64, 0.0);
    rp.compare_values(255.0, big.get_pixel(0, 0).unwrap() as f64, 0.0);

    // --- Test 3: every method hits the exact size ---
    for method in [
        ScaleMethod::Sampling,
        ScaleMethod::Linear,
        ScaleMethod::AreaMap,
        ScaleMethod::Auto,
    ] {
        let out = scale_to_size_with_method(&pixs, 40, 20, method).expect("scale");
        rp.compare_values(40.0, out.width() as f64, 0.0);
        rp.compare_values(20.0, out.height() as f64, 0.0);
    }

    // --- Test 4: color input stays color ---
    let rgb = pixs.convert_to_32().expect("to 32");
    let rgb_small = scale_to_size(&rgb, 32, 32).expect("scale rgb");
    rp.compare_values(32.0, rgb_small.depth().bits() as f64, 0.0);
    let gray_small = rgb_small.convert_to_8().expect("to 8");
    rp.compare_pix(&small, &gray_small);

    // --- Test 5: same size is a no-op ---
    let same = scale_to_size(&small, 32, 32).expect("same size");
    rp.compare_pix(&small, &same);
    rp.compare_values(
        PixelDepth::Bit8.bits() as f64,
        same.depth().bits() as f64,
        0.0,
    );

    assert!(rp.cleanup(), "scale regression test failed");
}
