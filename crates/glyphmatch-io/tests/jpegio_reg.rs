//! JPEG I/O regression test
//!
//! JPEG の読み書きをテスト。非可逆のため誤差を許容して比較。

use glyphmatch_core::PixelDepth;
use glyphmatch_io::jpeg::{read_jpeg, write_jpeg};
use glyphmatch_test::{Polarity, RegParams, render_glyph};
use std::io::Cursor;

#[test]
fn jpegio_reg() {
    let mut rp = RegParams::new("jpegio");

    let gray = render_glyph('O', 72, Polarity::DarkOnLight).expect("render O");

    // Higher quality gives a larger file
    let mut lo = Vec::new();
    write_jpeg(&gray, &mut lo, 20).expect("write q20");
    let mut hi = Vec::new();
    write_jpeg(&gray, &mut hi, 95).expect("write q95");
    rp.check(hi.len() > lo.len(), "q95 larger than q20");

    let back = read_jpeg(Cursor::new(hi)).expect("read");
    rp.compare_values(8.0, back.depth().bits() as f64, 0.0);

    // Block centers away from edges survive closely
    rp.compare_values(255.0, back.get_pixel(2, 2).unwrap() as f64, 6.0);
    let mut total = 0.0;
    for y in 0..72 {
        for x in 0..72 {
            let a = gray.get_pixel(x, y).unwrap() as f64;
            let b = back.get_pixel(x, y).unwrap() as f64;
            total += (a - b).abs();
        }
    }
    let mean_err = total / (72.0 * 72.0);
    rp.compare_values(0.0, mean_err, 10.0);

    // Color input decodes as color
    let rgb = gray.convert_to_32().unwrap();
    let mut buf = Vec::new();
    write_jpeg(&rgb, &mut buf, 90).expect("write rgb");
    let back = read_jpeg(Cursor::new(buf)).expect("read rgb");
    rp.check(back.depth() == PixelDepth::Bit32, "rgb decodes to 32 bpp");

    assert!(rp.cleanup(), "jpegio regression test failed");
}
