//! PNM I/O regression test
//!
//! 1, 8, 32 bpp の PNM 読み書きをテスト。
//! ASCII 形式(P1/P2/P3)の読み込みも検証。

use glyphmatch_core::{Pix, PixelDepth};
use glyphmatch_io::pnm::{read_pnm_mem, write_pnm};
use glyphmatch_test::{Polarity, RegParams, render_glyph};

#[test]
fn pnmio_reg() {
    let mut rp = RegParams::new("pnmio");

    let gray = render_glyph('K', 27, Polarity::LightOnDark).expect("render K");
    let mut bin = Pix::new(gray.width(), gray.height(), PixelDepth::Bit1)
        .unwrap()
        .to_mut();
    for y in 0..gray.height() {
        for x in 0..gray.width() {
            if gray.get_pixel_unchecked(x, y) > 128 {
                bin.set_pixel_unchecked(x, y, 1);
            }
        }
    }
    let bin: Pix = bin.into();
    let rgb = gray.convert_to_32().unwrap();

    // --- Binary variants roundtrip exactly ---
    for (pix, magic) in [(&bin, b"P4"), (&gray, b"P5"), (&rgb, b"P6")] {
        let mut buf = Vec::new();
        write_pnm(pix, &mut buf).expect("write pnm");
        rp.compare_strings(magic, &buf[..2]);
        let back = read_pnm_mem(&buf).expect("read pnm");
        rp.compare_pix(pix, &back);
    }

    // --- ASCII PPM with a non-255 maxval ---
    let ppm = b"P3\n2 1\n# two pixels\n3\n3 0 0  0 3 3\n";
    let pix = read_pnm_mem(ppm).expect("read P3");
    rp.compare_values(32.0, pix.depth().bits() as f64, 0.0);
    rp.check(pix.get_rgb(0, 0) == Some((255, 0, 0)), "P3 red");
    rp.check(pix.get_rgb(1, 0) == Some((0, 255, 255)), "P3 cyan");

    // --- 16-bit PGM is reduced to 8 bits ---
    let pgm16 = b"P5\n2 1\n65535\n\xff\xff\x00\x00";
    let pix = read_pnm_mem(pgm16).expect("read 16-bit P5");
    rp.compare_values(255.0, pix.get_pixel(0, 0).unwrap() as f64, 0.0);
    rp.compare_values(0.0, pix.get_pixel(1, 0).unwrap() as f64, 0.0);

    assert!(rp.cleanup(), "pnmio regression test failed");
}
