//! I/O formats regression test
//!
//! 合成グリフ画像を各形式(PNG, JPEG, PNM)で書き出し、読み戻して検証。
//! ファイル経由とメモリ経由の両方を確認。

use glyphmatch_io::{
    ImageFormat, detect_format, read_image, read_image_mem, write_image, write_image_mem,
};
use glyphmatch_test::{Polarity, RegParams, regout_path, render_glyph};

#[test]
fn ioformats_reg() {
    let mut rp = RegParams::new("ioformats");

    let pix = render_glyph('R', 64, Polarity::DarkOnLight).expect("render R");

    // --- Lossless formats roundtrip exactly, through files and memory ---
    for format in [ImageFormat::Png, ImageFormat::Pnm] {
        let path = regout_path(&format!("ioformats.{}", format.extension()));
        write_image(&pix, &path, format).expect("write");
        rp.check(detect_format(&path).ok() == Some(format), "detected format");
        let back = read_image(&path).expect("read");
        rp.compare_pix(&pix, &back);

        let mem = write_image_mem(&pix, format).expect("write mem");
        let back = read_image_mem(&mem).expect("read mem");
        rp.compare_pix(&pix, &back);
    }

    // --- JPEG is lossy: compare dimensions and the ink/paper split ---
    let mem = write_image_mem(&pix, ImageFormat::Jpeg).expect("write jpeg");
    let back = read_image_mem(&mem).expect("read jpeg");
    rp.compare_values(64.0, back.width() as f64, 0.0);
    rp.compare_values(64.0, back.height() as f64, 0.0);
    let mut flipped = 0;
    for y in 0..64 {
        for x in 0..64 {
            let a = pix.get_pixel(x, y).unwrap() < 128;
            let b = back.get_pixel(x, y).unwrap() < 128;
            if a != b {
                flipped += 1;
            }
        }
    }
    rp.compare_values(0.0, flipped as f64, 16.0);

    // --- Unknown data is rejected ---
    rp.check(read_image_mem(b"not an image").is_err(), "garbage rejected");
    rp.check(
        write_image_mem(&pix, ImageFormat::Unknown).is_err(),
        "unknown format write rejected",
    );

    assert!(rp.cleanup(), "ioformats regression test failed");
}
