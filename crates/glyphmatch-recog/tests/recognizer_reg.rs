//! Recognizer end-to-end regression test
//!
//! 合成グリフから 4 回転分のテンプレートを生成し、回転・極性の異なる
//! 入力画像の認識、ファイル経由の認識、閾値キャリブレーションを検証。

use glyphmatch_io::{ImageFormat, write_image};
use glyphmatch_recog::{
    CalibrateOptions, Recognizer, RecognizerOptions, Rotation, TemplateBuilder, TemplateStore,
    TrainOptions, calibrate_threshold, encode,
};
use glyphmatch_test::{Polarity, RegParams, regout_path, render_glyph};
use glyphmatch_transform::rotate_orth;

/// Letters with no rotational or mirror symmetry in the test font
const LETTERS: [char; 5] = ['F', 'J', 'L', 'P', 'R'];
const SIZE: u32 = 32;

fn trained_store() -> TemplateStore {
    let mut builder = TemplateBuilder::new(TrainOptions::default()).unwrap();
    for letter in LETTERS {
        let pix = render_glyph(letter, SIZE, Polarity::DarkOnLight).unwrap();
        builder.add_sample(letter, &pix).unwrap();
    }
    log_builder(&builder);
    builder.build()
}

fn log_builder(builder: &TemplateBuilder) {
    eprintln!(
        "  {} samples -> {} templates",
        builder.sample_count(),
        builder.template_count()
    );
}

#[test]
fn recognizer_reg() {
    let mut rp = RegParams::new("recognizer");

    let store = trained_store();
    rp.compare_values((LETTERS.len() * 4) as f64, store.len() as f64, 0.0);

    test_rotated_queries(&mut rp, &store);
    test_file_roundtrip(&mut rp, &store);
    test_unloaded(&mut rp);
    test_calibration(&mut rp, &store);

    assert!(rp.cleanup(), "recognizer regression test failed");
}

fn test_rotated_queries(rp: &mut RegParams, store: &TemplateStore) {
    eprintln!("=== Rotated queries ===");
    let recognizer = Recognizer::with_store(store.clone(), RecognizerOptions::default());

    for letter in LETTERS {
        for rotation in Rotation::ALL {
            for polarity in [Polarity::DarkOnLight, Polarity::LightOnDark] {
                let upright = render_glyph(letter, SIZE, polarity).unwrap();
                let query = rotate_orth(&upright, rotation.quads()).unwrap();
                let r = recognizer.recognize_with_rotation(&query).unwrap();
                let what = format!("{} at {} ({:?})", letter, rotation, polarity);
                rp.check(r.letter == Some(letter), &format!("{}: letter", what));
                rp.check(r.rotation == rotation, &format!("{}: rotation", what));
                rp.compare_values(0.0, r.confidence as f64, 0.0);
            }
        }
    }

    // Legacy call shape agrees with the rotation-aware one
    let pix = rotate_orth(&render_glyph('P', SIZE, Polarity::DarkOnLight).unwrap(), 3).unwrap();
    rp.check(recognizer.recognize(&pix).unwrap() == 'P', "legacy recognize");

    let top = recognizer.top_matches(&pix, 3).unwrap();
    rp.check(
        top[0].letter == 'P' && top[0].rotation == Rotation::Deg270,
        "best candidate first",
    );
    for c in &top {
        eprintln!("  candidate {} @ {}: {}", c.letter, c.rotation, c.distance);
    }
}

fn test_file_roundtrip(rp: &mut RegParams, store: &TemplateStore) {
    eprintln!("=== Templates and query through files ===");
    let bin_path = regout_path("recognizer_templates.bin");
    store.save_binary(&bin_path).unwrap();

    let mut recognizer = Recognizer::new(RecognizerOptions::new().with_threshold(20));
    let report = recognizer.load_templates_binary(&bin_path).unwrap();
    rp.compare_values(store.len() as f64, report.parsed as f64, 0.0);

    let query = rotate_orth(&render_glyph('R', SIZE, Polarity::LightOnDark).unwrap(), 2).unwrap();
    let png_path = regout_path("recognizer_query.png");
    write_image(&query, &png_path, ImageFormat::Png).unwrap();
    let r = recognizer.recognize_file(&png_path).unwrap();
    eprintln!("  file query: {}", r);
    rp.check(r.letter == Some('R') && r.rotation == Rotation::Deg180, "R at 180 from PNG");
    rp.write_pix(&query, ImageFormat::Png).unwrap();
}

fn test_unloaded(rp: &mut RegParams) {
    eprintln!("=== Recognizer without templates ===");
    let recognizer = Recognizer::default();
    let pix = render_glyph('L', SIZE, Polarity::DarkOnLight).unwrap();
    let r = recognizer.recognize_with_rotation(&pix).unwrap();
    rp.check(r.is_unknown(), "unknown before load");
    rp.check(recognizer.recognize(&pix).unwrap() == '?', "legacy unknown before load");
}

fn test_calibration(rp: &mut RegParams, store: &TemplateStore) {
    eprintln!("=== Threshold calibration ===");
    let mut samples = Vec::new();
    for letter in LETTERS {
        let pix = render_glyph(letter, SIZE, Polarity::DarkOnLight).unwrap();
        samples.push((letter, encode(&pix).unwrap()));
    }
    // Letters the store does not know
    for letter in ['A', 'K', 'Y'] {
        let pix = render_glyph(letter, SIZE, Polarity::DarkOnLight).unwrap();
        samples.push((letter, encode(&pix).unwrap()));
    }

    let c = calibrate_threshold(store, &samples, &CalibrateOptions::default()).unwrap();
    eprintln!(
        "  threshold {} (true {:?}, false {:?})",
        c.threshold, c.true_positives, c.false_positives
    );
    rp.compare_values(LETTERS.len() as f64, c.accepted_true as f64, 0.0);
    rp.compare_values(0.0, c.accepted_false as f64, 0.0);
    rp.compare_values(3.0, c.false_positives.len() as f64, 0.0);
    rp.check(
        c.false_positives.iter().all(|&d| d > c.threshold),
        "threshold rejects every unknown letter",
    );
}
