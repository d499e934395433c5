//! Recognizer facade
//!
//! Owns one [`TemplateStore`] together with the matching options and
//! exposes the image-level entry points. A recognizer that never loaded
//! templates answers unknown with [`NO_MATCH_CONFIDENCE`].
//!
//! # Example
//!
//! ```no_run
//! use glyphmatch_recog::{Recognizer, RecognizerOptions};
//! use glyphmatch_core::{Pix, PixelDepth};
//!
//! let mut recognizer = Recognizer::new(RecognizerOptions::from_env());
//! let report = recognizer.load_templates("templates.txt").unwrap();
//! println!("{} templates, {} skipped", report.parsed, report.skipped);
//!
//! let glyph = Pix::new(64, 64, PixelDepth::Bit8).unwrap();
//! let result = recognizer.recognize_with_rotation(&glyph).unwrap();
//! println!("{}", result);
//! ```
//!
//! [`NO_MATCH_CONFIDENCE`]: crate::matcher::NO_MATCH_CONFIDENCE

use crate::distance::DistanceStrategy;
use crate::error::RecogResult;
use crate::fingerprint::{Fingerprint, encode};
use crate::matcher::{self, Candidate, DEFAULT_THRESHOLD, RecognitionResult};
use crate::store::{LoadReport, TemplateStore, TextBits};
use glyphmatch_core::Pix;
use std::path::Path;
use tracing::warn;

/// Environment variable overriding the acceptance threshold
pub const THRESHOLD_ENV: &str = "GLYPHMATCH_THRESHOLD";

/// Options for recognition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizerOptions {
    /// Largest accepted distance (default: 15)
    pub threshold: u32,

    /// Distance strategy (default: Auto)
    pub strategy: DistanceStrategy,

    /// Scan templates on the rayon pool; needs the `parallel` feature
    /// (default: false)
    pub parallel: bool,

    /// Bit interpretation for text template files (default: Saturated)
    pub text_bits: TextBits,
}

impl Default for RecognizerOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            strategy: DistanceStrategy::Auto,
            parallel: false,
            text_bits: TextBits::Saturated,
        }
    }
}

impl RecognizerOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the threshold taken from `GLYPHMATCH_THRESHOLD` when
    /// it holds a non-negative integer
    pub fn from_env() -> Self {
        let options = Self::default();
        match std::env::var(THRESHOLD_ENV) {
            Ok(value) => match value.trim().parse::<u32>() {
                Ok(t) => options.with_threshold(t),
                Err(_) => {
                    warn!(value = %value, "ignoring invalid {}", THRESHOLD_ENV);
                    options
                }
            },
            Err(_) => options,
        }
    }

    /// Set the acceptance threshold
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the distance strategy
    pub fn with_strategy(mut self, strategy: DistanceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enable or disable the parallel scan
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the text template bit mode
    pub fn with_text_bits(mut self, bits: TextBits) -> Self {
        self.text_bits = bits;
        self
    }
}

/// Glyph recognizer over an owned template store
#[derive(Debug, Clone, Default)]
pub struct Recognizer {
    store: TemplateStore,
    options: RecognizerOptions,
}

impl Recognizer {
    /// Create a recognizer with an empty store
    pub fn new(options: RecognizerOptions) -> Self {
        Self {
            store: TemplateStore::new(),
            options,
        }
    }

    /// Create a recognizer over an existing store
    pub fn with_store(store: TemplateStore, options: RecognizerOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn options(&self) -> &RecognizerOptions {
        &self.options
    }

    /// Change the acceptance threshold
    pub fn set_threshold(&mut self, threshold: u32) {
        self.options.threshold = threshold;
    }

    /// Replace the store from a text template file
    pub fn load_templates<P: AsRef<Path>>(&mut self, path: P) -> RecogResult<LoadReport> {
        self.store.load_text(path, self.options.text_bits)
    }

    /// Replace the store from a binary template file
    pub fn load_templates_binary<P: AsRef<Path>>(&mut self, path: P) -> RecogResult<LoadReport> {
        self.store.load_binary(path)
    }

    /// Legacy entry point: the letter only, `'?'` when rejected
    pub fn recognize(&self, pix: &Pix) -> RecogResult<char> {
        Ok(self.recognize_with_rotation(pix)?.letter_or_unknown())
    }

    /// Letter, rotation and confidence for an image
    pub fn recognize_with_rotation(&self, pix: &Pix) -> RecogResult<RecognitionResult> {
        let fp = encode(pix)?;
        Ok(self.recognize_fingerprint(&fp))
    }

    /// Decode an image file and recognize it
    #[cfg(feature = "io")]
    pub fn recognize_file<P: AsRef<Path>>(&self, path: P) -> RecogResult<RecognitionResult> {
        let pix = glyphmatch_io::read_image(path)?;
        self.recognize_with_rotation(&pix)
    }

    /// Match an already encoded fingerprint
    pub fn recognize_fingerprint(&self, fp: &Fingerprint) -> RecognitionResult {
        matcher::apply_threshold(self.best_match(fp), self.options.threshold)
    }

    /// The `k` nearest templates for an image
    pub fn top_matches(&self, pix: &Pix, k: usize) -> RecogResult<Vec<Candidate>> {
        let fp = encode(pix)?;
        Ok(matcher::top_matches(&fp, &self.store, k, self.options.strategy))
    }

    #[cfg(feature = "parallel")]
    fn best_match(&self, fp: &Fingerprint) -> Option<Candidate> {
        if self.options.parallel {
            matcher::best_match_parallel(fp, &self.store, self.options.strategy)
        } else {
            matcher::best_match(fp, &self.store, self.options.strategy)
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn best_match(&self, fp: &Fingerprint) -> Option<Candidate> {
        matcher::best_match(fp, &self.store, self.options.strategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::NO_MATCH_CONFIDENCE;
    use crate::store::{Rotation, Template};

    #[test]
    fn test_options_builders() {
        let o = RecognizerOptions::new()
            .with_threshold(40)
            .with_strategy(DistanceStrategy::Bytewise)
            .with_parallel(true)
            .with_text_bits(TextBits::Packed);
        assert_eq!(o.threshold, 40);
        assert_eq!(o.strategy, DistanceStrategy::Bytewise);
        assert!(o.parallel);
        assert_eq!(o.text_bits, TextBits::Packed);
        assert_eq!(RecognizerOptions::default().threshold, 15);
    }

    #[test]
    fn test_unloaded_recognizer_is_unknown() {
        let r = Recognizer::default();
        let result = r.recognize_fingerprint(&Fingerprint::zeroed());
        assert!(result.is_unknown());
        assert_eq!(result.confidence, NO_MATCH_CONFIDENCE);
    }

    #[test]
    fn test_threshold_change() {
        let fp = Fingerprint::from_fn(|x, _| x < 1);
        let store: TemplateStore =
            std::iter::once(Template::new('I', Rotation::Deg0, fp)).collect();
        let mut r = Recognizer::with_store(store, RecognizerOptions::new().with_threshold(31));
        assert!(r.recognize_fingerprint(&Fingerprint::zeroed()).is_unknown());
        r.set_threshold(32);
        assert_eq!(r.recognize_fingerprint(&Fingerprint::zeroed()).letter, Some('I'));
    }

    #[test]
    fn test_missing_template_file() {
        let mut r = Recognizer::default();
        assert!(r.load_templates("/nonexistent/templates.txt").is_err());
        assert!(r.load_templates_binary("/nonexistent/templates.bin").is_err());
        assert!(r.store().is_empty());
    }
}
