//! glyphmatch-recog - Rotation-aware glyph recognition
//!
//! Classifies a single glyph image into a letter of a fixed alphabet and
//! reports which of the four canonical rotations it was captured at.
//!
//! - **Fingerprint codec**: 32x32 resample, polarity-adaptive binarization,
//!   centroid recentering, 1024-bit packing
//! - **Distance**: Hamming distance with swappable popcount strategies
//! - **Template store**: text and binary template files
//! - **Matcher**: nearest template with first-minimum tie-break and an
//!   acceptance threshold
//!
//! # Quick Start
//!
//! ```no_run
//! use glyphmatch_recog::{Recognizer, RecognizerOptions, TemplateBuilder, TrainOptions};
//! use glyphmatch_core::{Pix, PixelDepth};
//!
//! // Build templates from upright samples
//! let sample = Pix::new(48, 48, PixelDepth::Bit8).unwrap();
//! let mut builder = TemplateBuilder::new(TrainOptions::default()).unwrap();
//! builder.add_sample('A', &sample).unwrap();
//!
//! let recognizer = Recognizer::with_store(builder.build(), RecognizerOptions::default());
//! let result = recognizer.recognize_with_rotation(&sample).unwrap();
//! println!("{} at {} degrees", result.letter_or_unknown(), result.rotation);
//! ```
//!
//! # Modules
//!
//! - [`fingerprint`]: Image to fingerprint encoding
//! - [`distance`]: Hamming distance
//! - [`store`]: Template storage and persistence
//! - [`matcher`]: Nearest-template matching
//! - [`train`]: Template generation
//! - [`calibrate`]: Threshold calibration
//! - [`recognizer`]: Image-level facade

pub mod calibrate;
pub mod distance;
mod error;
pub mod fingerprint;
pub mod matcher;
pub mod recognizer;
pub mod store;
pub mod train;

pub use error::{RecogError, RecogResult};

// Re-export commonly used types
pub use calibrate::{CalibrateOptions, Calibration, calibrate_threshold};
pub use distance::{DistanceStrategy, distance};
pub use fingerprint::{EncodeDebug, FINGERPRINT_BYTES, Fingerprint, encode, encode_with_debug};
pub use matcher::{
    Candidate, DEFAULT_THRESHOLD, NO_MATCH_CONFIDENCE, RecognitionResult, UNKNOWN_LETTER,
    recognize, recognize_letter, top_matches,
};
pub use recognizer::{Recognizer, RecognizerOptions};
pub use store::{LoadReport, Rotation, Template, TemplateStore, TextBits};
pub use train::{TemplateBuilder, TrainOptions};

// Re-export core for convenience
pub use glyphmatch_core;
