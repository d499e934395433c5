//! glyphmatch-transform - Geometric transformations for glyph images
//!
//! This crate provides the two geometric operations the recognizer needs:
//!
//! - Orthogonal rotations (90, 180, 270 degrees) and flips, used to derive
//!   rotated templates from upright samples
//! - Scaling to a fixed size (sampling, linear interpolation, area mapping),
//!   used to normalize glyph images before fingerprinting

mod error;
pub mod rotate;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use rotate::{flip_lr, flip_tb, rotate_90, rotate_180, rotate_orth};
pub use scale::{ScaleMethod, scale_to_size, scale_to_size_with_method};
