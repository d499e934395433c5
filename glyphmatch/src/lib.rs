//! glyphmatch - Rotation-aware glyph recognition
//!
//! Recognizes a single glyph image as one letter of a fixed alphabet and
//! reports the rotation (0, 90, 180 or 270 degrees) it was captured at,
//! by comparing a 1024-bit fingerprint of the image against stored
//! templates.
//!
//! # Overview
//!
//! - Image container and conversions ([`Pix`])
//! - Image I/O for PNG, JPEG and PNM ([`io`])
//! - Resampling and orthogonal rotation ([`transform`])
//! - Fingerprints, template stores and matching ([`recog`])
//!
//! # Example
//!
//! ```
//! use glyphmatch::recog::{Fingerprint, Rotation, Template, TemplateStore, recognize};
//!
//! let fp = Fingerprint::from_fn(|x, y| x == y);
//! let mut store = TemplateStore::new();
//! store.push(Template::new('N', Rotation::Deg90, fp));
//!
//! let result = recognize(&fp, &store, 15);
//! assert_eq!(result.letter, Some('N'));
//! assert_eq!(result.rotation, Rotation::Deg90);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use glyphmatch_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use glyphmatch_io as io;
pub use glyphmatch_recog as recog;
pub use glyphmatch_transform as transform;
