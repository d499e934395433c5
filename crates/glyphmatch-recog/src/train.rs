//! Template generation from labeled glyph images
//!
//! Each upright sample is rotated to every requested orientation with
//! [`rotate_orth`] before encoding, so one image yields one template per
//! rotation. Optional shifted copies widen the positional tolerance of
//! the store.

use crate::error::{RecogError, RecogResult};
use crate::fingerprint::{Fingerprint, encode};
use crate::store::{Rotation, Template, TemplateStore};
use glyphmatch_core::Pix;
use glyphmatch_transform::rotate_orth;
use tracing::debug;

/// Largest accepted shift radius
pub const MAX_SHIFT_RADIUS: u32 = 4;

/// Options for template generation
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Rotations to generate for each sample (default: all four)
    pub rotations: Vec<Rotation>,

    /// Extra templates shifted by up to this many pixels in x and y
    /// (default: 0, no shifted copies)
    pub shift_radius: u32,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            rotations: Rotation::ALL.to_vec(),
            shift_radius: 0,
        }
    }
}

impl TrainOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rotations to generate
    pub fn with_rotations(mut self, rotations: &[Rotation]) -> Self {
        self.rotations = rotations.to_vec();
        self
    }

    /// Set the shift radius
    pub fn with_shift_radius(mut self, radius: u32) -> Self {
        self.shift_radius = radius;
        self
    }

    /// Validate options
    pub fn validate(&self) -> RecogResult<()> {
        if self.rotations.is_empty() {
            return Err(RecogError::InvalidParameter(
                "at least one rotation is required".to_string(),
            ));
        }
        if self.shift_radius > MAX_SHIFT_RADIUS {
            return Err(RecogError::InvalidParameter(format!(
                "shift_radius must be at most {}",
                MAX_SHIFT_RADIUS
            )));
        }
        Ok(())
    }

    /// Templates produced per sample
    pub fn templates_per_sample(&self) -> usize {
        let side = 2 * self.shift_radius as usize + 1;
        self.rotations.len() * side * side
    }
}

/// Accumulates templates from labeled samples
#[derive(Debug, Clone)]
pub struct TemplateBuilder {
    options: TrainOptions,
    store: TemplateStore,
    samples: usize,
}

impl TemplateBuilder {
    /// Create a builder after validating `options`
    pub fn new(options: TrainOptions) -> RecogResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            store: TemplateStore::new(),
            samples: 0,
        })
    }

    /// Add an upright sample image of `letter`.
    ///
    /// # Returns
    ///
    /// The number of templates added.
    pub fn add_sample(&mut self, letter: char, pix: &Pix) -> RecogResult<usize> {
        let before = self.store.len();
        let rotations = self.options.rotations.clone();
        for rotation in rotations {
            let rotated = rotate_orth(pix, rotation.quads())?;
            let fp = encode(&rotated)?;
            self.add_fingerprint(letter, rotation, fp);
        }
        self.samples += 1;
        let added = self.store.len() - before;
        debug!(letter = %letter, added, "added training sample");
        Ok(added)
    }

    /// Add an already encoded fingerprint plus its shifted copies
    pub fn add_fingerprint(&mut self, letter: char, rotation: Rotation, fp: Fingerprint) {
        self.store.push(Template::new(letter, rotation, fp));
        let r = self.options.shift_radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx != 0 || dy != 0 {
                    self.store
                        .push(Template::new(letter, rotation, fp.shifted(dx, dy)));
                }
            }
        }
    }

    /// Samples added so far
    pub fn sample_count(&self) -> usize {
        self.samples
    }

    /// Templates generated so far
    pub fn template_count(&self) -> usize {
        self.store.len()
    }

    /// Finish and hand over the store
    pub fn build(self) -> TemplateStore {
        debug!(
            samples = self.samples,
            templates = self.store.len(),
            "built template store"
        );
        self.store
    }
}
