//! Nearest-neighbor matching against a template store
//!
//! Every template is compared with the query by Hamming distance. The
//! smallest distance wins and the first template reaching it is kept, so
//! scan order only matters for ties. A best distance above the threshold
//! (or an empty store) is reported as unknown; the confidence still carries
//! the distance that was found.

use crate::distance::DistanceStrategy;
use crate::fingerprint::Fingerprint;
use crate::store::{Rotation, TemplateStore};
use std::fmt;

/// Default acceptance threshold
pub const DEFAULT_THRESHOLD: u32 = 15;

/// Letter reported by the legacy API when nothing matched
pub const UNKNOWN_LETTER: char = '?';

/// Confidence reported when the store holds no templates
pub const NO_MATCH_CONFIDENCE: u32 = u32::MAX;

/// One scored template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Position of the template in the store
    pub index: usize,
    pub letter: char,
    pub rotation: Rotation,
    pub distance: u32,
}

/// Outcome of one recognition call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognitionResult {
    /// `None` when rejected
    pub letter: Option<char>,
    /// `Deg0` when rejected
    pub rotation: Rotation,
    /// Minimum Hamming distance found
    pub confidence: u32,
}

impl RecognitionResult {
    /// Rejected result carrying the best distance seen
    pub fn unknown(confidence: u32) -> Self {
        RecognitionResult {
            letter: None,
            rotation: Rotation::Deg0,
            confidence,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.letter.is_none()
    }

    /// The letter, or [`UNKNOWN_LETTER`]
    pub fn letter_or_unknown(&self) -> char {
        self.letter.unwrap_or(UNKNOWN_LETTER)
    }
}

impl fmt::Display for RecognitionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} (distance {})",
            self.letter_or_unknown(),
            self.rotation,
            self.confidence
        )
    }
}

/// Best template for `fp`, first minimum in scan order
pub fn best_match(
    fp: &Fingerprint,
    store: &TemplateStore,
    strategy: DistanceStrategy,
) -> Option<Candidate> {
    let strategy = strategy.resolve();
    let mut best: Option<Candidate> = None;
    for (index, t) in store.iter().enumerate() {
        let d = strategy.distance(fp, &t.fingerprint);
        // strict: later equal distances keep the earlier template
        if best.is_none_or(|b| d < b.distance) {
            best = Some(Candidate {
                index,
                letter: t.letter,
                rotation: t.rotation,
                distance: d,
            });
        }
    }
    best
}

/// Same result as [`best_match`], with the scan spread over the rayon pool
///
/// Partial minima are keyed by `(distance, index)` so merging them picks
/// the earliest template among equal distances.
#[cfg(feature = "parallel")]
pub fn best_match_parallel(
    fp: &Fingerprint,
    store: &TemplateStore,
    strategy: DistanceStrategy,
) -> Option<Candidate> {
    use rayon::prelude::*;

    let strategy = strategy.resolve();
    let templates = store.as_slice();
    let (distance, index) = templates
        .par_iter()
        .enumerate()
        .map(|(i, t)| (strategy.distance(fp, &t.fingerprint), i))
        .min()?;
    let t = &templates[index];
    Some(Candidate {
        index,
        letter: t.letter,
        rotation: t.rotation,
        distance,
    })
}

/// Turn a best candidate into an accept/reject result
pub fn apply_threshold(best: Option<Candidate>, threshold: u32) -> RecognitionResult {
    match best {
        None => RecognitionResult::unknown(NO_MATCH_CONFIDENCE),
        Some(c) if c.distance > threshold => RecognitionResult::unknown(c.distance),
        Some(c) => RecognitionResult {
            letter: Some(c.letter),
            rotation: c.rotation,
            confidence: c.distance,
        },
    }
}

/// Rotation-aware recognition with the automatic distance strategy
pub fn recognize(fp: &Fingerprint, store: &TemplateStore, threshold: u32) -> RecognitionResult {
    recognize_with(fp, store, threshold, DistanceStrategy::Auto)
}

/// Rotation-aware recognition with an explicit distance strategy
pub fn recognize_with(
    fp: &Fingerprint,
    store: &TemplateStore,
    threshold: u32,
    strategy: DistanceStrategy,
) -> RecognitionResult {
    apply_threshold(best_match(fp, store, strategy), threshold)
}

/// Legacy recognition: only the letter, [`UNKNOWN_LETTER`] when rejected
pub fn recognize_letter(fp: &Fingerprint, store: &TemplateStore, threshold: u32) -> char {
    recognize(fp, store, threshold).letter_or_unknown()
}

/// The `k` closest templates, ascending by distance, scan order breaking ties
pub fn top_matches(
    fp: &Fingerprint,
    store: &TemplateStore,
    k: usize,
    strategy: DistanceStrategy,
) -> Vec<Candidate> {
    let strategy = strategy.resolve();
    let mut all: Vec<Candidate> = store
        .iter()
        .enumerate()
        .map(|(index, t)| Candidate {
            index,
            letter: t.letter,
            rotation: t.rotation,
            distance: strategy.distance(fp, &t.fingerprint),
        })
        .collect();
    // stable sort keeps scan order among equal distances
    all.sort_by_key(|c| c.distance);
    all.truncate(k);
    all
}
