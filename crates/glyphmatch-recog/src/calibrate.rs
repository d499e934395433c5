//! Acceptance threshold calibration
//!
//! Classifies a labeled validation set without any threshold and splits
//! the best distances into true positives (best letter equals the label)
//! and false positives. The chosen threshold maximizes accepted true
//! positives minus accepted false positives; among equal scores the
//! smallest threshold wins.

use crate::distance::DistanceStrategy;
use crate::error::{RecogError, RecogResult};
use crate::fingerprint::{FINGERPRINT_BITS, Fingerprint};
use crate::matcher::best_match;
use crate::store::TemplateStore;
use tracing::debug;

/// Options for threshold calibration
#[derive(Debug, Clone)]
pub struct CalibrateOptions {
    /// Distance strategy for the scan (default: Auto)
    pub strategy: DistanceStrategy,

    /// Upper bound on the returned threshold (default: 1024)
    pub max_threshold: u32,
}

impl Default for CalibrateOptions {
    fn default() -> Self {
        Self {
            strategy: DistanceStrategy::Auto,
            max_threshold: FINGERPRINT_BITS as u32,
        }
    }
}

impl CalibrateOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the distance strategy
    pub fn with_strategy(mut self, strategy: DistanceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the threshold ceiling
    pub fn with_max_threshold(mut self, max: u32) -> Self {
        self.max_threshold = max;
        self
    }
}

/// Result of threshold calibration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calibration {
    /// Chosen acceptance threshold
    pub threshold: u32,

    /// Best distances of correctly classified samples, ascending
    pub true_positives: Vec<u32>,

    /// Best distances of misclassified samples, ascending
    pub false_positives: Vec<u32>,

    /// True positives at or below the threshold
    pub accepted_true: usize,

    /// False positives at or below the threshold
    pub accepted_false: usize,
}

impl Calibration {
    /// Accepted true positives minus accepted false positives
    pub fn score(&self) -> i64 {
        self.accepted_true as i64 - self.accepted_false as i64
    }
}

/// Pick a threshold from labeled validation fingerprints.
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] for an empty validation set or
/// an empty store.
pub fn calibrate_threshold(
    store: &TemplateStore,
    samples: &[(char, Fingerprint)],
    options: &CalibrateOptions,
) -> RecogResult<Calibration> {
    if samples.is_empty() {
        return Err(RecogError::InvalidParameter(
            "validation set is empty".to_string(),
        ));
    }
    if store.is_empty() {
        return Err(RecogError::InvalidParameter(
            "template store is empty".to_string(),
        ));
    }

    let mut true_positives = Vec::new();
    let mut false_positives = Vec::new();
    for (label, fp) in samples {
        if let Some(best) = best_match(fp, store, options.strategy) {
            if best.letter == *label {
                true_positives.push(best.distance);
            } else {
                false_positives.push(best.distance);
            }
        }
    }
    true_positives.sort_unstable();
    false_positives.sort_unstable();

    let accepted = |list: &[u32], t: u32| list.partition_point(|&d| d <= t);

    // The score only changes at observed distances
    let mut candidates: Vec<u32> = true_positives
        .iter()
        .chain(false_positives.iter())
        .copied()
        .filter(|&d| d <= options.max_threshold)
        .collect();
    candidates.push(0);
    candidates.sort_unstable();
    candidates.dedup();

    let mut best_t = 0;
    let mut best_score = i64::MIN;
    for t in candidates {
        let score = accepted(&true_positives, t) as i64 - accepted(&false_positives, t) as i64;
        if score > best_score {
            best_score = score;
            best_t = t;
        }
    }

    let calibration = Calibration {
        threshold: best_t,
        accepted_true: accepted(&true_positives, best_t),
        accepted_false: accepted(&false_positives, best_t),
        true_positives,
        false_positives,
    };
    debug!(
        threshold = calibration.threshold,
        accepted_true = calibration.accepted_true,
        accepted_false = calibration.accepted_false,
        "calibrated threshold"
    );
    Ok(calibration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Rotation, Template};

    fn fp_with_ones(n: usize) -> Fingerprint {
        Fingerprint::from_fn(|x, y| ((y * 32 + x) as usize) < n)
    }

    fn store() -> TemplateStore {
        [
            Template::new('A', Rotation::Deg0, Fingerprint::zeroed()),
            Template::new('B', Rotation::Deg0, fp_with_ones(100)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_separable_distances() {
        // 'A' samples land at 2 and 5 from A; the mislabeled one sits 20 from A
        let samples = [
            ('A', fp_with_ones(2)),
            ('A', fp_with_ones(5)),
            ('C', fp_with_ones(20)),
        ];
        let c = calibrate_threshold(&store(), &samples, &CalibrateOptions::default()).unwrap();
        assert_eq!(c.true_positives, vec![2, 5]);
        assert_eq!(c.false_positives, vec![20]);
        assert_eq!(c.threshold, 5);
        assert_eq!((c.accepted_true, c.accepted_false), (2, 0));
        assert_eq!(c.score(), 2);
    }

    #[test]
    fn test_all_wrong_picks_zero() {
        let samples = [('Z', fp_with_ones(3))];
        let c = calibrate_threshold(&store(), &samples, &CalibrateOptions::default()).unwrap();
        assert_eq!(c.threshold, 0);
        assert_eq!(c.accepted_false, 0);
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let opts = CalibrateOptions::default();
        assert!(calibrate_threshold(&store(), &[], &opts).is_err());
        assert!(
            calibrate_threshold(&TemplateStore::new(), &[('A', Fingerprint::zeroed())], &opts)
                .is_err()
        );
    }
}
