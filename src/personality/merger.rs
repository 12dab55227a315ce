//! Merging of CV-derived and test-derived trait vectors

use crate::error::{RankerError, Result};
use crate::personality::traits::TraitVector;
use serde::{Deserialize, Serialize};

const WEIGHT_TOLERANCE: f32 = 1e-6;

/// Relative trust in the self-report test versus the CV text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMergeWeights", into = "RawMergeWeights")]
pub struct MergeWeights {
    test: f32,
    cv: f32,
}

#[derive(Serialize, Deserialize)]
struct RawMergeWeights {
    test_weight: f32,
    cv_weight: f32,
}

impl TryFrom<RawMergeWeights> for MergeWeights {
    type Error = RankerError;

    fn try_from(raw: RawMergeWeights) -> Result<Self> {
        MergeWeights::new(raw.test_weight, raw.cv_weight)
    }
}

impl From<MergeWeights> for RawMergeWeights {
    fn from(w: MergeWeights) -> Self {
        Self {
            test_weight: w.test,
            cv_weight: w.cv,
        }
    }
}

impl MergeWeights {
    pub fn new(test: f32, cv: f32) -> Result<Self> {
        if !test.is_finite() || !cv.is_finite() || test < 0.0 || cv < 0.0 {
            return Err(RankerError::validation(format!(
                "Merge weights must be finite and non-negative (test={}, cv={})",
                test, cv
            )));
        }
        if ((test + cv) - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(RankerError::validation(format!(
                "Merge weights must sum to 1.0, got {}",
                test + cv
            )));
        }
        Ok(Self { test, cv })
    }

    pub fn test(&self) -> f32 {
        self.test
    }

    pub fn cv(&self) -> f32 {
        self.cv
    }
}

impl Default for MergeWeights {
    fn default() -> Self {
        Self { test: 0.6, cv: 0.4 }
    }
}

/// Combine the two personality sources into the canonical profile.
///
/// A single available source is returned unchanged; with neither, the
/// neutral vector.
pub fn merge_traits(
    cv: Option<&TraitVector>,
    test: Option<&TraitVector>,
    weights: Option<MergeWeights>,
) -> TraitVector {
    match (cv, test) {
        (Some(cv), None) => *cv,
        (None, Some(test)) => *test,
        (None, None) => TraitVector::neutral(),
        (Some(cv), Some(test)) => {
            let w = weights.unwrap_or_default();
            let mut merged = [0.0f32; 5];
            let pairs = cv.to_array().into_iter().zip(test.to_array());
            for (slot, (c, t)) in merged.iter_mut().zip(pairs) {
                *slot = w.test * t + w.cv * c;
            }
            TraitVector::clamped(merged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(vals: [f32; 5]) -> TraitVector {
        TraitVector::from_array(vals).unwrap()
    }

    #[test]
    fn test_single_source_unchanged() {
        let cv = v([0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(merge_traits(Some(&cv), None, None), cv);
        assert_eq!(merge_traits(None, Some(&cv), None), cv);
    }

    #[test]
    fn test_no_source_is_neutral() {
        assert_eq!(merge_traits(None, None, None), TraitVector::neutral());
    }

    #[test]
    fn test_default_weighting() {
        let cv = v([0.0; 5]);
        let test = v([1.0; 5]);
        let merged = merge_traits(Some(&cv), Some(&test), None);
        for (_, s) in merged.iter() {
            assert!((s - 0.6).abs() < 1e-6);
        }
    }

    #[test]
    fn test_each_trait_merged_independently() {
        let cv = v([0.0, 0.25, 0.5, 0.75, 1.0]);
        let test = v([1.0, 0.75, 0.5, 0.25, 0.0]);
        let merged = merge_traits(Some(&cv), Some(&test), None).to_array();
        let expected = [0.6, 0.55, 0.5, 0.45, 0.4];
        for (m, e) in merged.iter().zip(expected) {
            assert!((m - e).abs() < 1e-6, "{} != {}", m, e);
        }
    }

    #[test]
    fn test_configured_weighting() {
        let cv = v([1.0, 0.0, 0.5, 0.5, 0.5]);
        let test = v([0.0, 1.0, 0.5, 0.5, 0.5]);
        let merged = merge_traits(Some(&cv), Some(&test), Some(MergeWeights::new(0.5, 0.5).unwrap()));
        assert!((merged.openness() - 0.5).abs() < 1e-6);
        assert!((merged.conscientiousness() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_weights_validation() {
        assert!(MergeWeights::new(0.7, 0.4).is_err());
        assert!(MergeWeights::new(-0.1, 1.1).is_err());
        assert!(MergeWeights::new(1.0, 0.0).is_ok());
    }
}
