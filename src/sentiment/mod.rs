//! Sentiment analysis of CV text
//!
//! Two interchangeable implementations of [`SentimentClassifier`] are
//! provided: a lexicon-driven [`RuleBasedAnalyzer`] and a
//! [`NeuralClassifier`] running a fine-tuned DistilBERT checkpoint. [`SentimentFusion`] combines
//! them into a single polarity.

pub mod fusion;
pub mod model_manager;
pub mod neural;
pub mod rule_based;

pub use fusion::{fuse, FusedSentiment, SentimentFusion};
pub use model_manager::SentimentModelManager;
pub use neural::NeuralClassifier;
pub use rule_based::RuleBasedAnalyzer;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentOutput {
    pub label: SentimentLabel,
    /// Confidence in `label`, in [0, 1].
    pub confidence: f32,
}

impl SentimentOutput {
    pub fn new(label: SentimentLabel, confidence: f32) -> Self {
        Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Build from a signed polarity in [-1, 1].
    pub fn from_polarity(polarity: f32) -> Self {
        if polarity >= 0.0 {
            Self::new(SentimentLabel::Positive, polarity)
        } else {
            Self::new(SentimentLabel::Negative, -polarity)
        }
    }

    /// Signed polarity: positive confidence as-is, negative negated.
    pub fn polarity(&self) -> f32 {
        match self.label {
            SentimentLabel::Positive => self.confidence,
            SentimentLabel::Negative => -self.confidence,
        }
    }
}

/// Capability shared by every sentiment signal.
pub trait SentimentClassifier: Send + Sync {
    fn name(&self) -> &str;

    fn classify(&self, text: &str) -> Result<SentimentOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_sign() {
        assert_eq!(SentimentOutput::new(SentimentLabel::Positive, 0.8).polarity(), 0.8);
        assert_eq!(SentimentOutput::new(SentimentLabel::Negative, 0.8).polarity(), -0.8);
    }

    #[test]
    fn test_from_polarity_round_trips_sign() {
        let out = SentimentOutput::from_polarity(-0.25);
        assert_eq!(out.label, SentimentLabel::Negative);
        assert_eq!(out.polarity(), -0.25);
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(SentimentOutput::new(SentimentLabel::Positive, 1.7).confidence, 1.0);
    }
}
