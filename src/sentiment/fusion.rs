//! Fusion of the neural and rule-based sentiment signals

use crate::error::RankerError;
use crate::sentiment::{RuleBasedAnalyzer, SentimentClassifier};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusedSentiment {
    /// Combined polarity in [-1, 1].
    pub polarity: f32,
    pub neural: Option<f32>,
    pub rule: Option<f32>,
    /// True when only one signal (or none) contributed.
    pub degraded: bool,
}

impl FusedSentiment {
    pub fn neutral() -> Self {
        Self {
            polarity: 0.0,
            neural: None,
            rule: None,
            degraded: false,
        }
    }
}

/// Equal-weight mean of the available polarities; 0.0 when none.
pub fn fuse(neural: Option<f32>, rule: Option<f32>) -> f32 {
    let polarity = match (neural, rule) {
        (Some(n), Some(r)) => (n + r) / 2.0,
        (Some(p), None) | (None, Some(p)) => p,
        (None, None) => 0.0,
    };
    polarity.clamp(-1.0, 1.0)
}

#[derive(Clone)]
pub struct SentimentFusion {
    neural: Option<Arc<dyn SentimentClassifier>>,
    rule: Arc<dyn SentimentClassifier>,
    timeout: Duration,
}

impl SentimentFusion {
    pub fn new(
        neural: Option<Arc<dyn SentimentClassifier>>,
        rule: Arc<dyn SentimentClassifier>,
        timeout: Duration,
    ) -> Self {
        Self {
            neural,
            rule,
            timeout,
        }
    }

    /// Fusion with only the built-in rule-based analyzer.
    pub fn rule_only(timeout: Duration) -> Self {
        Self::new(None, Arc::new(RuleBasedAnalyzer::new()), timeout)
    }

    pub fn has_neural(&self) -> bool {
        self.neural.is_some()
    }

    pub async fn analyze(&self, text: &str) -> FusedSentiment {
        if text.trim().is_empty() {
            debug!("Empty text, using neutral polarity");
            return FusedSentiment::neutral();
        }

        let neural = async {
            match &self.neural {
                Some(classifier) => self.run(classifier.clone(), text).await,
                None => None,
            }
        };
        let rule = self.run(self.rule.clone(), text);
        let (neural, rule) = tokio::join!(neural, rule);

        let polarity = fuse(neural, rule);
        let degraded = neural.is_none() || rule.is_none();
        if neural.is_none() && rule.is_none() {
            warn!("No sentiment signal available, using neutral polarity");
        }
        debug!(
            "Fused polarity {:.3} (neural={:?}, rule={:?})",
            polarity, neural, rule
        );

        FusedSentiment {
            polarity,
            neural,
            rule,
            degraded,
        }
    }

    /// Run one classifier on a blocking worker, mapping any failure to `None`.
    async fn run(&self, classifier: Arc<dyn SentimentClassifier>, text: &str) -> Option<f32> {
        let name = classifier.name().to_string();
        let owned = text.to_string();
        let task = tokio::task::spawn_blocking(move || classifier.classify(&owned));

        let error = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(Ok(output))) => return Some(output.polarity().clamp(-1.0, 1.0)),
            Ok(Ok(Err(e))) => e,
            Ok(Err(join_error)) => RankerError::Sentiment(format!("task failed: {}", join_error)),
            Err(_) => RankerError::Timeout(format!("{} after {:?}", name, self.timeout)),
        };
        warn!(
            "Sentiment signal '{}' unavailable, falling back: {}",
            name, error
        );
        None
    }
}
