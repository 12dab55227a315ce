//! CV trait extraction: keyword evidence modulated by text sentiment

use crate::error::{RankerError, Result};
use crate::personality::keyword_scorer::{KeywordTraitScorer, KeywordTraitScores};
use crate::personality::lexicon::TraitLexicon;
use crate::personality::traits::{Trait, TraitVector};
use crate::processing::text_processor::TextProcessor;
use crate::sentiment::{FusedSentiment, SentimentFusion};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitSettings {
    pub scale_factor: f32,
    /// Maximum share of the distance to 0 or 1 that polarity can move a score.
    pub adjustment_factor: f32,
    /// Push neuroticism against the polarity instead of with it.
    pub invert_neuroticism: bool,
}

impl Default for TraitSettings {
    fn default() -> Self {
        Self {
            scale_factor: 25.0,
            adjustment_factor: 0.3,
            invert_neuroticism: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvTraitAnalysis {
    pub traits: TraitVector,
    pub sentiment: FusedSentiment,
    pub keyword: KeywordTraitScores,
}

impl CvTraitAnalysis {
    pub fn polarity(&self) -> f32 {
        self.sentiment.polarity
    }
}

/// Move `raw` toward 1.0 for positive polarity and toward 0.0 for negative,
/// proportionally to |polarity| × factor.
pub fn apply_polarity(raw: f32, polarity: f32, factor: f32) -> f32 {
    let adjusted = if polarity >= 0.0 {
        raw + polarity * factor * (1.0 - raw)
    } else {
        raw + polarity * factor * raw
    };
    adjusted.clamp(0.0, 1.0)
}

pub struct CvTraitExtractor {
    scorer: KeywordTraitScorer,
    fusion: SentimentFusion,
    processor: TextProcessor,
    settings: TraitSettings,
}

impl CvTraitExtractor {
    pub fn new(lexicon: &TraitLexicon, fusion: SentimentFusion, settings: TraitSettings) -> Result<Self> {
        if !settings.adjustment_factor.is_finite() || !(0.0..=1.0).contains(&settings.adjustment_factor) {
            return Err(RankerError::validation(format!(
                "Adjustment factor must be within [0, 1], got {}",
                settings.adjustment_factor
            )));
        }
        Ok(Self {
            scorer: KeywordTraitScorer::new(lexicon, settings.scale_factor)?,
            fusion,
            processor: TextProcessor::new(),
            settings,
        })
    }

    pub fn settings(&self) -> &TraitSettings {
        &self.settings
    }

    pub fn fusion(&self) -> &SentimentFusion {
        &self.fusion
    }

    /// Keyword scores and sentiment for one CV.
    pub async fn extract(&self, text: &str) -> CvTraitAnalysis {
        let normalized = self.processor.normalize(text);
        let sentiment = self.fusion.analyze(&normalized).await;
        let keyword = self.scorer.score(&normalized);
        let traits = self.traits_with_polarity(&keyword, sentiment.polarity);

        debug!(
            "Extracted traits from {} tokens with polarity {:.3}",
            keyword.token_count, sentiment.polarity
        );

        CvTraitAnalysis {
            traits,
            sentiment,
            keyword,
        }
    }

    pub async fn extract_cv_traits(&self, text: &str) -> TraitVector {
        self.extract(text).await.traits
    }

    /// Recompute traits from a previously fused polarity without
    /// classifying the text again.
    pub fn extract_with_polarity(&self, text: &str, polarity: f32) -> TraitVector {
        let normalized = self.processor.normalize(text);
        let keyword = self.scorer.score(&normalized);
        self.traits_with_polarity(&keyword, polarity)
    }

    pub fn traits_with_polarity(&self, keyword: &KeywordTraitScores, polarity: f32) -> TraitVector {
        let polarity = if polarity.is_finite() {
            polarity.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let mut values = [0.0f32; 5];
        for (t, raw) in keyword.scores.iter() {
            let p = if t == Trait::Neuroticism && self.settings.invert_neuroticism {
                -polarity
            } else {
                polarity
            };
            values[t.index()] = apply_polarity(raw, p, self.settings.adjustment_factor);
        }
        TraitVector::clamped(values)
    }

    /// Extract many CVs concurrently, bounded by the available parallelism.
    ///
    /// Results come back in input order. `progress` is called with
    /// `(completed, total)` as each text finishes.
    pub async fn extract_batch<F>(self: &Arc<Self>, texts: Vec<String>, mut progress: F) -> Vec<CvTraitAnalysis>
    where
        F: FnMut(usize, usize),
    {
        let total = texts.len();
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();

        for (index, text) in texts.into_iter().enumerate() {
            let extractor = Arc::clone(self);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                (index, extractor.extract(&text).await)
            });
        }

        let mut slots: Vec<Option<CvTraitAnalysis>> = vec![None; total];
        let mut completed = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, analysis)) => slots[index] = Some(analysis),
                Err(e) => warn!("Trait extraction task failed: {}", e),
            }
            completed += 1;
            progress(completed, total);
        }

        self.fill_missing(slots)
    }

    /// Unwrap batch slots, giving a neutral analysis to any CV whose task
    /// did not finish.
    fn fill_missing(&self, slots: Vec<Option<CvTraitAnalysis>>) -> Vec<CvTraitAnalysis> {
        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    warn!("No trait analysis for CV #{}, using neutral traits", index);
                    self.neutral_analysis()
                })
            })
            .collect()
    }

    fn neutral_analysis(&self) -> CvTraitAnalysis {
        CvTraitAnalysis {
            traits: TraitVector::neutral(),
            sentiment: FusedSentiment::neutral(),
            keyword: self.scorer.score(""),
        }
    }
}
