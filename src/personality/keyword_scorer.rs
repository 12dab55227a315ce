//! Keyword frequency scoring of CV text against the trait lexicon

use crate::error::{RankerError, Result};
use crate::personality::lexicon::TraitLexicon;
use crate::personality::traits::{Trait, TraitVector, NEUTRAL};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use unicode_segmentation::UnicodeSegmentation;

/// Scans text for lexicon keywords and turns hit frequency into trait scores.
pub struct KeywordTraitScorer {
    matcher: AhoCorasick,
    pattern_traits: Vec<Trait>,
    patterns: Vec<String>,
    scale_factor: f32,
}

/// Per-trait keyword evidence found in one text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordTraitScores {
    pub scores: TraitVector,
    pub token_count: usize,
    pub hits: BTreeMap<Trait, usize>,
    pub matched_keywords: BTreeMap<Trait, Vec<String>>,
}

impl KeywordTraitScorer {
    pub fn new(lexicon: &TraitLexicon, scale_factor: f32) -> Result<Self> {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(RankerError::validation(format!(
                "Keyword scale factor must be positive, got {}",
                scale_factor
            )));
        }

        let (pattern_traits, patterns): (Vec<Trait>, Vec<String>) = lexicon
            .iter()
            .map(|(t, k)| (t, k.to_string()))
            .unzip();

        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .map_err(|e| RankerError::Processing(format!("Failed to build trait matcher: {}", e)))?;

        Ok(Self {
            matcher,
            pattern_traits,
            patterns,
            scale_factor,
        })
    }

    /// Score the text. Traits without any hit stay at the neutral 0.5.
    ///
    /// Lexicon keywords are lowercase, so matching runs on a lowercased copy.
    pub fn score(&self, text: &str) -> KeywordTraitScores {
        let token_count = text.unicode_words().count();
        let lowered = text.to_lowercase();
        let mut hits: BTreeMap<Trait, usize> = Trait::ALL.iter().map(|t| (*t, 0)).collect();
        let mut matched_keywords: BTreeMap<Trait, Vec<String>> = BTreeMap::new();

        for mat in self.matcher.find_iter(&lowered) {
            if !starts_at_word_boundary(&lowered, mat.start()) {
                continue;
            }
            let trait_ = self.pattern_traits[mat.pattern().as_usize()];
            *hits.entry(trait_).or_insert(0) += 1;

            let keyword = &self.patterns[mat.pattern().as_usize()];
            let seen = matched_keywords.entry(trait_).or_default();
            if !seen.contains(keyword) {
                seen.push(keyword.clone());
            }
        }

        let mut values = [NEUTRAL; 5];
        for trait_ in Trait::ALL {
            let count = hits.get(&trait_).copied().unwrap_or(0);
            values[trait_.index()] = self.frequency_score(count, token_count);
        }

        KeywordTraitScores {
            scores: TraitVector::clamped(values),
            token_count,
            hits,
            matched_keywords,
        }
    }

    /// `min(1, hits / tokens * scale)`, neutral when there is no hit.
    pub fn frequency_score(&self, hits: usize, token_count: usize) -> f32 {
        if hits == 0 || token_count == 0 {
            return NEUTRAL;
        }
        let ratio = hits as f32 / token_count as f32;
        (ratio * self.scale_factor).min(1.0)
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }
}

fn starts_at_word_boundary(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> KeywordTraitScorer {
        KeywordTraitScorer::new(&TraitLexicon::default(), 25.0).unwrap()
    }

    #[test]
    fn test_empty_text_is_neutral() {
        let result = scorer().score("");
        assert_eq!(result.scores, TraitVector::neutral());
        assert_eq!(result.token_count, 0);
    }

    #[test]
    fn test_no_hits_is_neutral() {
        let result = scorer().score("Rust compiler engineer working on borrow checking.");
        assert_eq!(result.scores, TraitVector::neutral());
    }

    #[test]
    fn test_case_insensitive_hits() {
        let result = scorer().score("Creative and CURIOUS engineer who likes to learn");
        assert_eq!(result.hits[&Trait::Openness], 3);
        // 3 hits over 8 tokens, scaled by 25, saturates
        assert_eq!(result.scores.openness(), 1.0);
        assert_eq!(result.scores.neuroticism(), NEUTRAL);
    }

    #[test]
    fn test_case_insensitive_beyond_ascii() {
        let entries: BTreeMap<Trait, Vec<String>> = Trait::ALL
            .iter()
            .map(|t| (*t, vec![format!("{}-mot", t.as_str())]))
            .chain(std::iter::once((Trait::Extraversion, vec!["énergique".to_string()])))
            .collect();
        let lexicon = TraitLexicon::new(entries).unwrap();
        let scorer = KeywordTraitScorer::new(&lexicon, 25.0).unwrap();

        let result = scorer.score("Une équipe ÉNERGIQUE et Énergique");
        assert_eq!(result.hits[&Trait::Extraversion], 2);
        assert_eq!(result.matched_keywords[&Trait::Extraversion], vec!["énergique"]);
    }

    #[test]
    fn test_word_boundary() {
        let result = scorer().score("renew planning");
        assert_eq!(result.hits[&Trait::Openness], 0);
        assert_eq!(result.hits[&Trait::Conscientiousness], 1);
    }

    #[test]
    fn test_longest_match_wins() {
        let result = scorer().score("teamwork");
        assert_eq!(result.hits[&Trait::Agreeableness], 1);
        assert_eq!(result.hits[&Trait::Extraversion], 0);
    }

    #[test]
    fn test_single_hit_not_zero_and_long_text_not_saturated() {
        let filler = "word ".repeat(199);
        let text = format!("{}stress", filler);
        let result = scorer().score(&text);
        let n = result.scores.neuroticism();
        assert!(n > 0.0 && n < 1.0);
        assert!((n - 25.0 / 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_bad_scale() {
        assert!(KeywordTraitScorer::new(&TraitLexicon::default(), 0.0).is_err());
        assert!(KeywordTraitScorer::new(&TraitLexicon::default(), f32::NAN).is_err());
    }
}
