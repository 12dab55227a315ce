//! Lexicon and rule based sentiment analyzer
//!
//! Scores each valence-bearing word, adjusts it for nearby intensity
//! modifiers, negations and a contrastive "but", then squashes the sum into
//! a compound polarity in [-1, 1].

use crate::error::{RankerError, Result};
use crate::sentiment::{SentimentClassifier, SentimentOutput};
use std::collections::HashMap;

/// Normalization constant for the compound score.
const ALPHA: f32 = 15.0;
const BOOST_INCREMENT: f32 = 0.293;
const NEGATION_SCALAR: f32 = -0.74;
/// Tokens looked back over for modifiers and negations.
const WINDOW: usize = 3;

const VALENCES: &[(&str, f32)] = &[
    ("accomplished", 1.9),
    ("achieve", 1.8),
    ("achieved", 1.8),
    ("achievement", 2.2),
    ("active", 1.3),
    ("award", 2.5),
    ("awarded", 2.5),
    ("best", 3.2),
    ("boring", -1.3),
    ("brilliant", 2.8),
    ("collaborative", 1.5),
    ("confident", 2.2),
    ("conflict", -1.3),
    ("creative", 1.9),
    ("dedicated", 1.7),
    ("delighted", 2.8),
    ("difficult", -1.5),
    ("disappointed", -1.9),
    ("dynamic", 1.4),
    ("effective", 2.1),
    ("efficient", 1.7),
    ("energetic", 1.9),
    ("enjoy", 2.2),
    ("enthusiastic", 2.4),
    ("excellent", 2.7),
    ("exceptional", 2.6),
    ("excited", 2.2),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("fired", -2.6),
    ("friendly", 2.2),
    ("frustrated", -2.1),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("hard-working", 1.6),
    ("hate", -2.7),
    ("helpful", 1.8),
    ("honest", 2.3),
    ("improve", 1.9),
    ("improved", 2.1),
    ("innovative", 1.9),
    ("inspire", 2.3),
    ("lack", -1.2),
    ("lazy", -1.5),
    ("love", 3.2),
    ("motivated", 1.8),
    ("negative", -2.7),
    ("nervous", -1.5),
    ("passion", 2.0),
    ("passionate", 2.4),
    ("poor", -2.1),
    ("positive", 2.6),
    ("problem", -1.7),
    ("problems", -1.7),
    ("proud", 2.1),
    ("reliable", 1.9),
    ("resigned", -1.1),
    ("sad", -2.1),
    ("skilled", 1.6),
    ("strong", 2.3),
    ("struggle", -1.6),
    ("struggled", -1.5),
    ("success", 2.7),
    ("successful", 2.8),
    ("successfully", 2.8),
    ("terrible", -2.5),
    ("trusted", 2.1),
    ("unemployed", -1.7),
    ("unhappy", -1.8),
    ("unreliable", -1.9),
    ("weak", -1.9),
    ("win", 2.8),
    ("won", 2.7),
    ("worry", -1.9),
    ("worst", -3.1),
];

const BOOSTERS: &[&str] = &[
    "absolutely",
    "completely",
    "deeply",
    "extremely",
    "highly",
    "hugely",
    "incredibly",
    "particularly",
    "really",
    "strongly",
    "thoroughly",
    "totally",
    "very",
];

const DAMPENERS: &[&str] = &[
    "barely",
    "hardly",
    "less",
    "marginally",
    "occasionally",
    "partly",
    "slightly",
    "somewhat",
];

const NEGATIONS: &[&str] = &[
    "cannot", "never", "no", "nobody", "none", "nor", "not", "nothing", "nowhere", "without",
];

pub struct RuleBasedAnalyzer {
    valences: HashMap<String, f32>,
}

impl Default for RuleBasedAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedAnalyzer {
    pub fn new() -> Self {
        let valences = VALENCES
            .iter()
            .map(|(word, v)| (word.to_string(), *v))
            .collect();
        Self { valences }
    }

    /// Extend or override the built-in valence lexicon.
    pub fn with_valences<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, f32)>,
    {
        for (word, valence) in entries {
            self.valences.insert(word.to_lowercase(), valence);
        }
        self
    }

    /// Compound polarity in [-1, 1].
    pub fn compound(&self, text: &str) -> Result<f32> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(RankerError::Sentiment(
                "cannot analyze empty text".to_string(),
            ));
        }

        let but_index = tokens.iter().position(|t| t == "but");
        let mut sum = 0.0f32;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.valences.get(token.as_str()) else {
                continue;
            };
            let mut valence = base;

            for distance in 1..=WINDOW.min(i) {
                let previous = tokens[i - distance].as_str();
                let decay = match distance {
                    1 => 1.0,
                    2 => 0.95,
                    _ => 0.9,
                };
                let scalar = modifier_scalar(previous, base) * decay;
                valence += scalar;
            }

            if tokens[i.saturating_sub(WINDOW)..i]
                .iter()
                .any(|t| is_negation(t))
            {
                valence *= NEGATION_SCALAR;
            }

            if let Some(b) = but_index {
                if i < b {
                    valence *= 0.5;
                } else if i > b {
                    valence *= 1.5;
                }
            }

            sum += valence;
        }

        Ok(normalize(sum))
    }
}

impl SentimentClassifier for RuleBasedAnalyzer {
    fn name(&self) -> &str {
        "rule-based"
    }

    fn classify(&self, text: &str) -> Result<SentimentOutput> {
        self.compound(text).map(SentimentOutput::from_polarity)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-')
                .trim_matches('\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}

/// Intensity change a modifier applies to a word of valence `base`.
fn modifier_scalar(token: &str, base: f32) -> f32 {
    let magnitude = if BOOSTERS.contains(&token) {
        BOOST_INCREMENT
    } else if DAMPENERS.contains(&token) {
        -BOOST_INCREMENT
    } else {
        return 0.0;
    };
    if base < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

fn normalize(score: f32) -> f32 {
    if score == 0.0 {
        return 0.0;
    }
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_error() {
        let analyzer = RuleBasedAnalyzer::new();
        assert!(analyzer.compound("").is_err());
        assert!(analyzer.classify("   \n").is_err());
    }

    #[test]
    fn test_no_sentiment_words_is_neutral() {
        let analyzer = RuleBasedAnalyzer::new();
        assert_eq!(analyzer.compound("Python SQL Docker").unwrap(), 0.0);
    }

    #[test]
    fn test_positive_and_negative() {
        let analyzer = RuleBasedAnalyzer::new();
        assert!(analyzer.compound("Excellent and successful engineer").unwrap() > 0.5);
        assert!(analyzer.compound("A terrible failure").unwrap() < -0.5);
    }

    #[test]
    fn test_single_word_compound() {
        let analyzer = RuleBasedAnalyzer::new();
        let expected = 1.9 / (1.9f32 * 1.9 + 15.0).sqrt();
        assert!((analyzer.compound("good").unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_negation_flips() {
        let analyzer = RuleBasedAnalyzer::new();
        assert!(analyzer.compound("not good").unwrap() < 0.0);
        assert!(analyzer.compound("I wasn't happy").unwrap() < 0.0);
    }

    #[test]
    fn test_booster_and_dampener() {
        let analyzer = RuleBasedAnalyzer::new();
        let plain = analyzer.compound("good").unwrap();
        assert!(analyzer.compound("very good").unwrap() > plain);
        assert!(analyzer.compound("slightly good").unwrap() < plain);
    }

    #[test]
    fn test_but_shifts_emphasis() {
        let analyzer = RuleBasedAnalyzer::new();
        assert!(analyzer.compound("The job was good but the team failed").unwrap() < 0.0);
    }

    #[test]
    fn test_classify_polarity_matches_compound() {
        let analyzer = RuleBasedAnalyzer::new();
        let text = "Proud of a difficult but successful launch";
        let compound = analyzer.compound(text).unwrap();
        assert_eq!(analyzer.classify(text).unwrap().polarity(), compound);
    }

    #[test]
    fn test_custom_valences() {
        let analyzer = RuleBasedAnalyzer::new().with_valences([("shipped".to_string(), 2.0)]);
        assert!(analyzer.compound("Shipped it").unwrap() > 0.0);
    }
}
