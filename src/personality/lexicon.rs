//! Trait lexicon: characteristic keywords for each Big-Five trait

use crate::error::{RankerError, Result};
use crate::personality::traits::Trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable mapping of trait to lowercase keyword set.
///
/// Built once and shared by reference with the scorers that need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Trait, Vec<String>>", into = "BTreeMap<Trait, Vec<String>>")]
pub struct TraitLexicon {
    entries: BTreeMap<Trait, Vec<String>>,
}

impl TraitLexicon {
    /// Build a lexicon; every trait needs at least one non-empty keyword.
    pub fn new(entries: BTreeMap<Trait, Vec<String>>) -> Result<Self> {
        let mut normalized = BTreeMap::new();

        for trait_ in Trait::ALL {
            let keywords = entries.get(&trait_).ok_or_else(|| {
                RankerError::validation(format!("Lexicon has no keywords for {}", trait_))
            })?;

            let mut cleaned: Vec<String> = Vec::with_capacity(keywords.len());
            for keyword in keywords {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    return Err(RankerError::validation(format!(
                        "Lexicon contains an empty keyword for {}",
                        trait_
                    )));
                }
                if !cleaned.contains(&keyword) {
                    cleaned.push(keyword);
                }
            }
            if cleaned.is_empty() {
                return Err(RankerError::validation(format!(
                    "Lexicon has no keywords for {}",
                    trait_
                )));
            }
            normalized.insert(trait_, cleaned);
        }

        Ok(Self { entries: normalized })
    }

    pub fn keywords(&self, trait_: Trait) -> &[String] {
        self.entries
            .get(&trait_)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All `(trait, keyword)` pairs, traits in `Trait::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Trait, &str)> + '_ {
        self.entries
            .iter()
            .flat_map(|(t, kws)| kws.iter().map(move |k| (*t, k.as_str())))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TryFrom<BTreeMap<Trait, Vec<String>>> for TraitLexicon {
    type Error = RankerError;

    fn try_from(entries: BTreeMap<Trait, Vec<String>>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<TraitLexicon> for BTreeMap<Trait, Vec<String>> {
    fn from(lexicon: TraitLexicon) -> Self {
        lexicon.entries
    }
}

impl Default for TraitLexicon {
    fn default() -> Self {
        let table: [(Trait, &[&str]); 5] = [
            (
                Trait::Openness,
                &[
                    "creative", "innovative", "curious", "adventurous", "new", "ideas", "learn",
                    "artistic", "imaginative",
                ],
            ),
            (
                Trait::Conscientiousness,
                &[
                    "organized", "detail-oriented", "responsible", "disciplined", "achieve",
                    "goal", "plan", "reliable",
                ],
            ),
            (
                Trait::Extraversion,
                &[
                    "team", "lead", "present", "communicate", "social", "group", "collaborate",
                    "outgoing", "energetic",
                ],
            ),
            (
                Trait::Agreeableness,
                &[
                    "help", "support", "cooperate", "friendly", "empathy", "teamwork", "kind",
                    "compassionate",
                ],
            ),
            (
                Trait::Neuroticism,
                &["stress", "pressure", "anxiety", "worry", "nervous", "tense", "moody"],
            ),
        ];

        let entries = table
            .iter()
            .map(|(t, kws)| (*t, kws.iter().map(|k| k.to_string()).collect()))
            .collect();

        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_covers_all_traits() {
        let lexicon = TraitLexicon::default();
        for trait_ in Trait::ALL {
            assert!(!lexicon.keywords(trait_).is_empty());
        }
        assert!(lexicon.keywords(Trait::Openness).contains(&"creative".to_string()));
    }

    #[test]
    fn test_new_normalizes_and_dedups() {
        let mut entries: BTreeMap<Trait, Vec<String>> = Trait::ALL
            .iter()
            .map(|t| (*t, vec!["x".to_string()]))
            .collect();
        entries.insert(
            Trait::Openness,
            vec![" Curious ".to_string(), "curious".to_string()],
        );

        let lexicon = TraitLexicon::new(entries).unwrap();
        assert_eq!(lexicon.keywords(Trait::Openness), &["curious".to_string()]);
    }

    #[test]
    fn test_missing_trait_rejected() {
        let mut entries: BTreeMap<Trait, Vec<String>> = BTreeMap::new();
        entries.insert(Trait::Openness, vec!["curious".to_string()]);
        assert!(matches!(
            TraitLexicon::new(entries),
            Err(RankerError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let mut entries: BTreeMap<Trait, Vec<String>> = Trait::ALL
            .iter()
            .map(|t| (*t, vec!["x".to_string()]))
            .collect();
        entries.insert(Trait::Neuroticism, vec!["  ".to_string()]);
        assert!(TraitLexicon::new(entries).is_err());
    }
}
