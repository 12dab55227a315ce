//! Big-Five trait identifiers and the five-component trait vector

use crate::error::{RankerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value used for a trait when there is no evidence either way.
pub const NEUTRAL: f32 = 0.5;

/// One of the five OCEAN personality dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl Trait {
    pub const ALL: [Trait; 5] = [
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Extraversion,
        Trait::Agreeableness,
        Trait::Neuroticism,
    ];

    pub fn index(self) -> usize {
        match self {
            Trait::Openness => 0,
            Trait::Conscientiousness => 1,
            Trait::Extraversion => 2,
            Trait::Agreeableness => 3,
            Trait::Neuroticism => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Trait::Openness => "openness",
            Trait::Conscientiousness => "conscientiousness",
            Trait::Extraversion => "extraversion",
            Trait::Agreeableness => "agreeableness",
            Trait::Neuroticism => "neuroticism",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "openness" | "o" => Some(Trait::Openness),
            "conscientiousness" | "c" => Some(Trait::Conscientiousness),
            "extraversion" | "extroversion" | "e" => Some(Trait::Extraversion),
            "agreeableness" | "a" => Some(Trait::Agreeableness),
            "neuroticism" | "n" => Some(Trait::Neuroticism),
            _ => None,
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Five scalar trait scores, each within [0.0, 1.0].
///
/// Construction always goes through a checking or clamping constructor, so a
/// `TraitVector` in hand never holds NaN or out-of-range components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTraitVector")]
pub struct TraitVector {
    openness: f32,
    conscientiousness: f32,
    extraversion: f32,
    agreeableness: f32,
    neuroticism: f32,
}

#[derive(Deserialize)]
struct RawTraitVector {
    openness: f32,
    conscientiousness: f32,
    extraversion: f32,
    agreeableness: f32,
    neuroticism: f32,
}

impl TryFrom<RawTraitVector> for TraitVector {
    type Error = RankerError;

    fn try_from(raw: RawTraitVector) -> Result<Self> {
        TraitVector::new(
            raw.openness,
            raw.conscientiousness,
            raw.extraversion,
            raw.agreeableness,
            raw.neuroticism,
        )
    }
}

impl Default for TraitVector {
    fn default() -> Self {
        Self::neutral()
    }
}

impl TraitVector {
    /// Build a vector, rejecting NaN or values outside [0, 1].
    pub fn new(
        openness: f32,
        conscientiousness: f32,
        extraversion: f32,
        agreeableness: f32,
        neuroticism: f32,
    ) -> Result<Self> {
        Self::from_array([
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        ])
    }

    /// Build from values in `Trait::ALL` order.
    pub fn from_array(values: [f32; 5]) -> Result<Self> {
        for (trait_, value) in Trait::ALL.iter().zip(values.iter()) {
            if !value.is_finite() || !(0.0..=1.0).contains(value) {
                return Err(RankerError::validation(format!(
                    "{} score {} is outside [0, 1]",
                    trait_, value
                )));
            }
        }
        Ok(Self::from_array_unchecked(values))
    }

    /// Build from arbitrary values, clamping into [0, 1]. NaN becomes neutral.
    pub fn clamped(values: [f32; 5]) -> Self {
        let mut out = values;
        for v in out.iter_mut() {
            *v = if v.is_nan() { NEUTRAL } else { v.clamp(0.0, 1.0) };
        }
        Self::from_array_unchecked(out)
    }

    pub fn neutral() -> Self {
        Self::from_array_unchecked([NEUTRAL; 5])
    }

    fn from_array_unchecked(v: [f32; 5]) -> Self {
        Self {
            openness: v[0],
            conscientiousness: v[1],
            extraversion: v[2],
            agreeableness: v[3],
            neuroticism: v[4],
        }
    }

    pub fn to_array(&self) -> [f32; 5] {
        [
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism,
        ]
    }

    pub fn get(&self, trait_: Trait) -> f32 {
        self.to_array()[trait_.index()]
    }

    pub fn openness(&self) -> f32 {
        self.openness
    }

    pub fn conscientiousness(&self) -> f32 {
        self.conscientiousness
    }

    pub fn extraversion(&self) -> f32 {
        self.extraversion
    }

    pub fn agreeableness(&self) -> f32 {
        self.agreeableness
    }

    pub fn neuroticism(&self) -> f32 {
        self.neuroticism
    }

    /// Iterate `(trait, score)` pairs in `Trait::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Trait, f32)> + '_ {
        Trait::ALL.iter().map(move |t| (*t, self.get(*t)))
    }

    /// Mean absolute difference across the five traits, in [0, 1].
    pub fn mean_abs_diff(&self, other: &TraitVector) -> f32 {
        let a = self.to_array();
        let b = other.to_array();
        let total: f32 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum();
        (total / 5.0).clamp(0.0, 1.0)
    }

    /// Parse "o,c,e,a,n" as used on the command line.
    pub fn parse_csv(input: &str) -> Result<Self> {
        let values: Vec<f32> = input
            .split(',')
            .map(|part| {
                part.trim().parse::<f32>().map_err(|e| {
                    RankerError::InvalidInput(format!("Invalid trait value '{}': {}", part.trim(), e))
                })
            })
            .collect::<Result<_>>()?;

        let values: [f32; 5] = values.try_into().map_err(|v: Vec<f32>| {
            RankerError::validation(format!("Expected 5 trait values, got {}", v.len()))
        })?;
        Self::from_array(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_vector() {
        let v = TraitVector::neutral();
        assert!(v.iter().all(|(_, s)| s == NEUTRAL));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(TraitVector::new(0.1, 0.2, 1.2, 0.3, 0.4).is_err());
        assert!(TraitVector::new(0.1, f32::NAN, 0.2, 0.3, 0.4).is_err());
        assert!(TraitVector::new(0.0, 0.2, 1.0, 0.3, 0.4).is_ok());
    }

    #[test]
    fn test_clamped() {
        let v = TraitVector::clamped([-0.5, 1.5, f32::NAN, 0.25, 0.75]);
        assert_eq!(v.to_array(), [0.0, 1.0, 0.5, 0.25, 0.75]);
    }

    #[test]
    fn test_mean_abs_diff() {
        let a = TraitVector::new(1.0, 0.0, 0.5, 0.5, 0.5).unwrap();
        let b = TraitVector::new(0.0, 0.0, 0.5, 0.5, 0.0).unwrap();
        assert!((a.mean_abs_diff(&b) - 0.3).abs() < 1e-6);
        assert_eq!(a.mean_abs_diff(&a), 0.0);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: std::result::Result<TraitVector, _> = serde_json::from_str(
            r#"{"openness":0.1,"conscientiousness":0.2,"extraversion":0.3,"agreeableness":0.4,"neuroticism":0.5}"#,
        );
        assert_eq!(ok.unwrap().extraversion(), 0.3);

        let bad: std::result::Result<TraitVector, _> = serde_json::from_str(
            r#"{"openness":2.0,"conscientiousness":0.2,"extraversion":0.3,"agreeableness":0.4,"neuroticism":0.5}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_parse_csv() {
        let v = TraitVector::parse_csv("0.1, 0.2,0.3,0.4 ,0.5").unwrap();
        assert_eq!(v.get(Trait::Agreeableness), 0.4);
        assert!(TraitVector::parse_csv("0.1,0.2").is_err());
        assert!(TraitVector::parse_csv("0.1,0.2,x,0.4,0.5").is_err());
    }

    #[test]
    fn test_trait_parse() {
        assert_eq!(Trait::parse("Openness"), Some(Trait::Openness));
        assert_eq!(Trait::parse("extroversion"), Some(Trait::Extraversion));
        assert_eq!(Trait::parse("grit"), None);
    }
}
