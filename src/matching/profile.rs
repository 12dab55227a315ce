//! Candidate and job profile records consumed by the matcher

use crate::error::{RankerError, Result};
use crate::personality::merger::{merge_traits, MergeWeights};
use crate::personality::traits::TraitVector;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Highest completed education, ordered from none to doctorate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    #[default]
    None,
    HighSchool,
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Parse a level name or common degree abbreviation.
    pub fn parse(input: &str) -> Option<Self> {
        let lower = input.trim().to_lowercase();
        let level = match lower.as_str() {
            "" | "none" => EducationLevel::None,
            "high_school" | "high school" | "highschool" => EducationLevel::HighSchool,
            "associate" => EducationLevel::Associate,
            "bachelor" => EducationLevel::Bachelor,
            "master" => EducationLevel::Master,
            "doctorate" => EducationLevel::Doctorate,
            other => match Self::detect(other) {
                EducationLevel::None => return None,
                detected => detected,
            },
        };
        Some(level)
    }

    /// Highest level mentioned anywhere in free text.
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        let table: [(EducationLevel, &[&str]); 5] = [
            (
                EducationLevel::Doctorate,
                &["phd", "ph.d", "doctorate", "doctoral", "doctor of"],
            ),
            (
                EducationLevel::Master,
                &[
                    "msc", "m.sc", "master's", "masters", "master of", "mba", "meng", "m.eng",
                ],
            ),
            (
                EducationLevel::Bachelor,
                &["bsc", "b.sc", "bachelor", "bachelor's", "beng", "b.eng", "b.a", "b.s"],
            ),
            (
                EducationLevel::Associate,
                &["associate degree", "associate's", "associate of"],
            ),
            (
                EducationLevel::HighSchool,
                &["high school", "secondary school", "ged", "a-levels"],
            ),
        ];

        table
            .iter()
            .find(|(_, terms)| terms.iter().any(|t| contains_term(&lower, t)))
            .map(|(level, _)| *level)
            .unwrap_or(EducationLevel::None)
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EducationLevel::None => "none",
            EducationLevel::HighSchool => "high school",
            EducationLevel::Associate => "associate",
            EducationLevel::Bachelor => "bachelor",
            EducationLevel::Master => "master",
            EducationLevel::Doctorate => "doctorate",
        };
        write!(f, "{}", name)
    }
}

fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(start, _)| {
        let end = start + term.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

/// Lowercase and trim a set of labels, dropping empties.
pub fn normalize_labels<I, S>(labels: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// A candidate's structured attributes and personality signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub years_experience: f64,
    #[serde(default)]
    pub education: EducationLevel,
    #[serde(default)]
    pub certifications: BTreeSet<String>,
    #[serde(default)]
    cv_traits: Option<TraitVector>,
    #[serde(default)]
    test_traits: Option<TraitVector>,
    #[serde(default)]
    merged_traits: Option<TraitVector>,
    /// Fused sentiment polarity from the CV text, kept so the classifier
    /// runs once per candidate.
    #[serde(default)]
    cv_polarity: Option<f32>,
    /// SHA-256 of the CV text `cv_polarity` was computed from.
    #[serde(default)]
    cv_digest: Option<String>,
}

impl CandidateProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            phone: None,
            skills: BTreeSet::new(),
            years_experience: 0.0,
            education: EducationLevel::None,
            certifications: BTreeSet::new(),
            cv_traits: None,
            test_traits: None,
            merged_traits: None,
            cv_polarity: None,
            cv_digest: None,
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.skills = normalize_labels(skills);
        self
    }

    pub fn with_certifications<I, S>(mut self, certifications: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.certifications = normalize_labels(certifications);
        self
    }

    pub fn with_experience(mut self, years: f64) -> Self {
        self.years_experience = years;
        self
    }

    pub fn with_education(mut self, level: EducationLevel) -> Self {
        self.education = level;
        self
    }

    /// Store CV-derived traits and the polarity they were computed with.
    pub fn set_cv_analysis(&mut self, traits: TraitVector, polarity: f32, weights: MergeWeights) {
        self.cv_traits = Some(traits);
        self.cv_polarity = Some(polarity);
        self.cv_digest = None;
        self.remerge(weights);
    }

    pub fn set_test_traits(&mut self, traits: TraitVector, weights: MergeWeights) {
        self.test_traits = Some(traits);
        self.remerge(weights);
    }

    fn remerge(&mut self, weights: MergeWeights) {
        self.merged_traits = Some(merge_traits(
            self.cv_traits.as_ref(),
            self.test_traits.as_ref(),
            Some(weights),
        ));
    }

    pub fn cv_traits(&self) -> Option<&TraitVector> {
        self.cv_traits.as_ref()
    }

    pub fn test_traits(&self) -> Option<&TraitVector> {
        self.test_traits.as_ref()
    }

    /// Remember which CV text the current CV analysis belongs to.
    pub fn record_cv_source(&mut self, text: &str) {
        self.cv_digest = Some(text_digest(text));
    }

    /// The stored polarity, if it was computed from exactly this text.
    pub fn cached_polarity(&self, text: &str) -> Option<f32> {
        match (&self.cv_digest, self.cv_polarity) {
            (Some(digest), Some(polarity)) if *digest == text_digest(text) => Some(polarity),
            _ => None,
        }
    }

    /// The canonical personality profile used for ranking.
    pub fn personality(&self) -> TraitVector {
        self.merged_traits.unwrap_or_else(|| {
            merge_traits(self.cv_traits.as_ref(), self.test_traits.as_ref(), None)
        })
    }

    /// Reasons this profile cannot be ranked, if any.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(RankerError::validation("candidate id is empty"));
        }
        if !self.years_experience.is_finite() || self.years_experience < 0.0 {
            return Err(RankerError::validation(format!(
                "years of experience {} is not a non-negative number",
                self.years_experience
            )));
        }
        if let Some(p) = self.cv_polarity {
            if !p.is_finite() || !(-1.0..=1.0).contains(&p) {
                return Err(RankerError::validation(format!(
                    "cached CV polarity {} is outside [-1, 1]",
                    p
                )));
            }
        }
        Ok(())
    }
}

fn text_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.finalize().iter().map(|b| format!("{:02x}", b)).collect()
}

/// Five non-negative sub-score weights summing to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights", into = "RawWeights")]
pub struct SubScoreWeights {
    skills: f64,
    experience: f64,
    education: f64,
    certifications: f64,
    personality: f64,
}

#[derive(Serialize, Deserialize)]
struct RawWeights {
    skills: f64,
    experience: f64,
    education: f64,
    certifications: f64,
    personality: f64,
}

impl TryFrom<RawWeights> for SubScoreWeights {
    type Error = RankerError;

    fn try_from(raw: RawWeights) -> Result<Self> {
        SubScoreWeights::new(
            raw.skills,
            raw.experience,
            raw.education,
            raw.certifications,
            raw.personality,
        )
    }
}

impl From<SubScoreWeights> for RawWeights {
    fn from(w: SubScoreWeights) -> Self {
        Self {
            skills: w.skills,
            experience: w.experience,
            education: w.education,
            certifications: w.certifications,
            personality: w.personality,
        }
    }
}

impl Default for SubScoreWeights {
    fn default() -> Self {
        Self {
            skills: 0.30,
            experience: 0.20,
            education: 0.10,
            certifications: 0.10,
            personality: 0.30,
        }
    }
}

impl SubScoreWeights {
    pub fn new(
        skills: f64,
        experience: f64,
        education: f64,
        certifications: f64,
        personality: f64,
    ) -> Result<Self> {
        let all = [skills, experience, education, certifications, personality];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RankerError::validation(format!(
                "sub-score weights must be finite and non-negative: {:?}",
                all
            )));
        }
        let sum: f64 = all.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(RankerError::validation(format!(
                "sub-score weights must sum to 1.0, got {}",
                sum
            )));
        }
        Ok(Self {
            skills,
            experience,
            education,
            certifications,
            personality,
        })
    }

    /// Weights in skills, experience, education, certifications, personality order.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.skills,
            self.experience,
            self.education,
            self.certifications,
            self.personality,
        ]
    }

    pub fn skills(&self) -> f64 {
        self.skills
    }

    pub fn experience(&self) -> f64 {
        self.experience
    }

    pub fn education(&self) -> f64 {
        self.education
    }

    pub fn certifications(&self) -> f64 {
        self.certifications
    }

    pub fn personality(&self) -> f64 {
        self.personality
    }
}

/// Unvalidated job profile as written in a profile file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProfileDraft {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub min_years_experience: f64,
    #[serde(default)]
    pub required_education: EducationLevel,
    #[serde(default)]
    pub required_certifications: Vec<String>,
    #[serde(default)]
    pub desired_traits: TraitVector,
    #[serde(default)]
    pub weights: SubScoreWeights,
}

/// A validated job profile. There are no mutators: once built it stays as
/// it was, so rankings computed against it are reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JobProfileDraft", into = "JobProfileDraft")]
pub struct JobProfile {
    id: String,
    title: String,
    description: Option<String>,
    required_skills: BTreeSet<String>,
    min_years_experience: f64,
    required_education: EducationLevel,
    required_certifications: BTreeSet<String>,
    desired_traits: TraitVector,
    weights: SubScoreWeights,
}

impl TryFrom<JobProfileDraft> for JobProfile {
    type Error = RankerError;

    fn try_from(draft: JobProfileDraft) -> Result<Self> {
        JobProfile::new(draft)
    }
}

impl From<JobProfile> for JobProfileDraft {
    fn from(job: JobProfile) -> Self {
        Self {
            id: job.id,
            title: job.title,
            description: job.description,
            required_skills: job.required_skills.into_iter().collect(),
            min_years_experience: job.min_years_experience,
            required_education: job.required_education,
            required_certifications: job.required_certifications.into_iter().collect(),
            desired_traits: job.desired_traits,
            weights: job.weights,
        }
    }
}

impl JobProfile {
    pub fn new(draft: JobProfileDraft) -> Result<Self> {
        let id = draft.id.trim().to_string();
        if id.is_empty() {
            return Err(RankerError::validation("job profile id is empty"));
        }
        if !draft.min_years_experience.is_finite() || draft.min_years_experience < 0.0 {
            return Err(RankerError::validation(format!(
                "required experience {} is not a non-negative number",
                draft.min_years_experience
            )));
        }

        Ok(Self {
            id,
            title: draft.title,
            description: draft.description,
            required_skills: normalize_labels(&draft.required_skills),
            min_years_experience: draft.min_years_experience,
            required_education: draft.required_education,
            required_certifications: normalize_labels(&draft.required_certifications),
            desired_traits: draft.desired_traits,
            weights: draft.weights,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_or(content, SubScoreWeights::default())
    }

    /// Parse a profile file, using `default_weights` when it sets none.
    pub fn from_toml_str_or(content: &str, default_weights: SubScoreWeights) -> Result<Self> {
        let parse_error = |e: toml::de::Error| {
            RankerError::InvalidInput(format!("Failed to parse job profile: {}", e))
        };
        let table: toml::Table = toml::from_str(content).map_err(parse_error)?;
        let has_weights = table.contains_key("weights");
        let mut draft: JobProfileDraft = toml::Value::Table(table).try_into().map_err(parse_error)?;
        if !has_weights {
            draft.weights = default_weights;
        }
        Self::new(draft)
    }

    pub fn load(path: &Path, default_weights: SubScoreWeights) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str_or(&content, default_weights)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn required_skills(&self) -> &BTreeSet<String> {
        &self.required_skills
    }

    pub fn min_years_experience(&self) -> f64 {
        self.min_years_experience
    }

    pub fn required_education(&self) -> EducationLevel {
        self.required_education
    }

    pub fn required_certifications(&self) -> &BTreeSet<String> {
        &self.required_certifications
    }

    pub fn desired_traits(&self) -> &TraitVector {
        &self.desired_traits
    }

    pub fn weights(&self) -> &SubScoreWeights {
        &self.weights
    }
}
