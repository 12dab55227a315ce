//! Sub-score computation between a candidate and a job profile

use crate::matching::profile::{normalize_labels, CandidateProfile, EducationLevel, JobProfile, SubScoreWeights};
use crate::personality::traits::TraitVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strsim::jaro_winkler;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchingSettings {
    /// Credit lost per education level below the requirement.
    pub education_decay: f32,
    /// Jaro-Winkler similarity above which a candidate skill is reported as
    /// close to a missing requirement.
    pub similar_skill_threshold: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            education_decay: 0.25,
            similar_skill_threshold: 0.88,
        }
    }
}

/// The five independent sub-scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub skills: f32,
    pub experience: f32,
    pub education: f32,
    pub certifications: f32,
    pub personality: f32,
}

impl SubScores {
    pub fn as_array(&self) -> [f32; 5] {
        [
            self.skills,
            self.experience,
            self.education,
            self.certifications,
            self.personality,
        ]
    }

    /// Σ sub-score × weight, clamped to [0, 1].
    pub fn weighted(&self, weights: &SubScoreWeights) -> f32 {
        let total: f64 = self
            .as_array()
            .iter()
            .zip(weights.as_array().iter())
            .map(|(s, w)| *s as f64 * w)
            .sum();
        (total as f32).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarSkill {
    pub required: String,
    pub candidate: String,
    pub similarity: f64,
}

/// What the candidate lacks. Informational only; never feeds the scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchGaps {
    pub missing_skills: Vec<String>,
    pub missing_certifications: Vec<String>,
    pub similar_skills: Vec<SimilarSkill>,
}

pub struct JobProfileMatcher {
    settings: MatchingSettings,
}

impl Default for JobProfileMatcher {
    fn default() -> Self {
        Self::new(MatchingSettings::default())
    }
}

impl JobProfileMatcher {
    pub fn new(settings: MatchingSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MatchingSettings {
        &self.settings
    }

    pub fn sub_scores(&self, candidate: &CandidateProfile, job: &JobProfile) -> SubScores {
        let skills = normalize_labels(&candidate.skills);
        let certifications = normalize_labels(&candidate.certifications);

        SubScores {
            skills: overlap_ratio(&skills, job.required_skills()),
            experience: experience_score(candidate.years_experience, job.min_years_experience()),
            education: education_score(
                candidate.education,
                job.required_education(),
                self.settings.education_decay,
            ),
            certifications: overlap_ratio(&certifications, job.required_certifications()),
            personality: personality_score(&candidate.personality(), job.desired_traits()),
        }
    }

    pub fn gaps(&self, candidate: &CandidateProfile, job: &JobProfile) -> MatchGaps {
        let skills = normalize_labels(&candidate.skills);
        let certifications = normalize_labels(&candidate.certifications);

        let missing_skills: Vec<String> = job.required_skills().difference(&skills).cloned().collect();
        let missing_certifications = job
            .required_certifications()
            .difference(&certifications)
            .cloned()
            .collect();

        let mut similar_skills = Vec::new();
        for required in &missing_skills {
            for have in &skills {
                let similarity = jaro_winkler(required, have);
                if similarity >= self.settings.similar_skill_threshold {
                    similar_skills.push(SimilarSkill {
                        required: required.clone(),
                        candidate: have.clone(),
                        similarity,
                    });
                }
            }
        }
        similar_skills.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.required.cmp(&b.required))
        });

        MatchGaps {
            missing_skills,
            missing_certifications,
            similar_skills,
        }
    }
}

/// |have ∩ required| / |required|; 1.0 when nothing is required.
pub fn overlap_ratio(have: &BTreeSet<String>, required: &BTreeSet<String>) -> f32 {
    if required.is_empty() {
        return 1.0;
    }
    let matched = required.intersection(have).count();
    matched as f32 / required.len() as f32
}

/// min(1, years / required); 1.0 when no experience is required.
pub fn experience_score(years: f64, required_years: f64) -> f32 {
    if required_years <= 0.0 {
        return 1.0;
    }
    if !years.is_finite() || years <= 0.0 {
        return 0.0;
    }
    (years / required_years).min(1.0) as f32
}

/// Full credit at or above the requirement, linear decay per missing level.
pub fn education_score(have: EducationLevel, required: EducationLevel, decay: f32) -> f32 {
    if have >= required {
        return 1.0;
    }
    let gap = (required.rank() - have.rank()) as f32;
    (1.0 - gap * decay).max(0.0)
}

/// 1 − mean absolute trait difference.
pub fn personality_score(candidate: &TraitVector, desired: &TraitVector) -> f32 {
    (1.0 - candidate.mean_abs_diff(desired)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::profile::JobProfileDraft;

    fn labels(items: &[&str]) -> BTreeSet<String> {
        normalize_labels(items)
    }

    fn job(skills: &[&str], certs: &[&str], years: f64, edu: EducationLevel) -> JobProfile {
        JobProfile::new(JobProfileDraft {
            id: "job".to_string(),
            title: String::new(),
            description: None,
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            min_years_experience: years,
            required_education: edu,
            required_certifications: certs.iter().map(|s| s.to_string()).collect(),
            desired_traits: TraitVector::neutral(),
            weights: SubScoreWeights::default(),
        })
        .unwrap()
    }

    #[test]
    fn test_overlap_ratio() {
        assert_eq!(overlap_ratio(&labels(&["python"]), &labels(&["python", "sql"])), 0.5);
        assert_eq!(overlap_ratio(&labels(&[]), &labels(&[])), 1.0);
        assert_eq!(overlap_ratio(&labels(&["go"]), &labels(&["rust"])), 0.0);
    }

    #[test]
    fn test_experience_score() {
        assert_eq!(experience_score(3.0, 3.0), 1.0);
        assert_eq!(experience_score(10.0, 3.0), 1.0);
        assert_eq!(experience_score(1.5, 3.0), 0.5);
        assert_eq!(experience_score(0.0, 0.0), 1.0);
        assert_eq!(experience_score(0.0, 2.0), 0.0);
    }

    #[test]
    fn test_education_score() {
        assert_eq!(education_score(EducationLevel::Master, EducationLevel::Bachelor, 0.25), 1.0);
        assert_eq!(education_score(EducationLevel::Bachelor, EducationLevel::Master, 0.25), 0.75);
        assert_eq!(education_score(EducationLevel::None, EducationLevel::Doctorate, 0.25), 0.0);
    }

    #[test]
    fn test_personality_score() {
        let neutral = TraitVector::neutral();
        assert_eq!(personality_score(&neutral, &neutral), 1.0);
        let low = TraitVector::from_array([0.0; 5]).unwrap();
        let high = TraitVector::from_array([1.0; 5]).unwrap();
        assert_eq!(personality_score(&low, &high), 0.0);
    }

    #[test]
    fn test_sub_scores_case_insensitive() {
        let matcher = JobProfileMatcher::default();
        let mut candidate = CandidateProfile::new("c1").with_experience(2.0);
        candidate.skills.insert("Python".to_string());
        let scores = matcher.sub_scores(&candidate, &job(&["python", "sql"], &[], 4.0, EducationLevel::None));
        assert_eq!(scores.skills, 0.5);
        assert_eq!(scores.experience, 0.5);
        assert_eq!(scores.education, 1.0);
        assert_eq!(scores.certifications, 1.0);
    }

    #[test]
    fn test_weighted_scenario() {
        let scores = SubScores {
            skills: 0.5,
            experience: 1.0,
            education: 1.0,
            certifications: 1.0,
            personality: 1.0,
        };
        assert!((scores.weighted(&SubScoreWeights::default()) - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_gaps_and_similar_skills() {
        let matcher = JobProfileMatcher::default();
        let candidate = CandidateProfile::new("c1")
            .with_skills(["postgres", "python"])
            .with_certifications(["csm"]);
        let gaps = matcher.gaps(
            &candidate,
            &job(&["python", "postgresql", "kubernetes"], &["pmp"], 0.0, EducationLevel::None),
        );
        assert_eq!(gaps.missing_skills, vec!["kubernetes", "postgresql"]);
        assert_eq!(gaps.missing_certifications, vec!["pmp"]);
        assert_eq!(gaps.similar_skills.len(), 1);
        assert_eq!(gaps.similar_skills[0].candidate, "postgres");
    }
}
