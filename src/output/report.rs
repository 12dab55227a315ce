//! Ranking report structures

use crate::matching::{CandidateProfile, JobProfile, MatchResult, RankingOutcome, SkippedCandidate};
use crate::personality::TraitVector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A ranking together with the context needed to present it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub job: JobSummary,
    pub entries: Vec<RankedEntry>,
    pub skipped: Vec<SkippedCandidate>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub title: String,
    pub required_skills: Vec<String>,
    pub min_years_experience: f64,
    pub required_education: String,
    pub required_certifications: Vec<String>,
    pub desired_traits: TraitVector,
    /// Weights in skills, experience, education, certifications,
    /// personality order.
    pub weights: [f64; 5],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: Option<String>,
    pub personality: TraitVector,
    pub result: MatchResult,
}

impl RankedEntry {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.result.candidate_id)
    }

    /// Final score as a 0-100 percentage.
    pub fn score_percentage(&self) -> u8 {
        (self.result.final_score * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub ranker_version: String,
    pub candidates_considered: usize,
    pub processing_time_ms: u64,
}

impl JobSummary {
    pub fn from_job(job: &JobProfile) -> Self {
        Self {
            id: job.id().to_string(),
            title: job.title().to_string(),
            required_skills: job.required_skills().iter().cloned().collect(),
            min_years_experience: job.min_years_experience(),
            required_education: job.required_education().to_string(),
            required_certifications: job.required_certifications().iter().cloned().collect(),
            desired_traits: *job.desired_traits(),
            weights: job.weights().as_array(),
        }
    }
}

impl RankingReport {
    pub fn new(
        job: &JobProfile,
        outcome: RankingOutcome,
        candidates: &[CandidateProfile],
        processing_time_ms: u64,
    ) -> Self {
        let by_id: HashMap<&str, &CandidateProfile> =
            candidates.iter().map(|c| (c.id.as_str(), c)).collect();

        let entries = outcome
            .results
            .into_iter()
            .map(|result| {
                let candidate = by_id.get(result.candidate_id.as_str());
                RankedEntry {
                    name: candidate.and_then(|c| c.name.clone()),
                    personality: candidate
                        .map(|c| c.personality())
                        .unwrap_or_default(),
                    result,
                }
            })
            .collect();

        Self {
            job: JobSummary::from_job(job),
            entries,
            skipped: outcome.skipped,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                ranker_version: env!("CARGO_PKG_VERSION").to_string(),
                candidates_considered: candidates.len(),
                processing_time_ms,
            },
        }
    }

    /// Keep only the first `n` entries.
    pub fn truncate(&mut self, n: usize) {
        self.entries.truncate(n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::rank_candidates;

    #[test]
    fn test_report_from_outcome() {
        let job = JobProfile::from_toml_str("id = \"job\"\ntitle = \"Dev\"\nrequired_skills = [\"rust\"]\n").unwrap();
        let mut alice = CandidateProfile::new("alice").with_skills(["rust"]);
        alice.name = Some("Alice Smith".to_string());
        let bob = CandidateProfile::new("bob");
        let candidates = vec![bob, alice];

        let outcome = rank_candidates(&job, &candidates);
        let mut report = RankingReport::new(&job, outcome, &candidates, 12);

        assert_eq!(report.job.required_skills, vec!["rust"]);
        assert_eq!(report.entries[0].display_name(), "Alice Smith");
        assert_eq!(report.entries[0].score_percentage(), 100);
        assert_eq!(report.entries[1].display_name(), "bob");
        assert_eq!(report.metadata.candidates_considered, 2);

        report.truncate(1);
        assert_eq!(report.entries.len(), 1);
    }
}
