//! Weighted ranking of candidates against a job profile

use crate::matching::matcher::{JobProfileMatcher, MatchGaps, SubScores};
use crate::matching::profile::{CandidateProfile, JobProfile};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One candidate's scored position for a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: String,
    pub job_id: String,
    pub sub_scores: SubScores,
    pub final_score: f32,
    /// 1-based position in the ordering.
    pub rank: usize,
    #[serde(default)]
    pub gaps: MatchGaps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedCandidate {
    pub candidate_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub job_id: String,
    pub results: Vec<MatchResult>,
    pub skipped: Vec<SkippedCandidate>,
}

impl RankingOutcome {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Default)]
pub struct RankingEngine {
    matcher: JobProfileMatcher,
}

impl RankingEngine {
    pub fn new(matcher: JobProfileMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &JobProfileMatcher {
        &self.matcher
    }

    /// Score every valid candidate and order them.
    ///
    /// Candidates that fail validation, and repeated ids after the first,
    /// are reported in `skipped` instead of aborting the batch.
    pub fn rank(&self, job: &JobProfile, candidates: &[CandidateProfile]) -> RankingOutcome {
        let mut seen = HashSet::new();
        let mut results = Vec::with_capacity(candidates.len());
        let mut skipped = Vec::new();

        for candidate in candidates {
            if let Err(e) = candidate.validate() {
                warn!("Skipping candidate '{}': {}", candidate.id, e);
                skipped.push(SkippedCandidate {
                    candidate_id: candidate.id.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
            if !seen.insert(candidate.id.as_str()) {
                warn!("Skipping duplicate candidate id '{}'", candidate.id);
                skipped.push(SkippedCandidate {
                    candidate_id: candidate.id.clone(),
                    reason: "duplicate candidate id".to_string(),
                });
                continue;
            }

            let sub_scores = self.matcher.sub_scores(candidate, job);
            let final_score = sub_scores.weighted(job.weights());
            debug!(
                "Candidate '{}': skills={:.3} experience={:.3} education={:.3} certifications={:.3} personality={:.3} final={:.3}",
                candidate.id,
                sub_scores.skills,
                sub_scores.experience,
                sub_scores.education,
                sub_scores.certifications,
                sub_scores.personality,
                final_score
            );

            results.push(MatchResult {
                candidate_id: candidate.id.clone(),
                job_id: job.id().to_string(),
                sub_scores,
                final_score,
                rank: 0,
                gaps: self.matcher.gaps(candidate, job),
            });
        }

        sort_results(&mut results);
        for (i, result) in results.iter_mut().enumerate() {
            result.rank = i + 1;
        }

        info!(
            "Ranked {} candidates for job '{}' ({} skipped)",
            results.len(),
            job.id(),
            skipped.len()
        );

        RankingOutcome {
            job_id: job.id().to_string(),
            results,
            skipped,
        }
    }
}

/// Final score descending, then candidate id ascending.
fn sort_results(results: &mut [MatchResult]) {
    results.sort_by(|a, b| {
        b.final_score
            .total_cmp(&a.final_score)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
}

/// Rank with the default matcher settings.
pub fn rank_candidates(job: &JobProfile, candidates: &[CandidateProfile]) -> RankingOutcome {
    RankingEngine::default().rank(job, candidates)
}
