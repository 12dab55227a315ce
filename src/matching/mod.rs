//! Candidate/job profiles, sub-score matching and ranking

pub mod matcher;
pub mod profile;
pub mod ranking;

pub use matcher::{JobProfileMatcher, MatchGaps, MatchingSettings, SubScores};
pub use profile::{CandidateProfile, EducationLevel, JobProfile, JobProfileDraft, SubScoreWeights};
pub use ranking::{rank_candidates, MatchResult, RankingEngine, RankingOutcome, SkippedCandidate};
