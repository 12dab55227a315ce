//! Candidate ranker library
//!
//! Scores job candidates from CV-derived and self-reported Big-Five traits
//! together with their skills, experience, education and certifications.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod matching;
pub mod output;
pub mod personality;
pub mod processing;
pub mod sentiment;
pub mod store;

pub use config::Config;
pub use error::{RankerError, Result};
pub use matching::{rank_candidates, CandidateProfile, JobProfile, MatchResult, RankingOutcome};
pub use personality::{merge_traits, score_personality_test, CvTraitExtractor, TraitVector};
