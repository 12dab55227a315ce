//! Big-Five trait vectors from CV text and personality tests

pub mod extractor;
pub mod keyword_scorer;
pub mod lexicon;
pub mod merger;
pub mod test_scorer;
pub mod traits;

pub use extractor::{apply_polarity, CvTraitAnalysis, CvTraitExtractor, TraitSettings};
pub use keyword_scorer::{KeywordTraitScorer, KeywordTraitScores};
pub use lexicon::TraitLexicon;
pub use merger::{merge_traits, MergeWeights};
pub use test_scorer::{parse_responses, LikertScale, PersonalityTestScorer, QuestionMap};
pub use traits::{Trait, TraitVector, NEUTRAL};

use crate::error::Result;

/// Score five Likert answers with the default 1-5 scale and question order.
pub fn score_personality_test(responses: &[i32]) -> Result<TraitVector> {
    PersonalityTestScorer::default().score(responses)
}
