//! Big-Five self-report test scoring

use crate::error::{RankerError, Result};
use crate::personality::traits::{Trait, TraitVector};
use serde::{Deserialize, Serialize};

/// Inclusive Likert answer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikertScale {
    pub min: i32,
    pub max: i32,
}

impl LikertScale {
    pub fn new(min: i32, max: i32) -> Result<Self> {
        if min >= max {
            return Err(RankerError::validation(format!(
                "Likert scale minimum {} must be below maximum {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, answer: i32) -> bool {
        (self.min..=self.max).contains(&answer)
    }

    /// Linear map of an in-range answer onto [0, 1].
    pub fn normalize(&self, answer: i32) -> f32 {
        (answer - self.min) as f32 / (self.max - self.min) as f32
    }
}

impl Default for LikertScale {
    fn default() -> Self {
        Self { min: 1, max: 5 }
    }
}

/// Which trait each of the five questions measures, in question order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMap([Trait; 5]);

impl QuestionMap {
    /// The mapping must cover every trait exactly once.
    pub fn new(order: [Trait; 5]) -> Result<Self> {
        for trait_ in Trait::ALL {
            if !order.contains(&trait_) {
                return Err(RankerError::validation(format!(
                    "Question map does not cover {}",
                    trait_
                )));
            }
        }
        Ok(Self(order))
    }

    pub fn trait_for(&self, question: usize) -> Option<Trait> {
        self.0.get(question).copied()
    }
}

impl Default for QuestionMap {
    fn default() -> Self {
        Self(Trait::ALL)
    }
}

pub struct PersonalityTestScorer {
    scale: LikertScale,
    questions: QuestionMap,
}

impl Default for PersonalityTestScorer {
    fn default() -> Self {
        Self::new(LikertScale::default(), QuestionMap::default())
    }
}

impl PersonalityTestScorer {
    pub fn new(scale: LikertScale, questions: QuestionMap) -> Self {
        Self { scale, questions }
    }

    pub fn scale(&self) -> LikertScale {
        self.scale
    }

    /// Score exactly five answers, one per question.
    pub fn score(&self, responses: &[i32]) -> Result<TraitVector> {
        if responses.len() != Trait::ALL.len() {
            return Err(RankerError::validation(format!(
                "Expected {} test responses, got {}",
                Trait::ALL.len(),
                responses.len()
            )));
        }

        let mut values = [0.0f32; 5];
        for (question, &answer) in responses.iter().enumerate() {
            if !self.scale.contains(answer) {
                return Err(RankerError::validation(format!(
                    "Response to question {} is {}, expected {}..={}",
                    question + 1,
                    answer,
                    self.scale.min,
                    self.scale.max
                )));
            }
            let trait_ = self.questions.trait_for(question).ok_or_else(|| {
                RankerError::validation(format!("No trait mapped to question {}", question + 1))
            })?;
            values[trait_.index()] = self.scale.normalize(answer);
        }

        TraitVector::from_array(values)
    }
}

/// Parse "4,2,5,3,1" or "4 2 5 3 1" as typed on the command line.
pub fn parse_responses(input: &str) -> Result<Vec<i32>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i32>().map_err(|e| {
                RankerError::validation(format!("Invalid response '{}': {}", part, e))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_normalization() {
        let scorer = PersonalityTestScorer::default();
        let v = scorer.score(&[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(v.to_array(), [0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_wrong_count() {
        let scorer = PersonalityTestScorer::default();
        assert!(matches!(scorer.score(&[1, 2, 3, 4]), Err(RankerError::Validation(_))));
        assert!(matches!(
            scorer.score(&[1, 2, 3, 4, 5, 1]),
            Err(RankerError::Validation(_))
        ));
    }

    #[test]
    fn test_out_of_range() {
        let scorer = PersonalityTestScorer::default();
        let err = scorer.score(&[1, 2, 6, 4, 5]).unwrap_err();
        assert!(err.to_string().contains("question 3"));
        assert!(scorer.score(&[0, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn test_custom_question_map() {
        let map = QuestionMap::new([
            Trait::Neuroticism,
            Trait::Openness,
            Trait::Conscientiousness,
            Trait::Extraversion,
            Trait::Agreeableness,
        ])
        .unwrap();
        let scorer = PersonalityTestScorer::new(LikertScale::default(), map);
        let v = scorer.score(&[5, 1, 1, 1, 1]).unwrap();
        assert_eq!(v.neuroticism(), 1.0);
        assert_eq!(v.openness(), 0.0);
    }

    #[test]
    fn test_question_map_must_be_permutation() {
        assert!(QuestionMap::new([Trait::Openness; 5]).is_err());
    }

    #[test]
    fn test_scale_validation() {
        assert!(LikertScale::new(5, 1).is_err());
        let seven = LikertScale::new(1, 7).unwrap();
        assert_eq!(seven.normalize(4), 0.5);
    }

    #[test]
    fn test_parse_responses() {
        assert_eq!(parse_responses("4, 2,5,3,1").unwrap(), vec![4, 2, 5, 3, 1]);
        assert_eq!(parse_responses("4 2 5 3 1").unwrap(), vec![4, 2, 5, 3, 1]);
        assert!(parse_responses("4,two,5").is_err());
    }
}
