//! Property tests for scoring bounds, merge arithmetic and ranking order.

use candidate_ranker::matching::{
    rank_candidates, CandidateProfile, EducationLevel, JobProfile, JobProfileDraft, SubScoreWeights,
};
use candidate_ranker::personality::{
    apply_polarity, merge_traits, LikertScale, MergeWeights, PersonalityTestScorer, QuestionMap,
    TraitVector,
};
use proptest::prelude::*;

const SKILLS: &[&str] = &["python", "sql", "rust", "docker", "react", "go", "java", "aws"];

fn arb_trait_vector() -> impl Strategy<Value = TraitVector> {
    prop::array::uniform5(0.0f32..=1.0).prop_map(|values| TraitVector::from_array(values).unwrap())
}

fn arb_education() -> impl Strategy<Value = EducationLevel> {
    prop_oneof![
        Just(EducationLevel::None),
        Just(EducationLevel::HighSchool),
        Just(EducationLevel::Associate),
        Just(EducationLevel::Bachelor),
        Just(EducationLevel::Master),
        Just(EducationLevel::Doctorate),
    ]
}

fn arb_skills() -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(SKILLS.to_vec(), 0..=SKILLS.len())
        .prop_map(|skills| skills.into_iter().map(String::from).collect())
}

fn arb_job() -> impl Strategy<Value = JobProfile> {
    (arb_skills(), 0.0f64..15.0, arb_education(), arb_trait_vector()).prop_map(
        |(required_skills, years, education, traits)| {
            JobProfile::new(JobProfileDraft {
                id: "job".to_string(),
                title: "Role".to_string(),
                description: None,
                required_skills,
                min_years_experience: years,
                required_education: education,
                required_certifications: vec!["pmp".to_string()],
                desired_traits: traits,
                weights: SubScoreWeights::default(),
            })
            .unwrap()
        },
    )
}

fn arb_candidate() -> impl Strategy<Value = CandidateProfile> {
    (
        arb_skills(),
        0.0f64..30.0,
        arb_education(),
        any::<bool>(),
        prop::option::of(arb_trait_vector()),
        prop::option::of(arb_trait_vector()),
    )
        .prop_map(|(skills, years, education, certified, cv, test)| {
            let mut candidate = CandidateProfile::new("placeholder")
                .with_skills(skills)
                .with_experience(years)
                .with_education(education);
            if certified {
                candidate = candidate.with_certifications(["PMP"]);
            }
            let weights = MergeWeights::default();
            if let Some(cv) = cv {
                candidate.set_cv_analysis(cv, 0.0, weights);
            }
            if let Some(test) = test {
                candidate.set_test_traits(test, weights);
            }
            candidate
        })
}

fn arb_batch() -> impl Strategy<Value = Vec<CandidateProfile>> {
    prop::collection::vec(arb_candidate(), 0..12).prop_map(|candidates| {
        candidates
            .into_iter()
            .enumerate()
            .map(|(i, mut c)| {
                c.id = format!("cand-{:02}", i);
                c
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_scores_stay_in_unit_interval(job in arb_job(), candidates in arb_batch()) {
        let outcome = rank_candidates(&job, &candidates);
        prop_assert_eq!(outcome.results.len(), candidates.len());

        for result in &outcome.results {
            for score in result.sub_scores.as_array() {
                prop_assert!((0.0..=1.0).contains(&score), "sub-score {} out of range", score);
            }
            prop_assert!((0.0..=1.0).contains(&result.final_score));
        }
    }

    #[test]
    fn prop_ranking_is_sorted_with_id_tie_break(job in arb_job(), candidates in arb_batch()) {
        let outcome = rank_candidates(&job, &candidates);

        for (i, pair) in outcome.results.windows(2).enumerate() {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.final_score >= b.final_score);
            if a.final_score == b.final_score {
                prop_assert!(a.candidate_id < b.candidate_id);
            }
            prop_assert_eq!(a.rank, i + 1);
        }
    }

    #[test]
    fn prop_ranking_ignores_input_order(job in arb_job(), candidates in arb_batch()) {
        let forward = rank_candidates(&job, &candidates);
        let mut reversed_input = candidates.clone();
        reversed_input.reverse();
        let reversed = rank_candidates(&job, &reversed_input);
        prop_assert_eq!(forward, reversed);
    }

    #[test]
    fn prop_more_skills_never_score_lower(
        job in arb_job(),
        base in arb_skills(),
        extra in arb_skills(),
    ) {
        let smaller = CandidateProfile::new("a").with_skills(base.clone());
        let larger = CandidateProfile::new("b").with_skills(base.into_iter().chain(extra));

        let outcome = rank_candidates(&job, &[smaller, larger]);
        let score = |id: &str| {
            outcome
                .results
                .iter()
                .find(|r| r.candidate_id == id)
                .map(|r| r.sub_scores.skills)
                .unwrap()
        };
        prop_assert!(score("b") >= score("a"));
    }

    #[test]
    fn prop_merge_single_source_is_identity(traits in arb_trait_vector()) {
        prop_assert_eq!(merge_traits(Some(&traits), None, None), traits);
        prop_assert_eq!(merge_traits(None, Some(&traits), None), traits);
    }

    #[test]
    fn prop_merge_is_weighted_mean(cv in arb_trait_vector(), test in arb_trait_vector()) {
        let merged = merge_traits(Some(&cv), Some(&test), Some(MergeWeights::default()));
        for ((m, c), t) in merged.to_array().iter().zip(cv.to_array()).zip(test.to_array()) {
            prop_assert!((m - (0.6 * t + 0.4 * c)).abs() < 1e-5);
            prop_assert!((0.0..=1.0).contains(m));
        }
    }

    #[test]
    fn prop_polarity_adjustment_stays_bounded(
        raw in 0.0f32..=1.0,
        polarity in -1.0f32..=1.0,
        factor in 0.0f32..=1.0,
    ) {
        let adjusted = apply_polarity(raw, polarity, factor);
        prop_assert!((0.0..=1.0).contains(&adjusted));
    }

    #[test]
    fn prop_test_scores_follow_answers(answers in prop::array::uniform5(1i32..=5)) {
        let scorer = PersonalityTestScorer::new(LikertScale::new(1, 5).unwrap(), QuestionMap::default());
        let traits = scorer.score(&answers).unwrap();
        for (value, answer) in traits.to_array().iter().zip(answers) {
            prop_assert!((value - (answer - 1) as f32 / 4.0).abs() < 1e-6);
        }
    }
}
