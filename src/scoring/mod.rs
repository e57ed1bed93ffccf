mod baseline;
mod classification;
mod essay;
pub mod model;
mod pipeline;
pub mod quality;
pub mod relevance;
mod score;
mod structure;

pub use baseline::{BaselineProvider, FixedBaseline, UniformBaseline};
pub use classification::{Classification, Classifier, ClassifierError};
pub use essay::EssaySubmission;
pub use model::MLHandle;
pub use pipeline::EssayScorer;
pub use quality::{assess_quality, QualityAssessment};
pub use relevance::{assess_relevance, RelevanceAssessment, RelevanceRating};
pub use score::{aggregate, assemble, CompetencyScore, CompetencyScores, ScoreResult};
pub use structure::{validate_structure, Validation, Violation};

#[cfg(test)]
mod tests {
    use super::classification::stubs::{FailingClassifier, FixedClassifier, LookupClassifier};
    use super::quality::{MODEL_UNAVAILABLE_NOTE, POOR_QUALITY_NOTE};
    use super::*;
    use crate::settings::Rubric;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn essay_with_lines(n: usize) -> String {
        (1..=n)
            .map(|i| format!("Paragraph line {i} about technology and society."))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn with_models(
        rubric: Rubric,
        quality: impl Classifier + 'static,
        relevance: impl Classifier + 'static,
    ) -> EssayScorer {
        EssayScorer::new(rubric)
            .with_classifiers(Some(Arc::new(quality)), Some(Arc::new(relevance)))
    }

    fn scorer_with(quality_label: &str, baseline: u32) -> EssayScorer<FixedBaseline> {
        with_models(
            Rubric::default(),
            FixedClassifier::new(quality_label, 0.9),
            FixedClassifier::new("POSITIVE", 0.9),
        )
        .with_baseline(FixedBaseline(baseline))
    }

    #[test]
    fn test_scenario_short_essay() {
        let result = EssayScorer::new(Rubric::default()).score(&essay_with_lines(20), "technology");
        assert_eq!(result.final_score, 0);
        assert!(result.message.contains("20"));
        assert!(result.message.contains("30"));
        assert!(result.competency_scores.is_empty());
        assert!(result.errors.is_empty());
        assert_eq!(result.relevance_rating, RelevanceRating::Low);
    }

    #[test]
    fn test_long_essay_rejected_before_classifiers() {
        let quality = Arc::new(FixedClassifier::new("LABEL_0", 0.9));
        let scorer = EssayScorer::new(Rubric::default())
            .with_classifiers(
                Some(quality.clone()),
                Some(Arc::new(FixedClassifier::new("POSITIVE", 0.9))),
            )
            .with_baseline(FixedBaseline(25));
        let result = scorer.score(&essay_with_lines(46), "technology");

        assert_eq!(result.final_score, 0);
        assert!(result.message.contains("46"));
        assert!(result.message.contains("45"));
        assert!(result.competency_scores.is_empty());
        assert_eq!(quality.calls(), 0);
    }

    #[test]
    fn test_scenario_no_capability() {
        let result = EssayScorer::new(Rubric::default()).score(&essay_with_lines(35), "technology");
        assert_eq!(result.relevance_rating, RelevanceRating::NotEvaluated);
        assert_eq!(result.errors, vec![MODEL_UNAVAILABLE_NOTE.to_string()]);
        assert!(result.competency_scores.is_empty());
        assert!((10..=30).contains(&result.final_score));
        assert_eq!(
            serde_json::to_value(&result.competency_scores).unwrap(),
            serde_json::json!({})
        );
    }

    #[test]
    fn test_scenario_clean_essay() {
        let result = scorer_with("LABEL_0", 20).score(&essay_with_lines(35), "technology");
        assert_eq!(result.relevance_rating, RelevanceRating::High);
        assert_eq!(result.final_score, 20);
        assert!(result.errors.is_empty());
        assert_eq!(result.competency_scores.len(), 3);
        assert_eq!(result.line_count, 35);
    }

    #[test]
    fn test_scenario_negative_quality() {
        let result = scorer_with("LABEL_1", 20).score(&essay_with_lines(35), "technology");
        assert_eq!(result.relevance_rating, RelevanceRating::High);
        assert_eq!(result.final_score, 15);
        assert_eq!(result.errors, vec![POOR_QUALITY_NOTE.to_string()]);
        assert_eq!(result.competency_scores.len(), 3);
    }

    #[test]
    fn test_both_penalties_clamp_to_zero() {
        let scorer = with_models(
            Rubric::default(),
            FixedClassifier::new("LABEL_1", 0.9),
            FixedClassifier::new("NEGATIVE", 0.3),
        )
        .with_baseline(FixedBaseline(10));
        let result = scorer.score(&essay_with_lines(35), "technology");

        assert_eq!(result.final_score, 0);
        assert_eq!(result.relevance_rating, RelevanceRating::Low);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("weakly related"));
        assert_eq!(result.errors[1], POOR_QUALITY_NOTE);
    }

    #[test]
    fn test_score_always_in_range() {
        let scorer = with_models(
            Rubric::default(),
            FixedClassifier::new("LABEL_1", 0.9),
            FixedClassifier::new("NEGATIVE", 0.3),
        );
        let essay = EssaySubmission::new(essay_with_lines(40), "technology");
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let result = scorer.score_with(&essay, &mut rng);
            assert!(result.final_score <= 30);
        }
    }

    #[test]
    fn test_idempotent_under_fixed_inputs() {
        let scorer = with_models(
            Rubric::default(),
            FixedClassifier::new("LABEL_0", 0.9),
            FixedClassifier::new("POSITIVE", 0.7),
        );
        let essay = EssaySubmission::new(essay_with_lines(38), "technology");

        let first = scorer.score_with(&essay, &mut StdRng::seed_from_u64(2024));
        let second = scorer.score_with(&essay, &mut StdRng::seed_from_u64(2024));

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_relevance_compares_essay_and_theme() {
        let essay = essay_with_lines(32);
        let relevance = LookupClassifier::new(Classification::new("POSITIVE", 0.95))
            .answer("technology", "NEGATIVE", 0.99);
        let scorer = with_models(
            Rubric::default(),
            FixedClassifier::new("LABEL_0", 0.9),
            relevance,
        )
        .with_baseline(FixedBaseline(18));
        let result = scorer.score(&essay, "technology");

        assert_eq!(result.relevance_rating, RelevanceRating::Medium);
        assert_eq!(result.final_score, 18);
    }

    #[test]
    fn test_failures_degrade_to_notes() {
        let scorer = with_models(
            Rubric::default(),
            FailingClassifier(ClassifierError::WorkerGone),
            FailingClassifier(ClassifierError::Timeout(500)),
        )
        .with_baseline(FixedBaseline(21));
        let result = scorer.score(&essay_with_lines(35), "technology");

        assert_eq!(result.final_score, 21);
        assert_eq!(result.relevance_rating, RelevanceRating::NotEvaluated);
        assert!(result.competency_scores.is_empty());
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].starts_with("relevance analysis failed"));
        assert!(result.errors[1].starts_with("AI analysis failed"));
    }

    #[test]
    fn test_custom_rubric_bounds() {
        let mut rubric = Rubric::default();
        rubric.lines.min = 5;
        rubric.lines.max = 10;
        rubric.quality.penalty = 8;
        let scorer = with_models(
            rubric,
            FixedClassifier::new("LABEL_1", 0.9),
            FixedClassifier::new("POSITIVE", 0.9),
        )
        .with_baseline(FixedBaseline(20));

        let result = scorer.score(&essay_with_lines(7), "technology");
        assert_eq!(result.final_score, 12);
        assert_eq!(scorer.rubric().lines.max, 10);
    }

    #[test]
    fn test_lone_quality_classifier_is_dropped() {
        let quality = Arc::new(FixedClassifier::new("LABEL_0", 0.9));
        let scorer = EssayScorer::new(Rubric::default())
            .with_classifiers(Some(quality.clone()), None)
            .with_baseline(FixedBaseline(20));
        let result = scorer.score(&essay_with_lines(35), "technology");

        assert_eq!(result.relevance_rating, RelevanceRating::NotEvaluated);
        assert_eq!(result.errors, vec![MODEL_UNAVAILABLE_NOTE.to_string()]);
        assert!(result.competency_scores.is_empty());
        assert_eq!(result.final_score, 20);
        assert_eq!(quality.calls(), 0);
    }

    #[test]
    fn test_lone_relevance_classifier_is_dropped() {
        let relevance = Arc::new(FixedClassifier::new("NEGATIVE", 0.3));
        let scorer = EssayScorer::new(Rubric::default())
            .with_classifiers(None, Some(relevance.clone()))
            .with_baseline(FixedBaseline(20));
        let result = scorer.score(&essay_with_lines(35), "technology");

        assert_eq!(result.relevance_rating, RelevanceRating::NotEvaluated);
        assert_eq!(result.errors, vec![MODEL_UNAVAILABLE_NOTE.to_string()]);
        assert_eq!(result.final_score, 20);
        assert_eq!(relevance.calls(), 0);
    }

    #[test]
    fn test_missing_classifier_always_leaves_a_note() {
        let quality: Arc<dyn Classifier> = Arc::new(FixedClassifier::new("LABEL_0", 0.99));
        let relevance: Arc<dyn Classifier> = Arc::new(FixedClassifier::new("POSITIVE", 0.99));
        let pairs = [(None, None), (Some(quality), None), (None, Some(relevance))];
        for (quality, relevance) in pairs {
            let result = EssayScorer::new(Rubric::default())
                .with_classifiers(quality, relevance)
                .score(&essay_with_lines(35), "technology");
            assert!(!result.errors.is_empty());
        }
    }

    #[test]
    fn test_scorer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EssayScorer<UniformBaseline>>();
        assert_send_sync::<MLHandle>();
    }
}
