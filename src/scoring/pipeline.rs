use super::baseline::{BaselineProvider, UniformBaseline};
use super::classification::Classifier;
use super::essay::EssaySubmission;
use super::quality::assess_quality;
use super::relevance::assess_relevance;
use super::score::{assemble, ScoreResult};
use super::structure::{validate_structure, Validation};
use crate::settings::{settings, Rubric};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs one essay through validation, relevance, quality and aggregation.
///
/// Holds no per-submission state: every call to [`EssayScorer::score`]
/// starts fresh, so one scorer can serve many threads as long as its
/// classifiers can.
pub struct EssayScorer<B = UniformBaseline> {
    rubric: Rubric,
    quality: Option<Arc<dyn Classifier>>,
    relevance: Option<Arc<dyn Classifier>>,
    baseline: B,
}

impl EssayScorer<UniformBaseline> {
    pub fn new(rubric: Rubric) -> Self {
        let baseline = UniformBaseline::from(rubric.baseline);
        Self {
            rubric,
            quality: None,
            relevance: None,
            baseline,
        }
    }
}

impl Default for EssayScorer<UniformBaseline> {
    fn default() -> Self {
        Self::new(settings().rubric.clone())
    }
}

impl<B: BaselineProvider> EssayScorer<B> {
    /// Attaches both classifiers or neither. With only one of them the
    /// result would mix model and rule-only judgments, so a lone
    /// classifier is dropped and the essay is scored by rules only.
    pub fn with_classifiers(
        mut self,
        quality: Option<Arc<dyn Classifier>>,
        relevance: Option<Arc<dyn Classifier>>,
    ) -> Self {
        match (quality, relevance) {
            (Some(quality), Some(relevance)) => {
                self.quality = Some(quality);
                self.relevance = Some(relevance);
            }
            (quality, relevance) => {
                if quality.is_some() || relevance.is_some() {
                    warn!("only one classifier available, scoring by rules only");
                }
                self.quality = None;
                self.relevance = None;
            }
        }
        self
    }

    pub fn with_baseline<P: BaselineProvider>(self, baseline: P) -> EssayScorer<P> {
        EssayScorer {
            rubric: self.rubric,
            quality: self.quality,
            relevance: self.relevance,
            baseline,
        }
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn score(&self, essay: &str, theme: &str) -> ScoreResult {
        let submission = EssaySubmission::new(essay, theme);
        self.score_with(&submission, &mut rand::rng())
    }

    pub fn score_with<R: Rng>(&self, submission: &EssaySubmission, rng: &mut R) -> ScoreResult {
        let line_count = submission.line_count();

        if let Validation::Rejected(violation) =
            validate_structure(submission, &self.rubric.lines)
        {
            debug!(line_count, %violation, "essay rejected");
            return ScoreResult::rejected(&violation);
        }

        let baseline = self.baseline.provide(rng);
        debug!(line_count, baseline, "essay validated");

        let relevance = assess_relevance(
            submission.text(),
            submission.theme(),
            self.relevance.as_deref(),
            &self.rubric.relevance,
        );

        let quality = assess_quality(
            submission.text(),
            self.quality.as_deref(),
            &self.rubric.quality,
            &self.rubric.competencies,
            rng,
        );

        let result = assemble(
            baseline,
            relevance,
            quality,
            self.rubric.max_score,
            line_count,
        );
        debug!(
            final_score = result.final_score,
            rating = %result.relevance_rating,
            notes = result.errors.len(),
            "essay scored"
        );
        result
    }
}
