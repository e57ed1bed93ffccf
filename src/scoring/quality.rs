use super::classification::Classifier;
use super::score::{CompetencyScore, CompetencyScores};
use crate::settings::{Competency, QualityPolicy};
use rand::Rng;
use tracing::{debug, warn};

pub const MODEL_UNAVAILABLE_NOTE: &str = "AI model unavailable; result is rule-only";
pub const POOR_QUALITY_NOTE: &str =
    "inadequate tone or insufficient argumentation detected; revise";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityAssessment {
    pub penalty: u32,
    pub competencies: CompetencyScores,
    pub notes: Vec<String>,
}

pub fn assess_quality<R: Rng>(
    essay: &str,
    classifier: Option<&dyn Classifier>,
    policy: &QualityPolicy,
    rubric: &[Competency],
    rng: &mut R,
) -> QualityAssessment {
    let Some(classifier) = classifier else {
        debug!("quality classifier unavailable, scoring by rules only");
        return QualityAssessment {
            notes: vec![MODEL_UNAVAILABLE_NOTE.to_string()],
            ..Default::default()
        };
    };

    let classification = match classifier.classify(essay) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "quality classification failed");
            return QualityAssessment {
                notes: vec![format!("AI analysis failed: {e}")],
                ..Default::default()
            };
        }
    };

    let mut assessment = QualityAssessment::default();

    if classification.has_tag(&policy.negative_tag) {
        assessment.penalty = policy.penalty;
        assessment.notes.push(POOR_QUALITY_NOTE.to_string());
    }
    debug!(
        label = %classification.label,
        confidence = classification.confidence,
        penalty = assessment.penalty,
        "quality assessed"
    );

    // Stand-in for per-competency scorers: uniform within each band, unrelated
    // to the classification.
    assessment.competencies = sample_competencies(rubric, rng);
    assessment
}

pub fn sample_competencies<R: Rng>(
    rubric: &[Competency],
    rng: &mut R,
) -> CompetencyScores {
    rubric
        .iter()
        .map(|c| {
            let floor = c.floor.min(c.total);
            CompetencyScore {
                name: c.name.clone(),
                earned: rng.random_range(floor..=c.total),
                total: c.total,
            }
        })
        .collect()
}
