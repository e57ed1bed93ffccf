use super::quality::QualityAssessment;
use super::relevance::{RelevanceAssessment, RelevanceRating};
use super::structure::Violation;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;

pub const THANK_YOU_MESSAGE: &str =
    "Thank you for submitting your essay. Below is the simulated examiner analysis.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetencyScore {
    pub name: String,
    pub earned: u32,
    pub total: u32,
}

impl fmt::Display for CompetencyScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.earned, self.total)
    }
}

/// Competency results in rubric order. Serializes as `{ "name": "earned/total" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompetencyScores(Vec<CompetencyScore>);

impl CompetencyScores {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompetencyScore> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&CompetencyScore> {
        self.0.iter().find(|c| c.name == name)
    }
}

impl FromIterator<CompetencyScore> for CompetencyScores {
    fn from_iter<I: IntoIterator<Item = CompetencyScore>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CompetencyScores {
    type Item = &'a CompetencyScore;
    type IntoIter = std::slice::Iter<'a, CompetencyScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for CompetencyScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for score in &self.0 {
            map.serialize_entry(&score.name, &score.to_string())?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub message: String,
    pub final_score: u32,
    pub errors: Vec<String>,
    pub competency_scores: CompetencyScores,
    pub relevance_rating: RelevanceRating,
    pub line_count: usize,
}

impl ScoreResult {
    /// Terminal result for an essay outside the line bounds. Nothing else runs.
    pub fn rejected(violation: &Violation) -> Self {
        Self {
            message: violation.message(),
            final_score: 0,
            errors: Vec::new(),
            competency_scores: CompetencyScores::default(),
            relevance_rating: RelevanceRating::Low,
            line_count: violation.line_count(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub fn aggregate(
    baseline: u32,
    relevance_penalty: u32,
    quality_penalty: u32,
    max_score: u32,
) -> u32 {
    let raw = i64::from(baseline) - i64::from(relevance_penalty) - i64::from(quality_penalty);
    raw.clamp(0, i64::from(max_score)) as u32
}

pub fn assemble(
    baseline: u32,
    relevance: RelevanceAssessment,
    quality: QualityAssessment,
    max_score: u32,
    line_count: usize,
) -> ScoreResult {
    let final_score = aggregate(baseline, relevance.penalty, quality.penalty, max_score);

    let mut errors = relevance.notes;
    errors.extend(quality.notes);

    ScoreResult {
        message: THANK_YOU_MESSAGE.to_string(),
        final_score,
        errors,
        competency_scores: quality.competencies,
        relevance_rating: relevance.rating,
        line_count,
    }
}
