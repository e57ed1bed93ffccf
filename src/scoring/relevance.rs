use super::classification::Classifier;
use crate::settings::RelevancePolicy;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

pub const WEAK_RELEVANCE_NOTE: &str =
    "essay appears weakly related to the proposed theme; revise argumentation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceRating {
    #[strum(serialize = "high")]
    High,
    #[strum(serialize = "medium")]
    Medium,
    #[strum(serialize = "low")]
    Low,
    #[strum(serialize = "not evaluated")]
    NotEvaluated,
}

impl RelevanceRating {
    /// First match wins: agreeing labels with strong confidence, then any
    /// moderately confident essay classification.
    pub fn from_labels(
        essay_label: &str,
        essay_confidence: f32,
        theme_label: &str,
        policy: &RelevancePolicy,
    ) -> Self {
        if essay_label == theme_label && essay_confidence > policy.high_confidence {
            RelevanceRating::High
        } else if essay_confidence > policy.medium_confidence {
            RelevanceRating::Medium
        } else {
            RelevanceRating::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceAssessment {
    pub rating: RelevanceRating,
    pub penalty: u32,
    pub notes: Vec<String>,
}

impl Default for RelevanceAssessment {
    fn default() -> Self {
        Self {
            rating: RelevanceRating::NotEvaluated,
            penalty: 0,
            notes: Vec::new(),
        }
    }
}

/// A missing classifier is silent here; the quality check reports it once.
pub fn assess_relevance(
    essay: &str,
    theme: &str,
    classifier: Option<&dyn Classifier>,
    policy: &RelevancePolicy,
) -> RelevanceAssessment {
    let Some(classifier) = classifier else {
        debug!("relevance classifier unavailable, skipping");
        return RelevanceAssessment::default();
    };

    let classified = classifier
        .classify(essay)
        .and_then(|e| classifier.classify(theme).map(|t| (e, t)));

    let (essay_class, theme_class) = match classified {
        Ok(pair) => pair,
        Err(e) => {
            warn!(error = %e, "relevance classification failed");
            return RelevanceAssessment {
                notes: vec![format!("relevance analysis failed: {e}")],
                ..Default::default()
            };
        }
    };

    let rating = RelevanceRating::from_labels(
        &essay_class.label,
        essay_class.confidence,
        &theme_class.label,
        policy,
    );
    debug!(
        essay_label = %essay_class.label,
        essay_confidence = essay_class.confidence,
        theme_label = %theme_class.label,
        %rating,
        "relevance assessed"
    );

    if rating == RelevanceRating::Low {
        RelevanceAssessment {
            rating,
            penalty: policy.penalty,
            notes: vec![WEAK_RELEVANCE_NOTE.to_string()],
        }
    } else {
        RelevanceAssessment {
            rating,
            ..Default::default()
        }
    }
}
