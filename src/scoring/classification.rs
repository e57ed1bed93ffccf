use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One label/confidence pair, as produced by any text classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.label.contains(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("classifier worker is gone")]
    WorkerGone,
    #[error("classifier did not answer within {0} ms")]
    Timeout(u64),
    #[error("classifier returned no label")]
    EmptyOutput,
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Maps text to a single label with a confidence. Quality and relevance
/// checks both consume this; only the configured model differs.
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Classification, ClassifierError>;
}

impl<C: Classifier + ?Sized> Classifier for std::sync::Arc<C> {
    fn classify(&self, text: &str) -> Result<Classification, ClassifierError> {
        (**self).classify(text)
    }
}
