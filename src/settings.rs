use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub rubric: Rubric,
    pub ml: Ml,
}

/// Every constant the pipeline scores against. Changing the exam means
/// changing this, never the scoring code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    pub lines: LineBounds,
    pub max_score: u32,
    pub baseline: BaselineRange,
    pub relevance: RelevancePolicy,
    pub quality: QualityPolicy,
    pub competencies: Vec<Competency>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBounds {
    pub min: usize,
    pub max: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelevancePolicy {
    pub high_confidence: f32,
    pub medium_confidence: f32,
    pub penalty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityPolicy {
    pub negative_tag: String,
    pub penalty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competency {
    pub name: String,
    pub floor: u32,
    pub total: u32,
}

impl Competency {
    pub fn new(name: &str, floor: u32, total: u32) -> Self {
        Self {
            name: name.to_string(),
            floor,
            total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ml {
    pub enabled: bool,
    pub timeout_ms: u64,
    pub quality: ModelSpec,
    pub relevance: ModelSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelSpec {
    /// The rust-bert default sentiment checkpoint (DistilBERT fine-tuned on SST-2).
    DistilBertSst2,
    Remote {
        name: String,
        architecture: Architecture,
        model_url: String,
        config_url: String,
        vocab_url: String,
        lower_case: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Architecture {
    Bert,
    DistilBert,
    Roberta,
}

impl Default for Rubric {
    fn default() -> Self {
        Self {
            lines: LineBounds { min: 30, max: 45 },
            max_score: 30,
            baseline: BaselineRange { min: 10, max: 30 },
            relevance: RelevancePolicy {
                high_confidence: 0.8,
                medium_confidence: 0.5,
                penalty: 10,
            },
            quality: QualityPolicy {
                negative_tag: "LABEL_1".to_string(),
                penalty: 5,
            },
            competencies: vec![
                Competency::new("Argumentation and Coherence", 5, 10),
                Competency::new("Standard Norm Mastery", 5, 10),
                Competency::new("Intervention Proposal", 0, 5),
            ],
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rubric: Rubric::default(),
            ml: Ml {
                enabled: true,
                timeout_ms: 30_000,
                quality: ModelSpec::Remote {
                    name: "unitary/toxic-bert".to_string(),
                    architecture: Architecture::Bert,
                    model_url: "https://huggingface.co/unitary/toxic-bert/resolve/main/rust_model.ot"
                        .to_string(),
                    config_url: "https://huggingface.co/unitary/toxic-bert/resolve/main/config.json"
                        .to_string(),
                    vocab_url: "https://huggingface.co/unitary/toxic-bert/resolve/main/vocab.txt"
                        .to_string(),
                    lower_case: true,
                },
                relevance: ModelSpec::DistilBertSst2,
            },
        }
    }
}

impl Settings {
    pub fn load() -> &'static Settings {
        SETTINGS.get_or_init(Self::load_from_files)
    }

    /// Reads one explicit settings file. Unlike [`Settings::load`], a missing
    /// or malformed file is an error.
    pub fn from_file(path: &Path) -> Result<Settings> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = ron::from_str(&content)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        Ok(settings)
    }

    fn load_from_files() -> Settings {
        let default_path = Path::new("settings.default.ron");
        let override_path = Path::new("settings.ron");

        let mut settings = if default_path.exists() {
            fs::read_to_string(default_path)
                .ok()
                .and_then(|content| ron::from_str(&content).ok())
                .unwrap_or_default()
        } else {
            Settings::default()
        };

        if override_path.exists() {
            if let Ok(content) = fs::read_to_string(override_path) {
                if let Ok(overrides) = ron::from_str::<Settings>(&content) {
                    settings = overrides;
                }
            }
        }

        settings
    }
}

pub fn settings() -> &'static Settings {
    Settings::load()
}
