use super::essay::EssaySubmission;
use crate::settings::LineBounds;
use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Accepted,
    Rejected(Violation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Violation {
    #[strum(serialize = "too short")]
    TooShort { lines: usize, min: usize },
    #[strum(serialize = "too long")]
    TooLong { lines: usize, max: usize },
}

impl Violation {
    pub fn line_count(&self) -> usize {
        match self {
            Self::TooShort { lines, .. } | Self::TooLong { lines, .. } => *lines,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::TooShort { lines, min } => format!(
                "Your essay has {lines} lines. The minimum required is {min} lines."
            ),
            Self::TooLong { lines, max } => format!(
                "Your essay has {lines} lines. The maximum allowed is {max} lines."
            ),
        }
    }
}

pub fn validate_structure(essay: &EssaySubmission, bounds: &LineBounds) -> Validation {
    let lines = essay.line_count();

    if lines < bounds.min {
        return Validation::Rejected(Violation::TooShort {
            lines,
            min: bounds.min,
        });
    }

    if lines > bounds.max {
        return Validation::Rejected(Violation::TooLong {
            lines,
            max: bounds.max,
        });
    }

    Validation::Accepted
}
