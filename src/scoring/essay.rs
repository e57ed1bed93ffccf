use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssaySubmission {
    text: String,
    theme: String,
}

impl EssaySubmission {
    pub fn new(text: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            theme: theme.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Lines as the examiner counts them: split on `\n`, keeping a trailing
    /// empty remainder.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }
}
