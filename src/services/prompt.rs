use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TRANSCRIPT_PLACEHOLDER: &str = "{{transcript}}";

const BUNDLED_PERSONA: &str = include_str!("../../prompts/gradi.txt");

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to read prompt template {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Prompt template has no transcript placeholder")]
    MissingPlaceholder,

    #[error("Prompt template has {0} transcript placeholders, expected one")]
    DuplicatePlaceholder(usize),
}

/// Persona prompt with a single transcript substitution point.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
    version: String,
}

impl PromptTemplate {
    pub fn from_text(text: impl Into<String>) -> Result<Self, PromptError> {
        let text = text.into();
        match text.matches(TRANSCRIPT_PLACEHOLDER).count() {
            0 => return Err(PromptError::MissingPlaceholder),
            1 => {}
            n => return Err(PromptError::DuplicatePlaceholder(n)),
        }

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let version = format!("{:016x}", hasher.finish());

        Ok(Self { text, version })
    }

    pub fn bundled() -> Result<Self, PromptError> {
        Self::from_text(BUNDLED_PERSONA)
    }

    pub fn load(path: Option<&Path>) -> Result<Self, PromptError> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| PromptError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_text(text)
            }
            None => Self::bundled(),
        }
    }

    pub fn render(&self, transcript: &str) -> String {
        self.text.replacen(TRANSCRIPT_PLACEHOLDER, transcript, 1)
    }

    /// Fingerprint of the template text, stored alongside each analysis.
    pub fn version(&self) -> &str {
        &self.version
    }
}
