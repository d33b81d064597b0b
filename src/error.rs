//! Error handling for the jobfit application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobFitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Profile error: {0}")]
    Profile(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Language model error: {0}")]
    LanguageModel(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, JobFitError>;

/// Convert anyhow errors bubbling up from collaborators
impl From<anyhow::Error> for JobFitError {
    fn from(err: anyhow::Error) -> Self {
        JobFitError::Scoring(err.to_string())
    }
}

impl From<reqwest::Error> for JobFitError {
    fn from(err: reqwest::Error) -> Self {
        JobFitError::LanguageModel(err.to_string())
    }
}
