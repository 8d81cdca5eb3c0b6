// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Ingestion failed for {}: {message}", path.display())]
    Ingestion { path: PathBuf, message: String },

    #[error("Vectorizer fit error: {0}")]
    Fit(String),

    #[error("Index load error: {0}")]
    IndexLoad(String),

    #[error("Query validation error: {0}")]
    QueryValidation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Answer generation error: {0}")]
    AnswerGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
