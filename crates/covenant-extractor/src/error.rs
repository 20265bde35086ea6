//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// A vocabulary pattern failed to compile
    #[error("Invalid pattern for '{target}': {message}")]
    InvalidPattern {
        /// Canonical target the pattern belongs to
        target: String,
        /// Compiler message
        message: String,
    },

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
