//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text extraction error
    #[error("Source error: {0}")]
    Source(#[from] covenant_source::SourceError),

    /// Section extraction error
    #[error("Extractor error: {0}")]
    Extractor(#[from] covenant_extractor::ExtractorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A background worker died
    #[error("Worker failed: {0}")]
    Worker(String),

    /// Every document in the batch failed
    #[error("All {0} document(s) failed")]
    AllFailed(usize),
}
