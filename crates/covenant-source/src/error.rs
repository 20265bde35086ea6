//! Error types for text sources

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a document into text
#[derive(Error, Debug)]
pub enum SourceError {
    /// The requested file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// No backend could open the document
    #[error("Failed to load PDF: {0}")]
    Load(String),

    /// The document opened but text could not be read out of it
    #[error("Failed to extract text: {0}")]
    Extraction(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for text sources
pub type Result<T> = std::result::Result<T, SourceError>;
