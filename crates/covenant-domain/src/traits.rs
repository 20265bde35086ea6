//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{CovenantSection, SemanticFindings, VocabularyEntry};
use std::path::Path;

/// Trait for turning a document on disk into plain text
///
/// Implemented by the infrastructure layer (covenant-source)
pub trait TextSource {
    /// Error type for read operations
    type Error;

    /// Read the full text of the document at `path`
    fn read_text(&self, path: &Path) -> Result<String, Self::Error>;
}

/// Trait for carving candidate sections for one target out of document text
///
/// Implemented by the application layer (covenant-extractor). Candidates are
/// unscored; scoring, filtering and deduplication happen in the caller.
pub trait SectionStrategy {
    /// Short identifier used in logs and reports
    fn name(&self) -> &'static str;

    /// All raw candidates for `entry`, in ascending position order
    ///
    /// Empty text or no match yields an empty list, never an error.
    fn find_sections(&self, text: &str, entry: &VocabularyEntry) -> Vec<CovenantSection>;
}

/// A two-part chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    /// Instructions for the model
    pub system: String,
    /// Task payload
    pub user: String,
}

impl ChatPrompt {
    /// Create a prompt from its two parts
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (covenant-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Model identifier used for requests
    fn model_name(&self) -> &str;

    /// Generate text completion
    fn generate(&self, prompt: &ChatPrompt) -> Result<String, Self::Error>;

    /// Generate with a JSON-only response (if supported)
    fn generate_structured(&self, prompt: &ChatPrompt) -> Result<String, Self::Error>;
}

/// Trait for locating covenant sections semantically
///
/// Implemented by the application layer (covenant-extractor)
pub trait SemanticExtractor {
    /// Error type for extraction operations
    type Error;

    /// Return one finding per requested canonical target
    fn extract(&self, text: &str, targets: &[String]) -> Result<SemanticFindings, Self::Error>;
}
