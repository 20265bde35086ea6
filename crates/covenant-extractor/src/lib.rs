//! Covenant Extractor
//!
//! Locates covenant sections in agreement text.
//!
//! # Overview
//!
//! Two independent paths run over the same document text:
//!
//! - A heuristic path matches headings against a target vocabulary, carves
//!   out each section body, scores it by keyword and indicator presence and
//!   resolves overlapping candidates.
//! - An optional language-model path asks a chat model for the title and an
//!   excerpt of each target. It is disabled when no credential is present.
//!
//! # Architecture
//!
//! ```text
//! Text → SectionStrategy → score → floor → deduplicate → ExtractionResult
//! Text → PromptBuilder → LlmProvider → parse_findings → SemanticFindings
//! ```
//!
//! # Example Usage
//!
//! ```
//! use covenant_domain::TargetVocabulary;
//! use covenant_extractor::{ExtractorConfig, SectionExtractor};
//!
//! let extractor = SectionExtractor::new(TargetVocabulary::builtin(), ExtractorConfig::default())?;
//! let text = "Section 6.3 Liens\nThe Borrower shall not create any lien or pledge, subject to permitted liens.";
//!
//! let result = extractor.extract(text, &["liens"]);
//! assert_eq!(result.sections("liens").len(), 1);
//! # Ok::<(), covenant_extractor::ExtractorError>(())
//! ```

#![warn(missing_docs)]

mod bridge;
mod config;
mod dedup;
mod error;
mod extractor;
mod heading;
mod line_window;
mod matcher;
mod parser;
mod prompt;
mod span;


pub use bridge::{semantic_extractor, BoxedSemanticExtractor, DisabledExtractor, LlmBridge};
pub use config::{ExtractorConfig, FloorPolicy, LlmConfig, Strategy};
pub use dedup::deduplicate;
pub use error::ExtractorError;
pub use extractor::{canonical_targets, SectionExtractor};
pub use heading::is_heading;
pub use line_window::LineWindowStrategy;
pub use matcher::{MatcherSet, TargetMatcher};
pub use parser::parse_findings;
pub use prompt::PromptBuilder;
pub use span::SpanStrategy;
