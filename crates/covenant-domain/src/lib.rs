//! Covenant Domain Layer
//!
//! Core model for covenant section extraction. Defines the value objects
//! produced by the extractors, the target vocabulary they consult, and the
//! trait seams behind which PDF readers and language models live.
//!
//! ## Key Concepts
//!
//! - **CovenantSection**: one extracted candidate span with a heuristic confidence
//! - **SectionSpan**: start/end coordinates, in lines or bytes depending on the strategy
//! - **Confidence**: a clamped [0.0, 1.0] score from keyword and indicator density
//! - **TargetVocabulary**: canonical covenant names mapped to synonyms, patterns and keywords
//! - **Traits**: `TextSource`, `SectionStrategy`, `LlmProvider` and `SemanticExtractor` boundaries
//!
//! ## Architecture
//!
//! Pure data and string logic only. Infrastructure (PDF parsing, HTTP calls)
//! lives in other crates and plugs in through [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod finding;
pub mod section;
pub mod traits;
pub mod vocabulary;

// Re-exports for convenience
pub use confidence::{score, Confidence};
pub use finding::{LlmFinding, SemanticFindings};
pub use section::{CovenantSection, ExtractionResult, PositionUnit, SectionSpan};
pub use vocabulary::{normalize, TargetVocabulary, VocabularyEntry, GENERIC_INDICATORS};
pub use traits::{ChatPrompt, LlmProvider, SectionStrategy, SemanticExtractor, TextSource};
