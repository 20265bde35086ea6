//! Language-model bridge
//!
//! Asks a chat model for the title and an excerpt of each target section.
//! Without a credential nothing is sent and every lookup comes back empty.

use crate::config::LlmConfig;
use crate::error::ExtractorError;
use crate::extractor::canonical_targets;
use crate::parser::parse_findings;
use crate::prompt::PromptBuilder;
use covenant_domain::{LlmProvider, SemanticExtractor, SemanticFindings, TargetVocabulary};
use covenant_llm::OpenAiProvider;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Semantic extractor backed by an [`LlmProvider`]
pub struct LlmBridge<L> {
    provider: L,
    vocabulary: TargetVocabulary,
    config: LlmConfig,
}

impl<L> LlmBridge<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a bridge over `provider`
    pub fn new(provider: L, vocabulary: TargetVocabulary, config: LlmConfig) -> Self {
        Self {
            provider,
            vocabulary,
            config,
        }
    }

    /// The wrapped provider
    pub fn provider(&self) -> &L {
        &self.provider
    }
}

impl<L> SemanticExtractor for LlmBridge<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    type Error = ExtractorError;

    /// Provider failures are returned as `Llm` errors. A reply that cannot be
    /// parsed is logged and treated as finding nothing.
    fn extract(&self, text: &str, targets: &[String]) -> Result<SemanticFindings, ExtractorError> {
        let targets = canonical_targets(targets);
        if targets.is_empty() {
            return Ok(SemanticFindings::new());
        }

        let builder = PromptBuilder::new(text, &targets, self.config.text_cap_chars)
            .with_descriptions(&self.vocabulary);
        let prompt = builder.build()?;
        info!(
            model = self.provider.model_name(),
            targets = targets.len(),
            chars = builder.capped_text().chars().count(),
            "requesting semantic lookup"
        );

        let response = self
            .provider
            .generate_structured(&prompt)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;
        debug!(len = response.len(), "model response received");

        match parse_findings(&response, &targets) {
            Ok(findings) => Ok(findings),
            Err(e) => {
                warn!(error = %e, "unparseable model response, reporting no findings");
                Ok(SemanticFindings::new())
            }
        }
    }
}

/// Semantic extractor used when no credential is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledExtractor;

impl SemanticExtractor for DisabledExtractor {
    type Error = ExtractorError;

    fn extract(&self, _text: &str, _targets: &[String]) -> Result<SemanticFindings, ExtractorError> {
        debug!("no API credential, skipping semantic lookup");
        Ok(SemanticFindings::new())
    }
}

/// Boxed semantic extractor shared across worker threads
pub type BoxedSemanticExtractor =
    Box<dyn SemanticExtractor<Error = ExtractorError> + Send + Sync>;

/// Choose the semantic extractor for `credential`
///
/// A missing or blank credential yields [`DisabledExtractor`]; otherwise an
/// OpenAI-compatible provider configured from `config`.
pub fn semantic_extractor(
    config: &LlmConfig,
    vocabulary: &TargetVocabulary,
    credential: Option<&str>,
) -> BoxedSemanticExtractor {
    let Some(key) = credential.map(str::trim).filter(|k| !k.is_empty()) else {
        return Box::new(DisabledExtractor);
    };

    let provider = OpenAiProvider::new(key, config.model.as_str())
        .with_max_tokens(config.max_tokens)
        .with_temperature(config.temperature);
    let provider = match config.base_url.as_deref() {
        Some(url) if !url.trim().is_empty() => provider.with_base_url(url),
        _ => provider,
    };
    Box::new(LlmBridge::new(provider, vocabulary.clone(), config.clone()))
}
