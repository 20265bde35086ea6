//! Core section extraction pipeline

use crate::config::{ExtractorConfig, Strategy};
use crate::dedup::deduplicate;
use crate::error::ExtractorError;
use crate::line_window::LineWindowStrategy;
use crate::matcher::MatcherSet;
use crate::span::SpanStrategy;
use covenant_domain::{
    normalize, score, CovenantSection, ExtractionResult, SectionStrategy, TargetVocabulary,
};
use tracing::{debug, info};

/// Heuristic covenant section extractor
///
/// Runs the configured strategy for each target, scores every candidate,
/// drops those below the confidence floor and resolves overlaps.
pub struct SectionExtractor {
    vocabulary: TargetVocabulary,
    config: ExtractorConfig,
    strategy: Box<dyn SectionStrategy + Send + Sync>,
}

impl SectionExtractor {
    /// Create an extractor, compiling every vocabulary pattern up front
    ///
    /// # Errors
    ///
    /// Returns `Config` for an invalid configuration and `InvalidPattern`
    /// when a vocabulary span pattern does not compile.
    pub fn new(vocabulary: TargetVocabulary, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let matchers = MatcherSet::compile(&vocabulary)?;

        let strategy: Box<dyn SectionStrategy + Send + Sync> = match config.strategy {
            Strategy::LineWindow => {
                Box::new(LineWindowStrategy::new(matchers, config.max_section_lines))
            }
            Strategy::Span => Box::new(SpanStrategy::new(
                matchers,
                config.max_section_chars,
                config.paragraph_cut_ratio,
            )),
        };

        Ok(Self {
            vocabulary,
            config,
            strategy,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Vocabulary the matchers were built from
    pub fn vocabulary(&self) -> &TargetVocabulary {
        &self.vocabulary
    }

    /// Name of the active strategy
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Extract sections for each requested target
    ///
    /// Target names are normalized. The result has one entry per distinct
    /// target, empty when nothing matched.
    pub fn extract<S: AsRef<str>>(&self, text: &str, targets: &[S]) -> ExtractionResult {
        let targets = canonical_targets(targets);
        let mut result = ExtractionResult::with_targets(targets.iter().cloned());

        for target in &targets {
            let sections = self.extract_target(text, target);
            result.insert(target.as_str(), sections);
        }

        info!(
            strategy = self.strategy_name(),
            targets = targets.len(),
            sections = result.total(),
            "extraction complete"
        );
        result
    }

    fn extract_target(&self, text: &str, target: &str) -> Vec<CovenantSection> {
        let entry = self.vocabulary.entry_for(target);
        let candidates = self.strategy.find_sections(text, &entry);
        let found = candidates.len();

        let floor = self.config.confidence_floor;
        let apply_floor = self.config.floor_applies();
        let scored: Vec<CovenantSection> = candidates
            .into_iter()
            .map(|section| {
                let confidence = score(
                    &section.content,
                    entry.keywords.as_slice(),
                    entry.indicators.as_slice(),
                );
                section.with_confidence(confidence)
            })
            .filter(|section| {
                let keep = !apply_floor || section.confidence.meets(floor);
                if !keep {
                    debug!(
                        covenant = %target,
                        start = section.span.start,
                        confidence = %section.confidence,
                        "below confidence floor"
                    );
                }
                keep
            })
            .collect();
        let scored_count = scored.len();

        let sections = deduplicate(scored);
        info!(
            covenant = %target,
            candidates = found,
            above_floor = scored_count,
            kept = sections.len(),
            "target processed"
        );
        sections
    }
}

/// Normalize target names, dropping blanks and repeats while keeping order
pub fn canonical_targets<S: AsRef<str>>(targets: &[S]) -> Vec<String> {
    let mut seen = Vec::with_capacity(targets.len());
    for target in targets {
        let canonical = normalize(target.as_ref());
        if !canonical.is_empty() && !seen.contains(&canonical) {
            seen.push(canonical);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FloorPolicy;

    #[test]
    fn test_canonical_targets() {
        let targets = canonical_targets(&["  Restricted   Payments ", "", "restricted payments", "Liens"]);
        assert_eq!(targets, vec!["restricted payments", "liens"]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExtractorConfig {
            max_section_lines: 0,
            ..ExtractorConfig::default()
        };
        let result = SectionExtractor::new(TargetVocabulary::builtin(), config);
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_strategy_selection() {
        let vocab = TargetVocabulary::builtin();
        let line = SectionExtractor::new(vocab.clone(), ExtractorConfig::line_window()).unwrap();
        assert_eq!(line.strategy_name(), "line_window");
        let span = SectionExtractor::new(vocab, ExtractorConfig::span()).unwrap();
        assert_eq!(span.strategy_name(), "span");
    }

    #[test]
    fn test_scores_are_attached() {
        let config = ExtractorConfig {
            floor_policy: FloorPolicy::Disabled,
            ..ExtractorConfig::default()
        };
        let extractor = SectionExtractor::new(TargetVocabulary::builtin(), config).unwrap();
        let result = extractor.extract("Section 6.3 Liens\nnothing else", &["liens"]);

        let sections = result.sections("liens");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].confidence.value() > 0.0);
    }

    #[test]
    fn test_every_target_present() {
        let extractor =
            SectionExtractor::new(TargetVocabulary::builtin(), ExtractorConfig::default()).unwrap();
        let result = extractor.extract("", &["liens", "Change of Control"]);
        assert_eq!(result.targets().collect::<Vec<_>>(), vec!["change of control", "liens"]);
        assert!(result.is_empty());
    }
}
