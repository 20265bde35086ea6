//! Compiled per-target matchers

use crate::error::ExtractorError;
use covenant_domain::{TargetVocabulary, VocabularyEntry};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::warn;

/// Separator allowed between the words of a multi-word phrase
const WORD_GAP: &str = r"[\s\-]+";

/// Regular expressions for one canonical target
#[derive(Debug, Clone)]
pub struct TargetMatcher {
    canonical: String,
    line: Regex,
    spans: Vec<Regex>,
}

impl TargetMatcher {
    /// Compile the line and span patterns of `entry`
    ///
    /// The span patterns always end with a heading pattern derived from the
    /// synonyms, so entries without configured patterns still match.
    pub fn compile(entry: &VocabularyEntry) -> Result<Self, ExtractorError> {
        let invalid = |e: regex::Error| ExtractorError::InvalidPattern {
            target: entry.canonical.clone(),
            message: e.to_string(),
        };

        let line = Regex::new(&line_pattern(&entry.synonyms())).map_err(invalid)?;

        let mut spans = entry
            .span_patterns
            .iter()
            .map(|p| Regex::new(p).map_err(invalid))
            .collect::<Result<Vec<_>, _>>()?;
        spans.push(Regex::new(&heading_span_pattern(&entry.synonyms())).map_err(invalid)?);

        Ok(Self {
            canonical: entry.canonical.clone(),
            line,
            spans,
        })
    }

    /// Canonical target key
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Whether a single line starts with one of the target's heading phrases
    pub fn matches_line(&self, line: &str) -> bool {
        self.line.is_match(line)
    }

    /// Whole-text patterns; capture group 1, when present, is the title
    pub fn span_patterns(&self) -> &[Regex] {
        &self.spans
    }
}

/// Matchers for every entry of a vocabulary, compiled once
#[derive(Debug, Clone, Default)]
pub struct MatcherSet {
    matchers: HashMap<String, TargetMatcher>,
}

impl MatcherSet {
    /// Compile every entry, failing on the first invalid pattern
    pub fn compile(vocabulary: &TargetVocabulary) -> Result<Self, ExtractorError> {
        let matchers = vocabulary
            .entries()
            .map(|entry| Ok((entry.canonical.clone(), TargetMatcher::compile(entry)?)))
            .collect::<Result<HashMap<_, _>, ExtractorError>>()?;
        Ok(Self { matchers })
    }

    /// Precompiled matcher for `entry`, or one compiled on the spot
    ///
    /// Entries outside the vocabulary are compiled per call; a pattern that
    /// fails to compile yields `None` and a warning.
    pub fn for_entry(&self, entry: &VocabularyEntry) -> Option<Cow<'_, TargetMatcher>> {
        if let Some(matcher) = self.matchers.get(&entry.canonical) {
            return Some(Cow::Borrowed(matcher));
        }
        match TargetMatcher::compile(entry) {
            Ok(matcher) => Some(Cow::Owned(matcher)),
            Err(e) => {
                warn!(covenant = %entry.canonical, error = %e, "skipping target");
                None
            }
        }
    }

    /// Number of precompiled targets
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// True when nothing was precompiled
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

/// Regex fragment matching `phrase` with flexible spaces and hyphens
fn phrase_fragment(phrase: &str) -> String {
    phrase
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|token| !token.is_empty())
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(WORD_GAP)
}

/// Alternation over synonyms, longest first so the fullest phrase wins
fn alternation(synonyms: &[&str]) -> String {
    let mut fragments: Vec<String> = synonyms
        .iter()
        .map(|s| phrase_fragment(s))
        .filter(|f| !f.is_empty())
        .collect();
    fragments.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    fragments.dedup();
    fragments.join("|")
}

/// Line pattern: optional `Section N.N` prefix and separator, then a synonym
fn line_pattern(synonyms: &[&str]) -> String {
    format!(
        r"(?i)^\s*(?:(?:section\s+)?\d+(?:\.\d+)*\.?\s*)?(?:[:\-–—.]\s*)?(?:{})\b",
        alternation(synonyms)
    )
}

/// Whole-text variant of the line pattern; group 1 is the synonym as written
fn heading_span_pattern(synonyms: &[&str]) -> String {
    format!(
        r"(?im)^[ \t]*(?:(?:section\s+)?\d+(?:\.\d+)*\.?[ \t]*)?(?:[:\-–—.][ \t]*)?({})\b",
        alternation(synonyms)
    )
}
