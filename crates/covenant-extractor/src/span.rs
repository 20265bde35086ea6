//! Span strategy
//!
//! Runs each target pattern over the whole text. A section starts where the
//! pattern matched and ends at the nearest following section boundary, or at
//! the character cap when no boundary comes sooner. Either way the span is cut
//! back to its last blank line when that line lies past `paragraph_cut_ratio`
//! of the span. Positions are UTF-8 byte offsets into the text, end exclusive.

use crate::matcher::MatcherSet;
use covenant_domain::{CovenantSection, SectionSpan, SectionStrategy, VocabularyEntry};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

// New "Section/Article/Clause N" headers, or a line opening with a
// "N.N Capitalized" or "A. Capitalized" enumerator.
static SECTION_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:(?i:section|article|clause)\s+(?:\d+(?:\.\d+)*|[IVXLC]+\b|[A-Z](?:\.\d+)*\b)|\d+\.\d+\s+[A-Z]|[A-Z]\.\s+[A-Z])",
    )
    .expect("valid section boundary regex")
});

/// Pattern-span matcher with boundary search and a character ceiling
#[derive(Debug, Clone)]
pub struct SpanStrategy {
    matchers: MatcherSet,
    max_section_chars: usize,
    paragraph_cut_ratio: f64,
}

impl SpanStrategy {
    /// Create the strategy over precompiled matchers
    pub fn new(matchers: MatcherSet, max_section_chars: usize, paragraph_cut_ratio: f64) -> Self {
        Self {
            matchers,
            max_section_chars: max_section_chars.max(1),
            paragraph_cut_ratio,
        }
    }

    /// Byte range `[start, end)` of the section opened by a match at `start`
    fn section_range(&self, text: &str, start: usize, search_from: usize) -> (usize, usize) {
        let cap_end = text[start..]
            .char_indices()
            .nth(self.max_section_chars)
            .map(|(offset, _)| start + offset)
            .unwrap_or(text.len());

        let end = match next_boundary(text, search_from) {
            Some(boundary) if boundary <= cap_end => boundary,
            _ => cap_end,
        };
        (start, start + paragraph_cut(&text[start..end], self.paragraph_cut_ratio))
    }
}

/// Start of the first section boundary at or after `from`
fn next_boundary(text: &str, from: usize) -> Option<usize> {
    SECTION_BOUNDARY.find_at(text, from).map(|m| m.start())
}

/// Length to keep of a span: up to its last blank line if that lies past `ratio`
fn paragraph_cut(span: &str, ratio: f64) -> usize {
    match span.rfind("\n\n") {
        Some(pos) if pos as f64 > ratio * span.len() as f64 => pos,
        _ => span.len(),
    }
}

impl SectionStrategy for SpanStrategy {
    fn name(&self) -> &'static str {
        "span"
    }

    fn find_sections(&self, text: &str, entry: &VocabularyEntry) -> Vec<CovenantSection> {
        let Some(matcher) = self.matchers.for_entry(entry) else {
            return Vec::new();
        };

        let mut sections = Vec::new();
        for pattern in matcher.span_patterns() {
            for caps in pattern.captures_iter(text) {
                let Some(whole) = caps.get(0).filter(|m| !m.is_empty()) else {
                    continue;
                };

                let (start, end) = self.section_range(text, whole.start(), whole.end());
                let raw = &text[start..end];
                let content = raw.trim();
                if content.is_empty() {
                    continue;
                }
                let lead = raw.len() - raw.trim_start().len();
                let span = SectionSpan::bytes(start + lead, start + lead + content.len());

                let title = caps
                    .get(1)
                    .map(|g| g.as_str())
                    .unwrap_or(whole.as_str())
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
                let title = if title.is_empty() {
                    entry.display_title()
                } else {
                    title
                };

                debug!(covenant = %entry.canonical, start = span.start, end = span.end, "span match");
                sections.push(CovenantSection::new(entry.canonical.as_str(), title, content, span));
            }
        }

        // Several patterns often hit the same heading
        sections.sort_by_key(|s| s.span.start);
        sections.dedup_by(|later, earlier| later.span == earlier.span);
        sections
    }
}
