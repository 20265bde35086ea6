//! Line-window strategy
//!
//! Scans non-blank lines for a target heading phrase. A section starts at the
//! matching line and runs until the line before the next detected heading, or
//! until `max_section_lines` lines have been taken, whichever comes first.
//! Positions are 1-based line numbers with an inclusive end.

use crate::heading::is_heading;
use crate::matcher::MatcherSet;
use covenant_domain::{CovenantSection, SectionSpan, SectionStrategy, VocabularyEntry};
use tracing::debug;

/// Heading-line matcher with a line-count ceiling
#[derive(Debug, Clone)]
pub struct LineWindowStrategy {
    matchers: MatcherSet,
    max_section_lines: usize,
}

impl LineWindowStrategy {
    /// Create the strategy over precompiled matchers
    pub fn new(matchers: MatcherSet, max_section_lines: usize) -> Self {
        Self {
            matchers,
            max_section_lines: max_section_lines.max(1),
        }
    }
}

/// Index of the last line of a section starting at `start` (0-based, inclusive)
fn section_end(lines: &[&str], start: usize, max_section_lines: usize) -> usize {
    let cap = (start + max_section_lines - 1).min(lines.len() - 1);
    (start + 1..=cap)
        .find(|&i| is_heading(lines[i]))
        .map(|next_heading| next_heading - 1)
        .unwrap_or(cap)
}

impl SectionStrategy for LineWindowStrategy {
    fn name(&self) -> &'static str {
        "line_window"
    }

    fn find_sections(&self, text: &str, entry: &VocabularyEntry) -> Vec<CovenantSection> {
        let Some(matcher) = self.matchers.for_entry(entry) else {
            return Vec::new();
        };

        let lines: Vec<&str> = text.lines().collect();
        let mut sections = Vec::new();

        for (start, line) in lines.iter().enumerate() {
            if line.trim().is_empty() || !matcher.matches_line(line) {
                continue;
            }
            let end = section_end(&lines, start, self.max_section_lines);
            let content = lines[start..=end].join("\n").trim().to_string();
            debug!(covenant = %entry.canonical, line = start + 1, end = end + 1, "heading match");

            sections.push(CovenantSection::new(
                entry.canonical.as_str(),
                line.trim(),
                content,
                SectionSpan::lines(start + 1, end + 1),
            ));
        }

        sections
    }
}
