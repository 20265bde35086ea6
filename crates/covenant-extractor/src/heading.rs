//! Heading detection
//!
//! A line is a heading when any one of three independent heuristics accepts it:
//! an explicit `Section N.N` enumerator followed by a capitalized word, an
//! all-caps line of at least eight characters, or a short line whose words are
//! mostly capitalized.

use regex::Regex;
use std::sync::LazyLock;

static SECTION_ENUMERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?i:section)\s+\d+(?:\.\d+)*\.?\s*[-–—:.]?\s*[A-Z]")
        .expect("valid section enumerator regex")
});

/// Minimum trimmed length of an all-caps heading
pub const MIN_ALL_CAPS_CHARS: usize = 8;

/// Maximum trimmed length of a title-case heading
pub const MAX_TITLE_CASE_CHARS: usize = 120;

/// Share of capitalized words a title-case heading must exceed
pub const TITLE_CASE_RATIO: f64 = 0.6;

/// Whether `line` looks like a section heading
///
/// Pure and deterministic; surrounding whitespace never changes the answer.
///
/// # Examples
///
/// ```
/// use covenant_extractor::is_heading;
///
/// assert!(is_heading("Section 4.2 Limitation on Incurrence of Indebtedness"));
/// assert!(is_heading("ARTICLE VII"));
/// assert!(!is_heading("(a) the Company shall not declare any dividend"));
/// ```
pub fn is_heading(line: &str) -> bool {
    let trimmed = line.trim();
    has_section_enumerator(trimmed) || is_all_caps(trimmed) || is_title_case(trimmed)
}

fn has_section_enumerator(line: &str) -> bool {
    SECTION_ENUMERATOR.is_match(line)
}

fn is_all_caps(line: &str) -> bool {
    line.chars().count() >= MIN_ALL_CAPS_CHARS
        && line.chars().all(|c| {
            c.is_ascii_uppercase()
                || c.is_ascii_digit()
                || matches!(c, ' ' | '&' | '/' | '-' | '_' | ',' | '.' | '(' | ')')
        })
}

fn is_title_case(line: &str) -> bool {
    if line.chars().count() > MAX_TITLE_CASE_CHARS {
        return false;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() < 2 {
        return false;
    }
    let capitalized = words
        .iter()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .count();
    capitalized as f64 / words.len() as f64 > TITLE_CASE_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_enumerator() {
        assert!(is_heading("Section 4.1 Restricted Payments"));
        assert!(is_heading("  SECTION 10.02. Liens"));
        assert!(is_heading("Section 7 - Events of Default"));
        assert!(!has_section_enumerator("Section 4.1 of this Agreement"));
        assert!(!has_section_enumerator("pursuant to Section 4.1 Restricted Payments"));
    }

    #[test]
    fn test_all_caps() {
        assert!(is_heading("NEGATIVE COVENANTS"));
        assert!(is_heading("ARTICLE VI (CONTINUED)"));
        assert!(!is_all_caps("LIENS"));
        assert!(!is_all_caps("NEGATIVE COVENANTS:"));
        assert!(!is_all_caps("=== [PAGE 1] ==="));
    }

    #[test]
    fn test_title_case() {
        assert!(is_heading("Limitation on Restricted Payments"));
        assert!(is_heading("Events Of Default"));
        assert!(!is_heading("Restricted"));
        assert!(!is_heading("The Borrower shall not, and shall not permit any Subsidiary to"));
    }

    #[test]
    fn test_title_case_ratio_is_strict() {
        // 3 of 5 capitalized is exactly 0.6, not above it
        assert!(!is_title_case("One Two Three four five"));
        assert!(is_title_case("One Two Three Four five"));
    }

    #[test]
    fn test_title_case_length_cap() {
        let long = "Word ".repeat(30);
        assert!(long.trim().chars().count() > MAX_TITLE_CASE_CHARS);
        assert!(!is_title_case(long.trim()));
    }

    #[test]
    fn test_blank_lines() {
        assert!(!is_heading(""));
        assert!(!is_heading("    \t"));
    }

    #[test]
    fn test_body_lines() {
        assert!(!is_heading("(a) The Company shall not declare or pay any dividend or make"));
        assert!(!is_heading("any distribution on account of its Equity Interests;"));
    }
}
