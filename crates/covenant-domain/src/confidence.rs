//! Confidence scoring for candidate sections
//!
//! A coarse, explainable scorer: the share of configured keywords present in
//! the section text and the share of indicator phrases present, blended with
//! fixed weights. Presence counts, not frequency, so the score is
//! deterministic and independent of phrase order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight of the keyword share in the blended score
pub const KEYWORD_WEIGHT: f64 = 0.6;

/// Weight of the indicator-phrase share in the blended score
pub const INDICATOR_WEIGHT: f64 = 0.4;

/// Heuristic confidence in [0.0, 1.0]
///
/// Not a probability. Values outside the range are clamped on construction,
/// NaN becomes 0.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Unscored
    pub const ZERO: Confidence = Confidence(0.0);

    /// Create a confidence, clamping into [0.0, 1.0]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Raw value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether this confidence reaches `floor` (inclusive)
    pub fn meets(self, floor: f64) -> bool {
        self.0 >= floor
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Share of `phrases` that occur in `haystack_lower`, capped at 1.0
///
/// An empty phrase set scores 0.0.
pub fn presence_ratio<S: AsRef<str>>(haystack_lower: &str, phrases: &[S]) -> f64 {
    if phrases.is_empty() {
        return 0.0;
    }
    let hits = phrases
        .iter()
        .filter(|p| haystack_lower.contains(&p.as_ref().to_lowercase()))
        .count();
    (hits as f64 / phrases.len() as f64).min(1.0)
}

/// Score `text` against a keyword set and an indicator-phrase set
///
/// `0.6 * keyword_share + 0.4 * indicator_share`, always in [0.0, 1.0].
///
/// # Examples
///
/// ```
/// use covenant_domain::score;
///
/// let text = "The Company shall not declare any dividend.";
/// let c = score(text, &["dividend", "distribution"], &["shall not"]);
/// assert!((c.value() - 0.7).abs() < 1e-9);
/// ```
pub fn score<K, I>(text: &str, keywords: &[K], indicators: &[I]) -> Confidence
where
    K: AsRef<str>,
    I: AsRef<str>,
{
    let lower = text.to_lowercase();
    let keyword_score = presence_ratio(&lower, keywords);
    let indicator_score = presence_ratio(&lower, indicators);
    Confidence::new(KEYWORD_WEIGHT * keyword_score + INDICATOR_WEIGHT * indicator_score)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the blended score stays in [0, 1] for any set sizes
        #[test]
        fn test_score_bounded(
            text in ".{0,200}",
            keywords in prop::collection::vec("[a-z ]{0,12}", 0..8),
            indicators in prop::collection::vec("[a-z ]{0,12}", 0..8),
        ) {
            let c = score(&text, &keywords, &indicators).value();
            prop_assert!((0.0..=1.0).contains(&c));
        }

        /// Property: keyword order does not change the score
        #[test]
        fn test_score_order_independent(
            text in "[a-z ]{0,120}",
            mut keywords in prop::collection::vec("[a-z]{1,6}", 1..6),
        ) {
            let forward = score(&text, &keywords, &[] as &[&str]);
            keywords.reverse();
            let backward = score(&text, &keywords, &[] as &[&str]);
            prop_assert_eq!(forward, backward);
        }

        /// Property: construction always lands in range
        #[test]
        fn test_new_in_range(value in proptest::num::f64::ANY) {
            let c = Confidence::new(value).value();
            prop_assert!((0.0..=1.0).contains(&c));
        }
    }
}
