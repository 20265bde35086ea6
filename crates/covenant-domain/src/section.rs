//! Extracted covenant sections and the per-document result aggregate

use crate::confidence::Confidence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coordinate system of a [`SectionSpan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionUnit {
    /// 1-based line numbers, `end` inclusive
    Line,
    /// 0-based UTF-8 byte offsets into the extracted text, `end` exclusive
    Byte,
}

/// Position of a section inside the document text
///
/// `end >= start` always holds; constructors swap reversed bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionSpan {
    /// First position of the section
    pub start: usize,
    /// Last line (inclusive) or end offset (exclusive)
    pub end: usize,
    /// Coordinate system of `start` and `end`
    #[serde(rename = "position_unit")]
    pub unit: PositionUnit,
}

impl SectionSpan {
    /// Span over 1-based lines `start..=end`
    pub fn lines(start: usize, end: usize) -> Self {
        Self::ordered(start, end, PositionUnit::Line)
    }

    /// Span over byte offsets `start..end`
    pub fn bytes(start: usize, end: usize) -> Self {
        Self::ordered(start, end, PositionUnit::Byte)
    }

    fn ordered(start: usize, end: usize, unit: PositionUnit) -> Self {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        Self { start, end, unit }
    }

    /// End of the half-open range `[start, end_exclusive)` this span covers
    pub fn end_exclusive(&self) -> usize {
        match self.unit {
            PositionUnit::Line => self.end + 1,
            PositionUnit::Byte => self.end,
        }
    }

    /// Whether `position` falls inside the half-open range of this span
    pub fn contains(&self, position: usize) -> bool {
        position >= self.start && position < self.end_exclusive()
    }

    /// Whether the two half-open ranges share any position
    ///
    /// Spans in different units never overlap.
    pub fn overlaps(&self, other: &SectionSpan) -> bool {
        self.unit == other.unit
            && self.start < other.end_exclusive()
            && other.start < self.end_exclusive()
    }
}

/// One extracted candidate section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovenantSection {
    /// Canonical target key this section was found for
    pub section_type: String,
    /// Matched heading text
    pub title: String,
    /// Full extracted span text
    pub content: String,
    /// Position in the document
    #[serde(flatten)]
    pub span: SectionSpan,
    /// Heuristic score, 0.0 when unscored
    #[serde(default)]
    pub confidence: Confidence,
}

impl CovenantSection {
    /// Create an unscored section
    pub fn new(
        section_type: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        span: SectionSpan,
    ) -> Self {
        Self {
            section_type: section_type.into(),
            title: title.into(),
            content: content.into(),
            span,
            confidence: Confidence::ZERO,
        }
    }

    /// Attach a confidence score
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }
}

/// Sections found per canonical target for one document
///
/// Every requested target has an entry, possibly empty. Within an entry,
/// sections are in discovery order (ascending position), not ranked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    sections: BTreeMap<String, Vec<CovenantSection>>,
}

impl ExtractionResult {
    /// Result with an empty entry for each canonical target
    pub fn with_targets<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sections = targets.into_iter().map(|t| (t.into(), Vec::new())).collect();
        Self { sections }
    }

    /// Replace the sections recorded for `target`
    pub fn insert(&mut self, target: impl Into<String>, sections: Vec<CovenantSection>) {
        self.sections.insert(target.into(), sections);
    }

    /// Sections for `target`, empty if the target was not requested
    pub fn sections(&self, target: &str) -> &[CovenantSection] {
        self.sections.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Canonical targets present in this result
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Iterate `(target, sections)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CovenantSection])> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Total number of sections across all targets
    pub fn total(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// True when no target produced a section
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
