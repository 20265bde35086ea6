//! Per-document JSON reports and regex/LLM comparison.

use crate::error::Result;
use covenant_domain::{CovenantSection, ExtractionResult, LlmFinding, SemanticFindings};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Word-set similarity at which the two methods are considered to agree
pub const AGREEMENT_THRESHOLD: f64 = 0.6;

/// Everything extracted from one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Path of the source document
    pub file: PathBuf,

    /// Canonical targets requested
    pub targets: Vec<String>,

    /// Heuristic sections per target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<ExtractionResult>,

    /// Model findings per target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<SemanticFindings>,

    /// Why the model lookup failed, when it did
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_error: Option<String>,

    /// Per-target agreement between both methods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<BTreeMap<String, TargetComparison>>,
}

/// How the two methods relate for one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetComparison {
    /// Number of heuristic sections
    pub regex_sections: usize,
    /// Whether the model named a title or excerpt
    pub llm_found: bool,
    /// Best word-set similarity between the model excerpt and any section
    pub agreement: f64,
    /// `agreement` reached [`AGREEMENT_THRESHOLD`]
    pub overlapping: bool,
}

impl DocumentReport {
    /// Empty report for `file`
    pub fn new(file: impl Into<PathBuf>, targets: Vec<String>) -> Self {
        Self {
            file: file.into(),
            targets,
            regex: None,
            llm: None,
            llm_error: None,
            comparison: None,
        }
    }

    /// Fill `comparison` when both methods produced output
    pub fn compare(&mut self) {
        let (Some(regex), Some(llm)) = (&self.regex, &self.llm) else {
            return;
        };
        let comparison = self
            .targets
            .iter()
            .map(|target| {
                let finding = llm.get(target.as_str()).cloned().unwrap_or_default();
                (target.clone(), compare_target(regex.sections(target), &finding))
            })
            .collect();
        self.comparison = Some(comparison);
    }

    /// Total heuristic sections across targets
    pub fn regex_total(&self) -> usize {
        self.regex.as_ref().map_or(0, ExtractionResult::total)
    }

    /// Targets for which the model found something
    pub fn llm_found(&self) -> usize {
        self.llm
            .as_ref()
            .map_or(0, |findings| findings.values().filter(|f| !f.is_empty()).count())
    }
}

/// Running totals over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Documents with a written report
    pub processed: usize,
    /// Documents that could not be processed
    pub failed: usize,
    /// Heuristic sections across all reports
    pub sections: usize,
    /// Targets the model found across all reports
    pub llm_found: usize,
}

impl BatchSummary {
    /// Count a successful document
    pub fn record(&mut self, report: &DocumentReport) {
        self.processed += 1;
        self.sections += report.regex_total();
        self.llm_found += report.llm_found();
    }

    /// Count a failed document
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// True when there was work and none of it succeeded
    pub fn all_failed(&self) -> bool {
        self.processed == 0 && self.failed > 0
    }
}

/// Compare heuristic sections for one target against the model's finding
pub fn compare_target(sections: &[CovenantSection], finding: &LlmFinding) -> TargetComparison {
    let agreement = sections
        .iter()
        .map(|s| similarity(&finding.excerpt, &s.content))
        .fold(0.0, f64::max);
    TargetComparison {
        regex_sections: sections.len(),
        llm_found: !finding.is_empty(),
        agreement,
        overlapping: agreement >= AGREEMENT_THRESHOLD,
    }
}

/// Jaccard similarity of the lower-cased word sets of `a` and `b`
///
/// Either side empty gives 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let left = words(a);
    let right = words(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let shared = left.intersection(&right).count();
    let union = left.union(&right).count();
    shared as f64 / union as f64
}

fn words(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Path of the report for `input` inside `out_dir`: `<basename>.json`
pub fn report_path(out_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    out_dir.join(format!("{}.json", stem))
}

/// Write `report` as pretty JSON, creating `out_dir` if needed
pub fn write_report(out_dir: &Path, report: &DocumentReport) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = report_path(out_dir, &report.file);
    fs::write(&path, serde_json::to_string_pretty(report)?)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_domain::SectionSpan;

    fn section(content: &str) -> CovenantSection {
        CovenantSection::new("liens", "Liens", content, SectionSpan::lines(1, 2))
    }

    fn finding(excerpt: &str) -> LlmFinding {
        LlmFinding {
            title: "Liens".to_string(),
            excerpt: excerpt.to_string(),
            rationale: String::new(),
        }
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("", "anything"), 0.0);
        assert_eq!(similarity("No Liens.", "no liens"), 1.0);
        assert!((similarity("a b c d", "a b") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_compare_target_takes_best_section() {
        let sections = vec![
            section("unrelated text entirely"),
            section("The Borrower shall not create any lien"),
        ];
        let cmp = compare_target(&sections, &finding("the borrower shall not create any lien"));
        assert_eq!(cmp.regex_sections, 2);
        assert!(cmp.llm_found);
        assert_eq!(cmp.agreement, 1.0);
        assert!(cmp.overlapping);
    }

    #[test]
    fn test_compare_target_without_sections() {
        let cmp = compare_target(&[], &LlmFinding::default());
        assert_eq!(cmp.agreement, 0.0);
        assert!(!cmp.llm_found);
        assert!(!cmp.overlapping);
    }

    #[test]
    fn test_compare_requires_both_methods() {
        let mut report = DocumentReport::new("deal.pdf", vec!["liens".to_string()]);
        report.llm = Some(SemanticFindings::new());
        report.compare();
        assert!(report.comparison.is_none());

        report.regex = Some(ExtractionResult::with_targets(["liens"]));
        report.compare();
        let comparison = report.comparison.unwrap();
        assert_eq!(comparison["liens"].regex_sections, 0);
    }

    #[test]
    fn test_batch_summary() {
        let mut summary = BatchSummary::default();
        assert!(!summary.all_failed());
        summary.record_failure();
        assert!(summary.all_failed());

        let mut report = DocumentReport::new("deal.pdf", vec!["liens".to_string()]);
        let mut regex = ExtractionResult::with_targets(["liens"]);
        regex.insert("liens", vec![section("The Borrower shall not create any lien")]);
        report.regex = Some(regex);
        report.llm = Some(SemanticFindings::from([("liens".to_string(), finding("lien"))]));
        summary.record(&report);

        assert!(!summary.all_failed());
        assert_eq!(summary.sections, 1);
        assert_eq!(summary.llm_found, 1);
    }

    #[test]
    fn test_report_path_uses_basename() {
        let path = report_path(Path::new("out"), Path::new("/data/deals/Acme Credit.pdf"));
        assert_eq!(path, PathBuf::from("out/Acme Credit.json"));
    }

    #[test]
    fn test_optional_keys_omitted() {
        let report = DocumentReport::new("deal.pdf", vec!["liens".to_string()]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["file"], "deal.pdf");
        assert!(json.get("regex").is_none());
        assert!(json.get("llm").is_none());
        assert!(json.get("llm_error").is_none());
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let mut report = DocumentReport::new("/x/deal.txt", vec!["liens".to_string()]);
        report.regex = Some(ExtractionResult::with_targets(["liens"]));

        let path = write_report(&out, &report).unwrap();
        assert_eq!(path, out.join("deal.json"));
        let parsed: DocumentReport =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed, report);
    }
}
