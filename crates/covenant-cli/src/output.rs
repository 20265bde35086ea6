//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::report::{BatchSummary, DocumentReport};
use colored::*;
use covenant_domain::{CovenantSection, TargetVocabulary};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Per-target summary of one document.
    pub fn format_document(&self, report: &DocumentReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_document_json(report),
            OutputFormat::Table => Ok(self.format_document_table(report)),
            OutputFormat::Quiet => Ok(format!(
                "{}\t{}\t{}",
                report.file.display(),
                report.regex_total(),
                report.llm_found()
            )),
        }
    }

    /// Summary rows as JSON, without section bodies.
    fn format_document_json(&self, report: &DocumentReport) -> Result<String> {
        let targets: Vec<serde_json::Value> = report
            .targets
            .iter()
            .map(|target| {
                let sections = report.regex.as_ref().map(|r| r.sections(target));
                let finding = report.llm.as_ref().and_then(|l| l.get(target.as_str()));
                serde_json::json!({
                    "target": target,
                    "regex_sections": sections.map(<[CovenantSection]>::len),
                    "avg_confidence": sections.and_then(average_confidence),
                    "llm_title": finding.map(|f| f.title.as_str()),
                    "agreement": report
                        .comparison
                        .as_ref()
                        .and_then(|c| c.get(target.as_str()))
                        .map(|c| c.agreement),
                })
            })
            .collect();

        Ok(serde_json::to_string(&serde_json::json!({
            "file": report.file,
            "targets": targets,
            "llm_error": report.llm_error,
        }))?)
    }

    /// Summary as a table.
    fn format_document_table(&self, report: &DocumentReport) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Target", "Sections", "Avg Confidence", "LLM Title", "Agreement"]);

        for target in &report.targets {
            let (count, confidence) = match report.regex.as_ref() {
                Some(regex) => {
                    let sections = regex.sections(target);
                    let avg = average_confidence(sections)
                        .map(|c| format!("{:.1}%", c * 100.0))
                        .unwrap_or_else(|| "-".to_string());
                    (sections.len().to_string(), avg)
                }
                None => ("-".to_string(), "-".to_string()),
            };
            let title = match report.llm.as_ref().and_then(|l| l.get(target.as_str())) {
                Some(finding) if !finding.title.is_empty() => truncate(&finding.title, 48),
                Some(_) => "(none)".to_string(),
                None => "-".to_string(),
            };
            let agreement = report
                .comparison
                .as_ref()
                .and_then(|c| c.get(target.as_str()))
                .map(|c| format!("{:.0}%", c.agreement * 100.0))
                .unwrap_or_else(|| "-".to_string());

            builder.push_record([target.as_str(), &count, &confidence, &title, &agreement]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut out = format!("{}\n{}", self.colorize(&report.file.display().to_string(), "cyan"), table);
        if let Some(error) = &report.llm_error {
            out.push('\n');
            out.push_str(&self.warning(&format!("LLM lookup failed: {}", error)));
        }
        out
    }

    /// Totals at the end of a batch.
    pub fn format_totals(&self, summary: &BatchSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(summary)?),
            OutputFormat::Quiet => Ok(format!(
                "{}\t{}\t{}",
                summary.processed, summary.failed, summary.sections
            )),
            OutputFormat::Table => {
                let message = format!(
                    "Processed {} document(s), {} failed, {} section(s) found, {} LLM finding(s)",
                    summary.processed, summary.failed, summary.sections, summary.llm_found
                );
                Ok(if summary.failed == 0 {
                    self.success(&message)
                } else {
                    self.warning(&message)
                })
            }
        }
    }

    /// Canonical targets of a vocabulary.
    pub fn format_targets(&self, vocabulary: &TargetVocabulary) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<_> = vocabulary.entries().collect();
                Ok(serde_json::to_string_pretty(&entries)?)
            }
            OutputFormat::Quiet => Ok(vocabulary.canonical_targets().collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                if vocabulary.is_empty() {
                    return Ok(self.colorize("No targets configured.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Target", "Synonyms", "Description"]);
                for entry in vocabulary.entries() {
                    builder.push_record([
                        entry.canonical.as_str(),
                        &entry.synonyms().join(", "),
                        &entry.description,
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Whether human-oriented messages should be printed.
    pub fn is_verbose(&self) -> bool {
        self.format == OutputFormat::Table
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Mean confidence of `sections`, `None` when empty.
fn average_confidence(sections: &[CovenantSection]) -> Option<f64> {
    if sections.is_empty() {
        return None;
    }
    let total: f64 = sections.iter().map(|s| s.confidence.value()).sum();
    Some(total / sections.len() as f64)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}
