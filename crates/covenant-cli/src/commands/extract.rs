//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::{load_vocabulary, Config, Mode};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::report::{write_report, BatchSummary, DocumentReport};
use covenant_domain::{SemanticExtractor, TargetVocabulary, TextSource};
use covenant_extractor::{
    canonical_targets, semantic_extractor, BoxedSemanticExtractor, ExtractorConfig, SectionExtractor,
};
use covenant_source::DocumentSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Fully resolved settings for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// File or directory to process
    pub inputs: PathBuf,
    /// Report directory
    pub out_dir: PathBuf,
    /// Extraction paths
    pub mode: Mode,
    /// Canonical targets
    pub targets: Vec<String>,
    /// PDF page limit
    pub max_pages: Option<usize>,
    /// Active vocabulary
    pub vocabulary: TargetVocabulary,
    /// Extractor and model settings
    pub extractor: ExtractorConfig,
    /// Model credential
    pub api_key: Option<String>,
}

impl ExtractOptions {
    /// Merge command-line flags over the configuration file.
    pub fn resolve(args: ExtractArgs, config: &Config) -> Result<Self> {
        let vocabulary_path = args
            .vocabulary
            .as_deref()
            .or(config.defaults.vocabulary.as_deref());
        let vocabulary = load_vocabulary(vocabulary_path)?;

        let mut extractor = config.extractor.clone();
        if let Some(strategy) = args.strategy {
            extractor.strategy = strategy.into();
        }
        if let Some(lines) = args.max_section_lines {
            extractor.max_section_lines = lines;
        }
        if let Some(model) = args.model {
            extractor.llm.model = model;
        }
        if let Some(url) = args.base_url.filter(|u| !u.trim().is_empty()) {
            extractor.llm.base_url = Some(url);
        }
        extractor.validate().map_err(CliError::Config)?;

        let requested: Vec<String> = if args.all_targets {
            vocabulary.canonical_targets().map(str::to_string).collect()
        } else if !args.targets.is_empty() {
            args.targets
        } else {
            config.defaults.targets.clone()
        };
        let targets = canonical_targets(&requested);
        if targets.is_empty() {
            return Err(CliError::InvalidInput("No targets given".to_string()));
        }

        Ok(Self {
            inputs: args.inputs,
            out_dir: args.out.unwrap_or_else(|| config.defaults.out_dir.clone()),
            mode: args.mode.map(Into::into).unwrap_or(config.defaults.mode),
            targets,
            max_pages: args.max_pages,
            vocabulary,
            extractor,
            api_key: args.api_key,
        })
    }
}

/// Per-document processing shared by every worker.
pub struct Pipeline {
    source: DocumentSource,
    extractor: SectionExtractor,
    semantic: Option<BoxedSemanticExtractor>,
    mode: Mode,
    targets: Vec<String>,
}

impl Pipeline {
    /// Build the text source, the section extractor and, if the mode needs
    /// it, the semantic extractor.
    pub fn new(options: &ExtractOptions) -> Result<Self> {
        let extractor = SectionExtractor::new(options.vocabulary.clone(), options.extractor.clone())?;
        let semantic = options.mode.runs_llm().then(|| {
            semantic_extractor(
                &options.extractor.llm,
                &options.vocabulary,
                options.api_key.as_deref(),
            )
        });

        Ok(Self {
            source: DocumentSource::new(options.max_pages),
            extractor,
            semantic,
            mode: options.mode,
            targets: options.targets.clone(),
        })
    }

    /// Extract text from `path` and run every enabled path over it.
    ///
    /// A failed model lookup is recorded in the report, not returned.
    pub fn process(&self, path: &Path) -> Result<DocumentReport> {
        let text = self.source.read_text(path)?;
        if text.trim().is_empty() {
            return Err(CliError::InvalidInput(format!(
                "No text extracted from {}",
                path.display()
            )));
        }
        info!(file = %path.display(), chars = text.chars().count(), "text extracted");

        let mut report = DocumentReport::new(path, self.targets.clone());
        if self.mode.runs_regex() {
            report.regex = Some(self.extractor.extract(&text, &self.targets));
        }
        if let Some(semantic) = &self.semantic {
            match semantic.extract(&text, &self.targets) {
                Ok(findings) => report.llm = Some(findings),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "semantic lookup failed");
                    report.llm_error = Some(e.to_string());
                }
            }
        }
        report.compare();
        Ok(report)
    }
}

/// Files to process under `path`
///
/// A file is accepted when it is a PDF or a `.txt`. A directory is searched
/// recursively for PDFs. Any other file, or a path that does not exist,
/// yields nothing.
pub fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if is_pdf(path) || DocumentSource::is_plain_text(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        warn!(file = %path.display(), "neither a PDF nor a text file");
        return Ok(Vec::new());
    }
    if !path.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path) {
        match entry {
            Ok(entry) if entry.file_type().is_file() && is_pdf(entry.path()) => {
                files.push(entry.into_path());
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "skipping unreadable directory entry"),
        }
    }
    files.sort();
    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Process every input one at a time, writing a report for each success.
///
/// A document that fails is reported and skipped.
pub async fn run_batch(
    inputs: Vec<PathBuf>,
    pipeline: Arc<Pipeline>,
    out_dir: &Path,
    formatter: &Formatter,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for path in inputs {
        let worker = Arc::clone(&pipeline);
        let job_path = path.clone();
        let outcome = match tokio::task::spawn_blocking(move || worker.process(&job_path)).await {
            Ok(outcome) => outcome,
            Err(e) => Err(CliError::Worker(e.to_string())),
        };

        match outcome.and_then(|report| write_report(out_dir, &report).map(|saved| (report, saved))) {
            Ok((report, saved)) => {
                println!("{}", formatter.format_document(&report)?);
                if formatter.is_verbose() {
                    println!("{}", formatter.success(&format!("Saved {}", saved.display())));
                }
                summary.record(&report);
            }
            Err(e) => {
                eprintln!("{}", formatter.error(&format!("{}: {}", path.display(), e)));
                summary.record_failure();
            }
        }
    }

    Ok(summary)
}

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let options = ExtractOptions::resolve(args, config)?;
    let inputs = collect_inputs(&options.inputs)?;
    if inputs.is_empty() {
        println!(
            "{}",
            formatter.warning(&format!("No PDF or text files found at {}", options.inputs.display()))
        );
        return Ok(());
    }

    let has_key = options.api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
    if options.mode.runs_llm() && !has_key {
        eprintln!(
            "{}",
            formatter.info("OPENAI_API_KEY not set; LLM extraction disabled")
        );
    }
    info!(
        documents = inputs.len(),
        mode = ?options.mode,
        strategy = options.extractor.strategy.as_str(),
        "starting batch"
    );

    let pipeline = Arc::new(Pipeline::new(&options)?);
    let summary = run_batch(inputs, pipeline, &options.out_dir, formatter).await?;
    println!("{}", formatter.format_totals(&summary)?);

    if summary.all_failed() {
        return Err(CliError::AllFailed(summary.failed));
    }
    Ok(())
}
