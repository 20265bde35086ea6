//! CLI command definitions and argument parsing.

use crate::config::{Mode, OutputFormat};
use clap::{Parser, Subcommand};
use covenant_extractor::Strategy;
use std::path::PathBuf;

/// Covenant CLI - Extract covenant sections from credit agreements.
#[derive(Debug, Parser)]
#[command(name = "covenant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (one line per document)
    Quiet,
}

/// Extraction path options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ModeArg {
    /// Heuristic section extraction
    Regex,
    /// Language-model lookup
    Llm,
    /// Both, with a comparison
    Both,
}

/// Section strategy options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StrategyArg {
    /// Heading lines with a line cap
    LineWindow,
    /// Pattern spans with boundary search
    Span,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract covenant sections from PDF or text files
    Extract(ExtractArgs),

    /// List the targets of the active vocabulary
    Targets(TargetsArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// A PDF or text file, or a directory searched recursively for PDFs
    #[arg(short, long)]
    pub inputs: PathBuf,

    /// Directory for the JSON reports
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Which extraction paths to run
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Targets to extract (comma separated or repeated)
    #[arg(short, long, value_delimiter = ',')]
    pub targets: Vec<String>,

    /// Extract every target of the vocabulary
    #[arg(long, conflicts_with = "targets")]
    pub all_targets: bool,

    /// Chat model name
    #[arg(long)]
    pub model: Option<String>,

    /// Read at most this many PDF pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Line-window cap on section length
    #[arg(long)]
    pub max_section_lines: Option<usize>,

    /// Section strategy
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Vocabulary TOML file replacing the built-in targets
    #[arg(long)]
    pub vocabulary: Option<PathBuf>,

    /// API key for the language model
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OpenAI-compatible endpoint
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub base_url: Option<String>,
}

/// Arguments for the targets command.
#[derive(Debug, Parser)]
pub struct TargetsArgs {
    /// Vocabulary TOML file replacing the built-in targets
    #[arg(long)]
    pub vocabulary: Option<PathBuf>,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Regex => Mode::Regex,
            ModeArg::Llm => Mode::Llm,
            ModeArg::Both => Mode::Both,
        }
    }
}

impl From<StrategyArg> for Strategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::LineWindow => Strategy::LineWindow,
            StrategyArg::Span => Strategy::Span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from([
            "covenant",
            "extract",
            "--inputs",
            "data/",
            "--mode",
            "regex",
            "--targets",
            "liens,asset sales",
            "--strategy",
            "span",
        ]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.inputs, PathBuf::from("data/"));
                assert!(matches!(args.mode, Some(ModeArg::Regex)));
                assert_eq!(args.targets, vec!["liens", "asset sales"]);
                assert!(matches!(args.strategy, Some(StrategyArg::Span)));
                assert!(args.out.is_none());
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["covenant", "targets", "--format", "json", "--no-color"]);
        assert!(matches!(cli.command, Command::Targets(_)));
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.no_color);
    }

    #[test]
    fn test_all_targets_conflicts_with_targets() {
        let result = Cli::try_parse_from([
            "covenant", "extract", "-i", "a.pdf", "--all-targets", "--targets", "liens",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inputs_required() {
        assert!(Cli::try_parse_from(["covenant", "extract"]).is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Mode::from(ModeArg::Both), Mode::Both);
        assert_eq!(Strategy::from(StrategyArg::LineWindow), Strategy::LineWindow);
        assert_eq!(OutputFormat::from(CliFormat::Quiet), OutputFormat::Quiet);
    }
}
