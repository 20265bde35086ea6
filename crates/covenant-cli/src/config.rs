//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use covenant_domain::TargetVocabulary;
use covenant_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Defaults for `extract` flags
    #[serde(default)]
    pub defaults: Defaults,

    /// Section extractor and model settings
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Defaults for the extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Directory receiving one JSON report per document
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Which extraction paths to run
    #[serde(default)]
    pub mode: Mode,

    /// Targets extracted when none are given on the command line
    #[serde(default = "default_targets")]
    pub targets: Vec<String>,

    /// Vocabulary file replacing the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<PathBuf>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

/// Extraction paths to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Heuristic section extraction only
    Regex,
    /// Language-model lookup only
    Llm,
    /// Both, with a comparison
    #[default]
    Both,
}

impl Mode {
    /// Whether the heuristic extractor runs
    pub fn runs_regex(self) -> bool {
        matches!(self, Mode::Regex | Mode::Both)
    }

    /// Whether the language-model bridge runs
    pub fn runs_llm(self) -> bool {
        matches!(self, Mode::Llm | Mode::Both)
    }
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".covenant").join("config.toml"))
    }

    /// Load `explicit`, or the default file if it exists, or built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::path() {
                Ok(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.extractor.validate().map_err(CliError::Config)?;
        Ok(config)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            mode: Mode::default(),
            targets: default_targets(),
            vocabulary: None,
        }
    }
}

/// Load a vocabulary file, or the built-in vocabulary when `path` is `None`.
pub fn load_vocabulary(path: Option<&Path>) -> Result<TargetVocabulary> {
    let Some(path) = path else {
        return Ok(TargetVocabulary::builtin());
    };
    let contents = fs::read_to_string(path).map_err(|e| {
        CliError::Config(format!("Cannot read vocabulary {}: {}", path.display(), e))
    })?;
    let vocabulary = TargetVocabulary::from_toml(&contents).map_err(CliError::Config)?;
    if vocabulary.is_empty() {
        return Err(CliError::Config(format!(
            "Vocabulary {} defines no entries",
            path.display()
        )));
    }
    Ok(vocabulary)
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_targets() -> Vec<String> {
    vec!["restricted payments".to_string(), "change of control".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_extractor::Strategy;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.defaults.out_dir, PathBuf::from("outputs"));
        assert_eq!(config.defaults.mode, Mode::Both);
        assert_eq!(config.defaults.targets, vec!["restricted payments", "change of control"]);
        assert_eq!(config.extractor.max_section_lines, 120);
    }

    #[test]
    fn test_mode_paths() {
        assert!(Mode::Regex.runs_regex() && !Mode::Regex.runs_llm());
        assert!(!Mode::Llm.runs_regex() && Mode::Llm.runs_llm());
        assert!(Mode::Both.runs_regex() && Mode::Both.runs_llm());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [settings]
            format = "json"

            [defaults]
            mode = "regex"
            targets = ["liens"]

            [extractor]
            strategy = "span"
            "#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(config.defaults.mode, Mode::Regex);
        assert_eq!(config.defaults.targets, vec!["liens"]);
        assert_eq!(config.extractor.strategy, Strategy::Span);
        assert_eq!(config.extractor.max_section_chars, 5_000);
    }

    #[test]
    fn test_invalid_extractor_settings_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[extractor]\nmax_section_lines = 0").unwrap();
        assert!(matches!(Config::load_from(file.path()), Err(CliError::Config(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/covenant.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_load_vocabulary() {
        assert_eq!(load_vocabulary(None).unwrap().len(), 8);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[entry]]\ncanonical = \"Sanctions\"\nsynonyms = [\"sanctions\"]").unwrap();
        let vocab = load_vocabulary(Some(file.path())).unwrap();
        assert!(vocab.get("sanctions").is_some());

        let empty = tempfile::NamedTempFile::new().unwrap();
        assert!(load_vocabulary(Some(empty.path())).is_err());
    }
}
