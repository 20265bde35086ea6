//! Targets command implementation.

use crate::cli::TargetsArgs;
use crate::config::{load_vocabulary, Config};
use crate::error::Result;
use crate::output::Formatter;

/// Execute the targets command.
pub fn execute_targets(args: TargetsArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let path = args
        .vocabulary
        .as_deref()
        .or(config.defaults.vocabulary.as_deref());
    let vocabulary = load_vocabulary(path)?;
    println!("{}", formatter.format_targets(&vocabulary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::path::PathBuf;

    #[test]
    fn test_missing_vocabulary_file() {
        let args = TargetsArgs {
            vocabulary: Some(PathBuf::from("/nonexistent/vocab.toml")),
        };
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert!(execute_targets(args, &Config::default(), &formatter).is_err());
    }

    #[test]
    fn test_builtin_vocabulary() {
        let args = TargetsArgs { vocabulary: None };
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert!(execute_targets(args, &Config::default(), &formatter).is_ok());
    }
}
