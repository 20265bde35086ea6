//! Covenant CLI library.
//!
//! This library provides the core functionality for the covenant command-line interface,
//! including configuration management, batch extraction, reports, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod report;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
