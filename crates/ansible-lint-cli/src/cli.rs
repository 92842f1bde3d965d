//! CLI argument definitions for the scanner.

use std::path::PathBuf;

use clap::Parser;

use crate::errors::CliError;
use crate::telemetry::LogFormat;

/// Runs `ansible-lint` over the YAML files of a directory and prints the
/// issues found as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "ansible-lint-scan", version)]
pub(crate) struct Cli {
    /// Directory whose `.yml` and `.yaml` files are analysed.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub(crate) base_dir: PathBuf,
    /// Analysis property, for example
    /// `-D sonar.ansible.ansible-lint.path=/usr/bin/ansible-lint`.
    #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_property)]
    pub(crate) properties: Vec<(String, String)>,
    /// Comma-separated ids of the active rules. Every rule is active when
    /// omitted.
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub(crate) rules: Option<Vec<String>>,
    /// Tracing filter directives.
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub(crate) log_filter: String,
    /// Log output format, `json` or `compact`.
    #[arg(long, value_name = "FORMAT", default_value_t = LogFormat::Compact)]
    pub(crate) log_format: LogFormat,
    /// Arguments appended to every `ansible-lint` command line.
    #[arg(last = true, value_name = "LINT_ARG")]
    pub(crate) lint_args: Vec<String>,
}

/// Parses a `KEY=VALUE` property; the value may be empty.
pub(crate) fn parse_property(text: &str) -> Result<(String, String), CliError> {
    match text.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(CliError::InvalidProperty(text.to_owned())),
    }
}
