//! Log output for the scanner.
//!
//! Stdout carries the JSON issue stream, so every log event goes to stderr.
//! A scan is a one-shot run: compact lines stay short and carry no
//! timestamp, while JSON events are stamped for ingestion by log stacks.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use strum::{Display, EnumString};
use tracing::Subscriber;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Format of the first successful installation.
static INSTALLED_FORMAT: OnceCell<LogFormat> = OnceCell::new();

/// Supported logging output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, with an RFC 3339 timestamp.
    Json,
    /// Human-readable single line output.
    #[default]
    Compact,
}

/// Errors encountered while configuring log output.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The `--log-filter` directives do not parse.
    #[error("invalid log filter '{directives}': {reason}")]
    Filter {
        /// Directives as given on the command line.
        directives: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// Another global subscriber is already installed.
    #[error("failed to install log subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Installs the global subscriber on the first call and returns the active
/// format.
///
/// Later calls keep the first subscriber and report its format.
pub(crate) fn initialise(
    directives: &str,
    format: LogFormat,
) -> Result<LogFormat, TelemetryError> {
    INSTALLED_FORMAT
        .get_or_try_init(|| {
            let subscriber = build_subscriber(parse_filter(directives)?, format);
            tracing::subscriber::set_global_default(subscriber)?;
            Ok::<_, TelemetryError>(format)
        })
        .copied()
}

fn parse_filter(directives: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directives).map_err(|error| TelemetryError::Filter {
        directives: directives.to_owned(),
        reason: error.to_string(),
    })
}

fn build_subscriber(filter: EnvFilter, format: LogFormat) -> Box<dyn Subscriber + Send + Sync> {
    let stderr_is_terminal = io::stderr().is_terminal();
    match format {
        LogFormat::Json => Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .with_ansi(false)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .finish(),
        ),
        LogFormat::Compact => Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .with_ansi(stderr_is_terminal)
                .without_time()
                .compact()
                .finish(),
        ),
    }
}
