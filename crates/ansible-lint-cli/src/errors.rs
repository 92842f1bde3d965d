//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use ansible_host::HostError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

/// Exit code for usage and configuration errors.
const USAGE_EXIT: u8 = 2;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("invalid property '{0}', expected KEY=VALUE")]
    InvalidProperty(String),
    #[error("base directory {path} is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("failed to read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },
    #[error(transparent)]
    Host(#[from] HostError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to install signal handlers: {0}")]
    Signals(Arc<io::Error>),
    #[error("failed to serialise issue: {0}")]
    Serialise(Arc<serde_json::Error>),
    #[error("failed to write issues: {0}")]
    Write(Arc<io::Error>),
    #[error("analysis stopped after {scanned} of {total} files")]
    Aborted { scanned: usize, total: usize },
}

impl CliError {
    pub(crate) fn walk(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Walk {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Maps the error to the process exit code.
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidProperty(_)
            | Self::NotADirectory { .. }
            | Self::Telemetry(_) => ExitCode::from(USAGE_EXIT),
            Self::Walk { .. }
            | Self::Host(_)
            | Self::Signals(_)
            | Self::Serialise(_)
            | Self::Write(_)
            | Self::Aborted { .. } => ExitCode::FAILURE,
        }
    }
}
