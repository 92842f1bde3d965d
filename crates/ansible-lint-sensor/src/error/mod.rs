//! Errors raised while running the external linter.

use std::sync::Arc;

use thiserror::Error;

/// Failures of a single linter invocation.
#[derive(Debug, Clone, Error)]
pub enum LintError {
    /// The process could not be spawned, or reading its output failed.
    #[error("I/O error running '{program}': {source}")]
    Io {
        /// Executable that was being run.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The wait for the process was interrupted; the child has been killed.
    #[error("interrupted while waiting for '{program}'")]
    Interrupted {
        /// Executable that was being run.
        program: String,
    },
}

impl LintError {
    /// Builds an [`LintError::Io`] from an owned I/O error.
    #[must_use]
    pub fn io(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            program: program.into(),
            source: Arc::new(source),
        }
    }

    /// Returns the executable the error relates to.
    #[must_use]
    pub fn program(&self) -> &str {
        match self {
            Self::Io { program, .. } | Self::Interrupted { program } => program,
        }
    }
}

#[cfg(test)]
mod tests;
