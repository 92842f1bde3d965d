//! Errors raised by the host surface.

use std::path::PathBuf;

use thiserror::Error;

/// Errors arising when the host validates files or issues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The path cannot be represented as a `file://` URL.
    #[error("path '{path}' cannot be converted to a file URI")]
    InvalidPath {
        /// Offending path.
        path: PathBuf,
    },

    /// An issue points at a line the file does not have.
    #[error("line {line} is out of range for '{file}' ({lines} lines)")]
    LineOutOfRange {
        /// Display key of the file.
        file: String,
        /// Requested 1-based line.
        line: u32,
        /// Number of lines the file holds.
        lines: u32,
    },
}
