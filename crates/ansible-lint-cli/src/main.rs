//! CLI entrypoint for the standalone `ansible-lint` scanner.
//!
//! The binary delegates to [`ansible_lint_cli::run`], which parses arguments,
//! installs telemetry, runs the sensor over the YAML files of a directory and
//! streams the issues found as JSON lines.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    ansible_lint_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
