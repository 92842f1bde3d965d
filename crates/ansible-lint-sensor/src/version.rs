//! Probe of the installed `ansible-lint` version.
//!
//! The probe only informs the user. It never stops the analysis.

use tracing::{debug, info, warn};

use crate::process::CommandRunner;

/// Tracing target for the version probe.
const VERSION_TARGET: &str = "ansible_lint_sensor::version";

/// Versions reported by `ansible-lint --version`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintVersion {
    lint: Option<String>,
    ansible: Option<String>,
}

impl LintVersion {
    /// Returns the first line printed by the linter.
    #[must_use]
    pub fn lint(&self) -> Option<&str> {
        self.lint.as_deref()
    }

    /// Returns the Ansible version the linter runs against, when printed.
    #[must_use]
    pub fn ansible(&self) -> Option<&str> {
        self.ansible.as_deref()
    }
}

/// Extracts the Ansible part of a `ansible-lint X using ansible Y` banner.
fn ansible_suffix(line: &str) -> Option<String> {
    line.split_once(" using ")
        .map(|(_, rest)| rest.trim())
        .filter(|rest| rest.starts_with("ansible"))
        .map(str::to_owned)
}

/// Runs `<lint_path> --version` and logs what it prints.
///
/// Returns `None` when the linter cannot be run.
pub fn probe_version<R: CommandRunner + ?Sized>(runner: &R, lint_path: &str) -> Option<LintVersion> {
    let argv = [lint_path.to_owned(), String::from("--version")];
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    if let Err(err) = runner.run(&argv, &mut stdout, &mut stderr) {
        debug!(target: VERSION_TARGET, %err, "version probe failed");
        warn!(target: VERSION_TARGET, "Cannot get ansible version");
        return None;
    }

    info!(target: VERSION_TARGET, "ansible-lint version:");
    let mut lines = stdout.into_iter();
    let lint = lines.next();
    if let Some(line) = &lint {
        info!(target: VERSION_TARGET, "{line}");
    }

    let ansible = match lines.next() {
        Some(line) => {
            info!(target: VERSION_TARGET, "{line}");
            Some(line)
        }
        None => lint.as_deref().and_then(ansible_suffix),
    };
    if ansible.is_none() {
        warn!(target: VERSION_TARGET, "Cannot get ansible version");
    }

    Some(LintVersion { lint, ansible })
}
