//! `ansible-lint` integration for the analysis host.
//!
//! The crate runs the external `ansible-lint` executable once per YAML input
//! file, parses the diagnostics it prints, and reports them as host issues.
//! It is split along the data flow:
//!
//! - [`process`] spawns child processes and collects their output lines,
//!   behind the [`CommandRunner`] seam.
//! - [`version`] logs the linter and Ansible versions before analysis.
//! - [`parser`] recognises the three diagnostic layouts printed by the
//!   linter across its releases.
//! - [`aggregator`] deduplicates parsed issues per file URI.
//! - [`sensor`] drives a run and saves issues whose rule is active.
//!
//! # Example
//!
//! ```
//! use ansible_lint_sensor::parse_line;
//!
//! let parsed = parse_line("site.yml:4: [E301] Commands should not change things")
//!     .expect("bracketed diagnostic");
//! assert_eq!(parsed.filename(), "site.yml");
//! assert_eq!(parsed.issue().rule_id(), "E301");
//! ```

pub mod aggregator;
pub mod error;
pub mod parser;
pub mod process;
pub mod rules;
pub mod sensor;
pub mod settings;
pub mod version;

pub use self::aggregator::IssueAggregator;
pub use self::error::LintError;
pub use self::parser::{AnsibleLintIssue, DiagnosticFlavour, ParsedDiagnostic, parse_line};
pub use self::process::{CommandRunner, InterruptHandle, ProcessRunner};
pub use self::sensor::{AnsibleLintSensor, LintProfile, LintReport};
pub use self::settings::LintSettings;
pub use self::version::LintVersion;

#[cfg(test)]
mod tests;
