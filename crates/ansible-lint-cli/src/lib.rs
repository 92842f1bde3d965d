//! Standalone runner for the Ansible lint sensor.
//!
//! The runner acts as a minimal analysis host: it collects the YAML files
//! below a base directory, builds an in-memory sensor context from command
//! line properties, runs [`AnsibleLintSensor`] and prints every saved issue
//! as one JSON object per line. Logs go to stderr.
//!
//! Exit codes: `0` on success, `1` when the analysis fails or stops early,
//! `2` for usage and configuration errors.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use ansible_host::{ActiveRules, InMemoryContext, RuleKey, Settings};
use ansible_lint_sensor::rules::REPOSITORY_KEY;
use ansible_lint_sensor::{AnsibleLintSensor, InterruptHandle, LintProfile, ProcessRunner};
use clap::Parser;
use clap::error::ErrorKind;
use signal_hook::consts::{SIGINT, SIGTERM};
use tracing::{debug, info};

mod cli;
mod errors;
mod output;
mod project;
pub mod telemetry;

use cli::Cli;
use errors::CliError;

const CLI_TARGET: &str = "ansible_lint_cli";

/// Parses `args`, runs the scan and returns the process exit code.
///
/// Issues are written to `stdout`; usage and error messages to `stderr`.
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            return match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    drop(write!(stdout, "{error}"));
                    ExitCode::SUCCESS
                }
                _ => {
                    drop(write!(stderr, "{error}"));
                    ExitCode::from(2)
                }
            };
        }
    };

    match scan(&cli, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            drop(writeln!(stderr, "ansible-lint-scan: {error}"));
            error.exit_code()
        }
    }
}

fn scan<W: Write>(cli: &Cli, stdout: &mut W) -> Result<(), CliError> {
    let log_format = telemetry::initialise(&cli.log_filter, cli.log_format)?;
    debug!(target: CLI_TARGET, %log_format, "log output ready");

    let settings: Settings = cli.properties.iter().cloned().collect();
    let file_system = project::collect(&cli.base_dir)?;
    let total = file_system.len();
    let rules = active_rules(cli.rules.as_deref());
    let mut context = InMemoryContext::new(file_system, settings, rules);

    let interrupt = InterruptHandle::new();
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, interrupt.flag())
            .map_err(|error| CliError::Signals(Arc::new(error)))?;
    }

    let runner = ProcessRunner::new().with_interrupt(interrupt);
    let sensor = AnsibleLintSensor::with_runner(LintProfile::ansible(), runner);
    let extra_args = (!cli.lint_args.is_empty()).then_some(cli.lint_args.as_slice());
    let report = sensor.execute_with_lint(&mut context, extra_args);

    output::write_issues(stdout, context.issues())?;
    info!(
        target: CLI_TARGET,
        files = total,
        scanned = report.scanned_files().len(),
        saved = report.saved(),
        dropped = report.dropped(),
        "scan finished"
    );

    if report.aborted() {
        return Err(CliError::Aborted {
            scanned: report.scanned_files().len(),
            total,
        });
    }
    Ok(())
}

/// Activates the listed rules, or every Ansible rule when no list is given.
fn active_rules(rules: Option<&[String]>) -> ActiveRules {
    let Some(rules) = rules else {
        return ActiveRules::all_of(REPOSITORY_KEY);
    };
    let mut active = ActiveRules::new();
    for rule in rules.iter().map(|rule| rule.trim()).filter(|rule| !rule.is_empty()) {
        active.activate(RuleKey::new(REPOSITORY_KEY, rule));
    }
    active
}
