//! The sensor driving `ansible-lint` over the host's input files.
//!
//! One [`AnsibleLintSensor`] run takes a settings snapshot, probes the linter
//! version, runs the linter once per input file of the profile language, and
//! feeds every stdout line to an [`IssueAggregator`]. Once all files are
//! processed, or the first run fails, the aggregated issues are matched
//! against the active rules and saved through the [`SensorContext`].
//!
//! Files are analysed one after another. A failed or interrupted run stops
//! the loop; issues collected so far are still saved.

use ansible_host::{InputFile, Issue, Sensor, SensorContext, SensorDescriptor};
use tracing::{debug, info, warn};

use crate::aggregator::IssueAggregator;
use crate::parser::AnsibleLintIssue;
use crate::process::{CommandRunner, ProcessRunner};
use crate::rules::resolve_rule_key;
use crate::settings::LintSettings;
use crate::version::{LintVersion, probe_version};

/// Tracing target for sensor operations.
const SENSOR_TARGET: &str = "ansible_lint_sensor::sensor";

/// Token identifying warning lines on the linter's stderr.
const WARNING_TOKEN: &str = "WARNING ";

/// First line of the warning that relays the linter's stderr.
pub const STDERR_HEADER: &str = "Messages printed to error output during analysis:";

/// Notice logged once per run when warning lines were hidden.
pub const WARNINGS_HIDDEN_NOTICE: &str =
    "You asked not to see the ansible-lint warnings, they are removed from the reported messages";

/// Arguments always passed before the optional configuration file.
const BASE_ARGS: [&str; 3] = ["-p", "--nocolor", "-q"];

/// Identity of a lint sensor: display name, language and extra arguments.
///
/// # Example
///
/// ```
/// use ansible_lint_sensor::LintProfile;
///
/// let profile = LintProfile::ansible().with_extra_args(vec!["-x".into(), "E301".into()]);
/// assert_eq!(profile.name(), "Ansible Lint Sensor");
/// assert_eq!(profile.language(), "yaml");
/// assert_eq!(profile.extra_args(), ["-x", "E301"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintProfile {
    name: String,
    language: String,
    extra_args: Vec<String>,
}

impl LintProfile {
    /// Creates a profile without extra arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            extra_args: Vec::new(),
        }
    }

    /// The Ansible playbook profile: YAML files, no extra arguments.
    #[must_use]
    pub fn ansible() -> Self {
        Self::new("Ansible Lint Sensor", "yaml")
    }

    /// Sets arguments appended after the configuration file option.
    #[must_use]
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the language of the analysed files.
    #[must_use]
    pub const fn language(&self) -> &str {
        self.language.as_str()
    }

    /// Returns the extra arguments.
    #[must_use]
    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }
}

impl Default for LintProfile {
    fn default() -> Self {
        Self::ansible()
    }
}

/// Outcome of one sensor run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintReport {
    version: Option<LintVersion>,
    scanned_files: Vec<InputFile>,
    saved: usize,
    dropped: usize,
    aborted: bool,
}

impl LintReport {
    /// Returns the version reported by the linter, when the probe succeeded.
    #[must_use]
    pub const fn version(&self) -> Option<&LintVersion> {
        self.version.as_ref()
    }

    /// Returns the files whose analysis was attempted.
    #[must_use]
    pub fn scanned_files(&self) -> &[InputFile] {
        &self.scanned_files
    }

    /// Returns the number of issues saved to the host.
    #[must_use]
    pub const fn saved(&self) -> usize {
        self.saved
    }

    /// Returns the number of parsed issues that were not saved.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.dropped
    }

    /// Returns `true` when a linter run failed and remaining files were
    /// skipped.
    #[must_use]
    pub const fn aborted(&self) -> bool {
        self.aborted
    }
}

/// Sensor running `ansible-lint` through a [`CommandRunner`].
///
/// # Example
///
/// ```
/// use ansible_host::{Sensor, SensorDescriptor};
/// use ansible_lint_sensor::AnsibleLintSensor;
///
/// let sensor = AnsibleLintSensor::new();
/// let mut descriptor = SensorDescriptor::new();
/// sensor.describe(&mut descriptor);
/// assert_eq!(descriptor.sensor_name(), Some("Ansible Lint Sensor"));
/// assert_eq!(descriptor.language(), Some("yaml"));
/// ```
#[derive(Debug, Clone)]
pub struct AnsibleLintSensor<R = ProcessRunner> {
    profile: LintProfile,
    runner: R,
}

impl AnsibleLintSensor {
    /// Creates the Ansible sensor backed by real processes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_runner(LintProfile::ansible(), ProcessRunner::new())
    }
}

impl Default for AnsibleLintSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> AnsibleLintSensor<R> {
    /// Creates a sensor with the given profile and runner.
    #[must_use]
    pub const fn with_runner(profile: LintProfile, runner: R) -> Self {
        Self { profile, runner }
    }

    /// Returns the sensor profile.
    #[must_use]
    pub const fn profile(&self) -> &LintProfile {
        &self.profile
    }

    /// Returns the command runner.
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Builds the linter command line for one file.
    ///
    /// The layout is `<lint> -p --nocolor -q [-c <conf>] <profile args>
    /// <extra args> <file>`.
    #[must_use]
    pub fn build_command(
        &self,
        settings: &LintSettings,
        extra_args: Option<&[String]>,
        file: &InputFile,
    ) -> Vec<String> {
        let mut argv = vec![settings.lint_path().to_owned()];
        argv.extend(BASE_ARGS.iter().map(|arg| (*arg).to_owned()));
        if let Some(conf_path) = settings.conf_path() {
            argv.push(String::from("-c"));
            argv.push(conf_path.to_owned());
        }
        argv.extend(self.profile.extra_args.iter().cloned());
        argv.extend(extra_args.unwrap_or_default().iter().cloned());
        argv.push(file.path().display().to_string());
        argv
    }
}

impl<R: CommandRunner> AnsibleLintSensor<R> {
    /// Runs the linter over the context's files and saves the issues found.
    ///
    /// `extra_args` are appended after the profile's own extra arguments.
    pub fn execute_with_lint(
        &self,
        context: &mut dyn SensorContext,
        extra_args: Option<&[String]>,
    ) -> LintReport {
        let settings = LintSettings::from_settings(context.settings());
        let version = probe_version(&self.runner, settings.lint_path());

        let files: Vec<InputFile> = context
            .file_system()
            .input_files(self.profile.language())
            .cloned()
            .collect();
        let mut aggregator = IssueAggregator::new(context.file_system().base_dir());
        let aborted = self.analyse_files(&settings, extra_args, files, &mut aggregator);

        let (saved, dropped) = save_aggregated_issues(context, &mut aggregator);
        debug!(
            target: SENSOR_TARGET,
            scanned = aggregator.scanned_files().len(),
            saved,
            dropped,
            aborted,
            "ansible-lint analysis finished"
        );

        LintReport {
            version,
            scanned_files: aggregator.scanned_files().to_vec(),
            saved,
            dropped,
            aborted,
        }
    }

    /// Runs the linter on each file in turn; returns `true` when a run failed
    /// and the remaining files were skipped.
    fn analyse_files(
        &self,
        settings: &LintSettings,
        extra_args: Option<&[String]>,
        files: Vec<InputFile>,
        aggregator: &mut IssueAggregator,
    ) -> bool {
        let mut stderr_filter = StderrFilter::new(settings.disable_warnings());

        for file in files {
            let argv = self.build_command(settings, extra_args, &file);
            aggregator.note_scanned(file.clone());

            let mut stdout = Vec::new();
            let mut stderr = Vec::new();
            debug!(target: SENSOR_TARGET, file = file.key(), ?argv, "running ansible-lint");

            match self.runner.run(&argv, &mut stdout, &mut stderr) {
                Ok(exit_code) => {
                    debug!(target: SENSOR_TARGET, file = file.key(), exit_code, "ansible-lint finished");
                }
                Err(err) => {
                    warn!(
                        target: SENSOR_TARGET,
                        "Cannot run ansible-lint on {file}, analysis stopped: {err}"
                    );
                    return true;
                }
            }

            let recognised = stdout
                .iter()
                .filter(|line| aggregator.register(line))
                .count();
            debug!(
                target: SENSOR_TARGET,
                file = file.key(),
                lines = stdout.len(),
                recognised,
                "ansible-lint output parsed"
            );
            stderr_filter.report(stderr);
        }
        false
    }
}

impl<R: CommandRunner> Sensor for AnsibleLintSensor<R> {
    fn describe(&self, descriptor: &mut SensorDescriptor) {
        descriptor
            .only_on_language(self.profile.language())
            .name(self.profile.name());
    }

    fn execute(&self, context: &mut dyn SensorContext) {
        self.execute_with_lint(context, None);
    }
}

/// Relays the linter's stderr, hiding warning lines when asked to.
struct StderrFilter {
    disable_warnings: bool,
    notice_logged: bool,
}

impl StderrFilter {
    const fn new(disable_warnings: bool) -> Self {
        Self {
            disable_warnings,
            notice_logged: false,
        }
    }

    fn report(&mut self, lines: Vec<String>) {
        let total = lines.len();
        let retained: Vec<String> = if self.disable_warnings {
            lines
                .into_iter()
                .filter(|line| !line.contains(WARNING_TOKEN))
                .collect()
        } else {
            lines
        };

        if retained.len() < total && !self.notice_logged {
            info!(target: SENSOR_TARGET, "{WARNINGS_HIDDEN_NOTICE}");
            self.notice_logged = true;
        }
        if !retained.is_empty() {
            warn!(target: SENSOR_TARGET, "{STDERR_HEADER}\n{}", retained.join("\n"));
        }
    }
}

/// Saves every aggregated issue whose file and rule the host knows.
///
/// Returns the number of saved and dropped issues.
fn save_aggregated_issues(
    context: &mut dyn SensorContext,
    aggregator: &mut IssueAggregator,
) -> (usize, usize) {
    let mut saved = 0;
    let mut dropped = 0;
    aggregator.drain(|uri, issue| {
        let Some(file) = context.file_system().input_file(uri).cloned() else {
            debug!(target: SENSOR_TARGET, %uri, %issue, "issue on a file outside the analysis ignored");
            dropped += 1;
            return;
        };
        if save_issue(context, &file, issue) {
            saved += 1;
        } else {
            dropped += 1;
        }
    });
    (saved, dropped)
}

/// Saves one issue on `file` when its rule is active.
///
/// Returns `true` when the host accepted the issue.
pub fn save_issue(context: &mut dyn SensorContext, file: &InputFile, issue: AnsibleLintIssue) -> bool {
    let Some(rule_key) = resolve_rule_key(context.active_rules(), issue.rule_id()) else {
        debug!(
            target: SENSOR_TARGET,
            "Rule {} ignored, not found in repository",
            issue.rule_id()
        );
        return false;
    };

    let line = issue.line();
    let result = Issue::new(rule_key, file, line)
        .map(|new_issue| new_issue.with_message(issue.into_message()))
        .and_then(|new_issue| context.save_issue(new_issue));
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(target: SENSOR_TARGET, "Cannot save issue on {file} line {line}: {err}");
            false
        }
    }
}
