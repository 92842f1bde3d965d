//! Behaviour-driven tests for sensor execution.

use ansible_host::{ActiveRules, FileSystem, InMemoryContext, InputFile, RuleKey, Settings};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tracing::Level;

use super::{LogCapture, StubRunner};
use crate::rules::REPOSITORY_KEY;
use crate::sensor::{AnsibleLintSensor, LintProfile, LintReport, WARNINGS_HIDDEN_NOTICE};

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SensorWorld {
    project: Option<tempfile::TempDir>,
    playbooks: Vec<String>,
    settings: Settings,
    stdout: Vec<String>,
    stderr: Vec<String>,
    report: Option<LintReport>,
    saved: Vec<String>,
    logs: LogCapture,
}

impl SensorWorld {
    fn report(&self) -> &LintReport {
        self.report.as_ref().expect("sensor must have run")
    }
}

#[fixture]
fn world() -> SensorWorld {
    SensorWorld::default()
}

fn strs(lines: &[String]) -> Vec<&str> {
    lines.iter().map(String::as_str).collect()
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("a project with playbooks {names}")]
fn given_project(world: &mut SensorWorld, names: String) {
    world.project = Some(tempfile::tempdir().expect("tempdir"));
    world.playbooks = names
        .trim_matches('"')
        .split(',')
        .map(|name| name.trim().to_owned())
        .collect();
}

#[given("ansible-lint prints the mixed diagnostics")]
fn given_mixed_output(world: &mut SensorWorld) {
    world.stdout = [
        "p1:2: [EANSIBLE1] A first error",
        "p1:3: [EAnyCheck1] An error -p",
        "EAnyCheck1 p1:4",
        "p1:5: [EAnyCheck2] Another error foo",
        "p2:3: [EAnyCheck2] Another error bar",
    ]
    .iter()
    .map(|line| (*line).to_owned())
    .collect();
}

#[given("ansible-lint prints the line {line}")]
fn given_output_line(world: &mut SensorWorld, line: String) {
    world.stdout.push(line.trim_matches('"').to_owned());
}

#[given("ansible-lint reports {line} on stderr")]
fn given_stderr_line(world: &mut SensorWorld, line: String) {
    world.stderr.push(line.trim_matches('"').to_owned());
}

#[given("the setting {key} is {value}")]
fn given_setting(world: &mut SensorWorld, key: String, value: String) {
    world
        .settings
        .set(key.trim_matches('"'), value.trim_matches('"'));
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the sensor runs")]
fn when_sensor_runs(world: &mut SensorWorld) {
    let base = world
        .project
        .as_ref()
        .expect("project must be set")
        .path()
        .to_path_buf();
    let mut fs = FileSystem::new(&base);
    for name in &world.playbooks {
        let file = InputFile::new(base.join(name), "yaml")
            .expect("input file")
            .with_key(name.as_str())
            .with_lines(20);
        fs.add(file);
    }
    let mut rules = ActiveRules::new();
    for rule in ["ANSIBLE1", "EAnyCheck1", "EAnyCheck2"] {
        rules.activate(RuleKey::new(REPOSITORY_KEY, rule));
    }
    let mut context = InMemoryContext::new(fs, world.settings.clone(), rules);

    let runner = StubRunner::default()
        .with_version(&["ansible-lint 6.14.3 using ansible 2.14.4"])
        .with_stdout(&strs(&world.stdout))
        .with_stderr(&strs(&world.stderr));
    let sensor = AnsibleLintSensor::with_runner(LintProfile::ansible(), runner);
    let report = world
        .logs
        .run(|| sensor.execute_with_lint(&mut context, None));

    world.saved = context
        .issues()
        .iter()
        .map(|issue| issue.rule_key().to_string())
        .collect();
    world.report = Some(report);
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("{count} issues are saved")]
fn then_issues_saved(world: &mut SensorWorld, count: usize) {
    assert_eq!(world.report().saved(), count, "saved: {:?}", world.saved);
    assert_eq!(world.saved.len(), count);
}

#[then("{count} issue is dropped")]
fn then_issue_dropped(world: &mut SensorWorld, count: usize) {
    assert_eq!(world.report().dropped(), count);
}

#[then("every playbook was scanned")]
fn then_every_playbook_scanned(world: &mut SensorWorld) {
    let scanned: Vec<&str> = world
        .report()
        .scanned_files()
        .iter()
        .map(InputFile::key)
        .collect();
    assert_eq!(scanned, strs(&world.playbooks));
}

#[then("the warnings notice is logged")]
fn then_warnings_notice_logged(world: &mut SensorWorld) {
    assert!(
        world
            .logs
            .messages(Level::INFO)
            .contains(&WARNINGS_HIDDEN_NOTICE.to_owned())
    );
}

#[then("no warning is logged")]
fn then_no_warning_logged(world: &mut SensorWorld) {
    let warnings = world.logs.messages(Level::WARN);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/sensor_execution.feature")]
fn sensor_execution_behaviour(world: SensorWorld) {
    let _ = world;
}
