//! Crate-level test support and BDD tests.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use mockall::mock;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::error::LintError;
use crate::process::CommandRunner;

mod behaviour;

mock! {
    pub Runner {}

    impl CommandRunner for Runner {
        fn run(
            &self,
            argv: &[String],
            stdout: &mut Vec<String>,
            stderr: &mut Vec<String>,
        ) -> Result<i32, LintError>;
    }
}

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| (*line).to_owned()).collect()
}

/// Returns a runner printing the same lines on every call and exiting with 0.
pub(crate) fn runner_printing(stdout: &[&str], stderr: &[&str]) -> MockRunner {
    let stdout = owned(stdout);
    let stderr = owned(stderr);
    let mut runner = MockRunner::new();
    runner.expect_run().returning(move |_, out, err| {
        out.extend(stdout.iter().cloned());
        err.extend(stderr.iter().cloned());
        Ok(0)
    });
    runner
}

/// Runner answering `--version` probes and lint runs with canned output.
///
/// Every command line it receives is recorded.
#[derive(Debug, Default)]
pub(crate) struct StubRunner {
    version: Vec<String>,
    stdout: Vec<String>,
    stderr: Vec<String>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl StubRunner {
    pub(crate) fn with_version(mut self, lines: &[&str]) -> Self {
        self.version = owned(lines);
        self
    }

    pub(crate) fn with_stdout(mut self, lines: &[&str]) -> Self {
        self.stdout = owned(lines);
        self
    }

    pub(crate) fn with_stderr(mut self, lines: &[&str]) -> Self {
        self.stderr = owned(lines);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the lint runs, leaving out version probes.
    pub(crate) fn lint_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|argv| argv.last().is_none_or(|arg| arg != "--version"))
            .collect()
    }
}

impl CommandRunner for StubRunner {
    fn run(
        &self,
        argv: &[String],
        stdout: &mut Vec<String>,
        stderr: &mut Vec<String>,
    ) -> Result<i32, LintError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(argv.to_vec());
        if argv.last().is_some_and(|arg| arg == "--version") {
            stdout.extend(self.version.iter().cloned());
        } else {
            stdout.extend(self.stdout.iter().cloned());
            stderr.extend(self.stderr.iter().cloned());
        }
        Ok(0)
    }
}

/// Tracing layer recording the level and message of every event.
#[derive(Debug, Clone, Default)]
pub(crate) struct LogCapture {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl LogCapture {
    /// Runs `f` with this capture installed as the thread's subscriber.
    pub(crate) fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = Registry::default().with(self.clone());
        tracing::subscriber::with_default(subscriber, f)
    }

    /// Returns the messages logged at `level`, in order.
    pub(crate) fn messages(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(logged, _)| *logged == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((*event.metadata().level(), visitor.message.unwrap_or_default()));
    }
}
