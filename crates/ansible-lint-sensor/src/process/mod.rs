//! Child process execution with concurrent output capture.
//!
//! [`ProcessRunner`] implements [`CommandRunner`] by spawning the command
//! directly (no shell), draining stdout and stderr on two scoped reader
//! threads, and waiting for exit on the calling thread. Draining both pipes
//! while waiting keeps a chatty child from blocking on a full pipe buffer.
//!
//! The wait loop polls the child and checks an [`InterruptHandle`] between
//! polls. On Unix the child leads its own process group; a raised interrupt
//! kills the whole group and reaps the child before the readers are joined,
//! so processes the linter started cannot hold the pipes open.

use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, ScopedJoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::LintError;

/// Tracing target for process operations.
const PROCESS_TARGET: &str = "ansible_lint_sensor::process";

/// Interval between two exit checks while waiting for the child.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Spawn attempts made while the executable is still open for writing.
const SPAWN_ATTEMPTS: u32 = 5;

/// Base delay between two spawn attempts, scaled by the attempt number.
const SPAWN_RETRY_DELAY: Duration = Duration::from_millis(10);

/// Runs a command line and captures its output line by line.
///
/// The production implementation is [`ProcessRunner`]. Tests substitute
/// doubles that fill the sinks with canned output or fail on demand.
pub trait CommandRunner {
    /// Runs `argv` (`argv[0]` is the executable) and appends every stdout and
    /// stderr line to the matching sink, trailing newline removed.
    ///
    /// Returns the exit code; a non-zero exit is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Io`] if the process cannot be spawned or its
    /// output cannot be read, and [`LintError::Interrupted`] if the wait was
    /// interrupted.
    fn run(
        &self,
        argv: &[String],
        stdout: &mut Vec<String>,
        stderr: &mut Vec<String>,
    ) -> Result<i32, LintError>;
}

/// Shared flag used to interrupt a [`ProcessRunner`] while it waits.
///
/// Clones share the same flag. The flag stays raised until [`reset`] is
/// called.
///
/// [`reset`]: InterruptHandle::reset
///
/// # Example
///
/// ```
/// use ansible_lint_sensor::process::InterruptHandle;
///
/// let handle = InterruptHandle::new();
/// let observer = handle.clone();
/// handle.interrupt();
/// assert!(observer.is_interrupted());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle {
    flag: Arc<AtomicBool>,
}

impl InterruptHandle {
    /// Creates a lowered interrupt flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag.
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Lowers the flag.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Returns `true` while the flag is raised.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Returns the underlying flag, e.g. for registration with a signal
    /// handler.
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Runs commands as child processes of the current process.
///
/// The environment is inherited and stdin is closed.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    interrupt: InterruptHandle,
    poll_interval: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    /// Creates a runner with its own interrupt handle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            interrupt: InterruptHandle::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Replaces the interrupt handle.
    #[must_use]
    pub fn with_interrupt(mut self, interrupt: InterruptHandle) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Overrides the exit polling interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Returns the interrupt handle observed while waiting.
    #[must_use]
    pub const fn interrupt_handle(&self) -> &InterruptHandle {
        &self.interrupt
    }

    /// Waits for the child, killing it when the interrupt flag is raised.
    fn wait_for_exit(&self, program: &str, child: &mut Child) -> Result<i32, LintError> {
        loop {
            if self.interrupt.is_interrupted() {
                warn!(
                    target: PROCESS_TARGET,
                    program,
                    "interrupt requested, killing process"
                );
                terminate(program, child);
                return Err(LintError::Interrupted {
                    program: program.to_owned(),
                });
            }
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!(target: PROCESS_TARGET, program, ?status, "process exited");
                    return Ok(status.code().unwrap_or(-1));
                }
                Ok(None) => thread::sleep(self.poll_interval),
                Err(err) => {
                    terminate(program, child);
                    return Err(LintError::io(program, err));
                }
            }
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(
        &self,
        argv: &[String],
        stdout: &mut Vec<String>,
        stderr: &mut Vec<String>,
    ) -> Result<i32, LintError> {
        let Some((program, args)) = argv.split_first() else {
            return Err(LintError::io(
                "",
                io::Error::new(io::ErrorKind::InvalidInput, "empty command line"),
            ));
        };

        debug!(target: PROCESS_TARGET, program, ?args, "spawning process");

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        let mut child = spawn(program, &mut command)?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        thread::scope(|scope| {
            let stdout_reader = scope.spawn(move || read_lines(stdout_pipe));
            let stderr_reader = scope.spawn(move || read_lines(stderr_pipe));

            let status = self.wait_for_exit(program, &mut child);
            let stdout_lines = join_reader(program, stdout_reader);
            let stderr_lines = join_reader(program, stderr_reader);

            let code = status?;
            stdout.extend(stdout_lines?);
            stderr.extend(stderr_lines?);
            Ok(code)
        })
    }
}

/// Spawns `command`, retrying while the executable is busy.
///
/// A script written just before the call may still be open for writing in a
/// process forked concurrently, in which case `execve` fails with `ETXTBSY`
/// until that descriptor is closed.
fn spawn(program: &str, command: &mut Command) -> Result<Child, LintError> {
    let mut attempt = 1;
    loop {
        match command.spawn() {
            Ok(child) => return Ok(child),
            Err(err)
                if err.kind() == io::ErrorKind::ExecutableFileBusy && attempt < SPAWN_ATTEMPTS =>
            {
                debug!(
                    target: PROCESS_TARGET,
                    program,
                    attempt,
                    "executable busy, retrying spawn"
                );
                thread::sleep(SPAWN_RETRY_DELAY * attempt);
                attempt += 1;
            }
            Err(err) => return Err(LintError::io(program, err)),
        }
    }
}

/// Kills the child together with its process group, then reaps it.
fn terminate(program: &str, child: &mut Child) {
    debug!(target: PROCESS_TARGET, program, pid = child.id(), "terminating process");
    #[cfg(unix)]
    kill_group(program, child);
    drop(child.kill());
    drop(child.wait());
}

/// Sends `SIGKILL` to the process group led by the child.
#[cfg(unix)]
fn kill_group(program: &str, child: &Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Ok(pid) = i32::try_from(child.id()) else {
        return;
    };
    if let Err(errno) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        debug!(target: PROCESS_TARGET, program, %errno, "process group already gone");
    }
}

/// Reads a pipe to EOF, splitting on `\n` and dropping a trailing `\r`.
fn read_lines<R: Read>(pipe: Option<R>) -> io::Result<Vec<String>> {
    let Some(pipe) = pipe else {
        return Ok(Vec::new());
    };
    let mut reader = BufReader::new(pipe);
    let mut lines = Vec::new();
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(lines);
        }
        if buffer.last() == Some(&b'\n') {
            buffer.pop();
            if buffer.last() == Some(&b'\r') {
                buffer.pop();
            }
        }
        lines.push(String::from_utf8_lossy(&buffer).into_owned());
    }
}

fn join_reader(
    program: &str,
    reader: ScopedJoinHandle<'_, io::Result<Vec<String>>>,
) -> Result<Vec<String>, LintError> {
    match reader.join() {
        Ok(lines) => lines.map_err(|err| LintError::io(program, err)),
        Err(_) => Err(LintError::io(
            program,
            io::Error::other("output reader panicked"),
        )),
    }
}
