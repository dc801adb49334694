//! Drives one run of the game as a child process.
//!
//! Each [`Driver::execute`] call spawns exactly one OS process, feeds the
//! scripted input lines to its stdin, and captures stdout, stderr and the
//! exit status. Both output streams are drained on dedicated threads while
//! input is written, so a full pipe buffer on either side can never wedge
//! the run. No retries: a call either completes or reports a launch,
//! capture or timeout error.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Timeout for a single game run in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Polling interval while waiting for process exit in milliseconds.
const POLL_INTERVAL_MS: u64 = 10;

/// Error type for driver operations.
///
/// A launch failure, a timeout and a nonzero exit code are three different
/// things; only the first two surface here.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} did not terminate within {timeout_ms} ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("failed writing to child stdin: {0}")]
    StdinFailed(#[source] io::Error),

    #[error("failed capturing child output: {0}")]
    CaptureFailed(#[source] io::Error),
}

/// How the child process left the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Process exited normally with a status code.
    Exited(i32),
    /// Process was killed by a signal.
    Signaled(i32),
}

/// Outcome of one completed run. Only produced when the child terminated
/// within the timeout and both streams were fully drained.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub status: ExitReason,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    /// Exit code as a plain integer; a signal death maps to `128 + signal`.
    pub fn exit_code(&self) -> i32 {
        match self.status {
            ExitReason::Exited(code) => code,
            ExitReason::Signaled(signal) => 128 + signal,
        }
    }

    /// Captured stdout split on newlines.
    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

/// Configuration for driving the external game program.
#[derive(Debug, Clone)]
pub struct Driver {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    timeout: Duration,
}

impl Driver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Arguments placed before the board path.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Working directory for the child; the game reads `config.ini` from here.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the game once.
    ///
    /// `board` is appended as the sole extra argument when present; `None`
    /// exercises the no-configuration path, which is distinct from passing a
    /// nonexistent path or a directory (the game tells them apart by exit
    /// code). Input lines are written in order, each newline-terminated, and
    /// the stream is closed after the last one so the child sees EOF.
    pub fn execute(
        &self,
        board: Option<&Path>,
        inputs: &[String],
    ) -> Result<ExecutionResult, DriverError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(board) = board {
            cmd.arg(board);
        }
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| DriverError::Launch {
            program: self.program.display().to_string(),
            source,
        })?;

        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        if let Some(mut stdin) = child.stdin.take() {
            for line in inputs {
                match writeln!(stdin, "{line}") {
                    Ok(()) => {}
                    // The child may exit before consuming all input, e.g. an
                    // invalid board is rejected before any move is read.
                    Err(e) if e.kind() == io::ErrorKind::BrokenPipe => break,
                    Err(e) => {
                        reap(&mut child);
                        drain(stdout_reader);
                        drain(stderr_reader);
                        return Err(DriverError::StdinFailed(e));
                    }
                }
            }
            // Dropping the handle closes the pipe.
        }

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        reap(&mut child);
                        // Partial output is discarded: the timeout itself is
                        // the failure, not whatever the child printed so far.
                        drain(stdout_reader);
                        drain(stderr_reader);
                        return Err(DriverError::Timeout {
                            program: self.program.display().to_string(),
                            timeout_ms: self.timeout.as_millis() as u64,
                        });
                    }
                    thread::sleep(Duration::from_millis(POLL_INTERVAL_MS));
                }
                Err(e) => {
                    reap(&mut child);
                    drain(stdout_reader);
                    drain(stderr_reader);
                    return Err(DriverError::CaptureFailed(e));
                }
            }
        };

        let stdout = collect(stdout_reader, "stdout")?;
        let stderr = collect(stderr_reader, "stderr")?;

        let status = match status.code() {
            Some(code) => ExitReason::Exited(code),
            None => {
                use std::os::unix::process::ExitStatusExt;
                ExitReason::Signaled(status.signal().unwrap_or(0))
            }
        };

        Ok(ExecutionResult {
            status,
            stdout,
            stderr,
        })
    }
}

type Reader = Option<JoinHandle<io::Result<Vec<u8>>>>;

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Reader {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf)?;
            Ok(buf)
        })
    })
}

fn collect(reader: Reader, stream: &str) -> Result<String, DriverError> {
    let Some(handle) = reader else {
        return Ok(String::new());
    };
    let bytes = handle
        .join()
        .map_err(|_| {
            DriverError::CaptureFailed(io::Error::other(format!("{stream} reader panicked")))
        })?
        .map_err(DriverError::CaptureFailed)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn drain(reader: Reader) {
    if let Some(handle) = reader {
        let _ = handle.join();
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
