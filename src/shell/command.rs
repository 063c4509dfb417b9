//! External command execution.
//!
//! Every package-manager call goes through a [`CommandRunner`]. The
//! production [`SystemRunner`] spawns real processes; test code substitutes
//! [`MockRunner`](super::mock::MockRunner). Output is exposed as a
//! [`CommandStream`], an iterator yielding one line at a time so callers can
//! suspend between lines. A stream dropped before [`CommandStream::finish`]
//! kills its process.

use crate::error::{DephandError, Result};
use std::collections::{HashMap, VecDeque};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Stdout followed by stderr, for parsers that scan both streams.
    pub fn combined_output(&self) -> String {
        let mut out = self.stdout.clone();
        out.push_str(&self.stderr);
        out
    }
}

/// Output line from command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    /// The text of the line regardless of which stream produced it.
    pub fn text(&self) -> &str {
        match self {
            OutputLine::Stdout(s) | OutputLine::Stderr(s) => s,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            OutputLine::Stdout(s) | OutputLine::Stderr(s) => s,
        }
    }
}

/// Spawns external commands on behalf of the pipeline.
pub trait CommandRunner: Send {
    /// Start a command and return a stream over its output lines.
    fn spawn(&self, program: &Path, args: &[String]) -> Result<CommandStream>;

    /// Run a command to completion, capturing its output.
    fn run(&self, program: &Path, args: &[String]) -> Result<CommandResult> {
        self.spawn(program, args)?.finish()
    }
}

/// Runs commands as child processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    env: HashMap<String, String>,
}

impl Default for SystemRunner {
    fn default() -> Self {
        let mut env = HashMap::new();
        // Unbuffered so pip progress reaches the pipe line by line.
        env.insert("PYTHONUNBUFFERED".to_string(), "1".to_string());
        env.insert("PIP_NO_INPUT".to_string(), "1".to_string());
        Self { env }
    }
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an environment variable passed to every spawned command.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

impl CommandRunner for SystemRunner {
    fn spawn(&self, program: &Path, args: &[String]) -> Result<CommandStream> {
        let command = display_command(program, args);
        tracing::debug!("Spawning: {}", command);

        let mut cmd = Command::new(program);
        cmd.args(args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            tracing::warn!("Failed to spawn {}: {}", command, e);
            DephandError::CommandFailed {
                command: command.clone(),
                code: None,
            }
        })?;

        let (tx, rx) = mpsc::channel();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_reader(stdout, tx.clone(), true));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_reader(stderr, tx, false));
        }

        Ok(CommandStream {
            command,
            start: Instant::now(),
            source: StreamSource::Process {
                child: ChildGuard::new(child),
                rx,
                readers,
            },
        })
    }
}

fn spawn_reader<R>(pipe: R, tx: Sender<OutputLine>, is_stdout: bool) -> JoinHandle<(bool, String)>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = BufReader::new(pipe);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let line = if is_stdout {
                OutputLine::Stdout(line)
            } else {
                OutputLine::Stderr(line)
            };
            let _ = tx.send(line);
        }
        (is_stdout, output)
    })
}

/// A spawned child that is killed and reaped on drop unless it was waited on.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self {
            child,
            reaped: false,
        }
    }

    fn id(&self) -> u32 {
        self.child.id()
    }

    fn wait(&mut self) -> std::io::Result<ExitStatus> {
        let status = self.child.wait()?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        tracing::debug!("Killing unfinished process {}", self.child.id());
        if let Err(e) = self.child.kill() {
            tracing::debug!("Could not kill process {}: {}", self.child.id(), e);
        }
        let _ = self.child.wait();
    }
}

enum StreamSource {
    Process {
        child: ChildGuard,
        rx: Receiver<OutputLine>,
        readers: Vec<JoinHandle<(bool, String)>>,
    },
    Scripted {
        lines: VecDeque<OutputLine>,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
}

/// Line-by-line output of a running (or scripted) command.
///
/// Iterating yields lines as they arrive; [`CommandStream::finish`] drains
/// whatever is left and waits for the exit status.
pub struct CommandStream {
    command: String,
    start: Instant,
    source: StreamSource,
}

impl CommandStream {
    /// A stream with predetermined output, used by test runners.
    pub fn scripted(command: impl Into<String>, lines: Vec<OutputLine>, exit_code: i32) -> Self {
        let mut stdout = String::new();
        let mut stderr = String::new();
        for line in &lines {
            let buf = match line {
                OutputLine::Stdout(_) => &mut stdout,
                OutputLine::Stderr(_) => &mut stderr,
            };
            buf.push_str(line.text());
            buf.push('\n');
        }
        Self {
            command: command.into(),
            start: Instant::now(),
            source: StreamSource::Scripted {
                lines: lines.into(),
                exit_code,
                stdout,
                stderr,
            },
        }
    }

    /// The command line this stream belongs to.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// OS process id, if this stream runs a real process.
    pub fn pid(&self) -> Option<u32> {
        match &self.source {
            StreamSource::Process { child, .. } => Some(child.id()),
            StreamSource::Scripted { .. } => None,
        }
    }

    /// Drain remaining output and wait for the command to exit.
    pub fn finish(self) -> Result<CommandResult> {
        let duration_from = self.start;
        match self.source {
            StreamSource::Process {
                mut child,
                rx,
                readers,
            } => {
                for _ in rx.iter() {}

                let mut stdout = String::new();
                let mut stderr = String::new();
                for handle in readers {
                    if let Ok((is_stdout, text)) = handle.join() {
                        if is_stdout {
                            stdout = text;
                        } else {
                            stderr = text;
                        }
                    }
                }

                let status = child.wait().map_err(|_| DephandError::CommandFailed {
                    command: self.command.clone(),
                    code: None,
                })?;
                let duration = duration_from.elapsed();
                tracing::debug!("{} exited with {:?}", self.command, status.code());

                if status.success() {
                    Ok(CommandResult::success(stdout, stderr, duration))
                } else {
                    Ok(CommandResult::failure(
                        status.code(),
                        stdout,
                        stderr,
                        duration,
                    ))
                }
            }
            StreamSource::Scripted {
                exit_code,
                stdout,
                stderr,
                ..
            } => {
                let duration = duration_from.elapsed();
                if exit_code == 0 {
                    Ok(CommandResult::success(stdout, stderr, duration))
                } else {
                    Ok(CommandResult::failure(
                        Some(exit_code),
                        stdout,
                        stderr,
                        duration,
                    ))
                }
            }
        }
    }
}

impl Iterator for CommandStream {
    type Item = OutputLine;

    fn next(&mut self) -> Option<OutputLine> {
        match &mut self.source {
            StreamSource::Process { rx, .. } => rx.recv().ok(),
            StreamSource::Scripted { lines, .. } => lines.pop_front(),
        }
    }
}

/// Render a program and its arguments as a single shell-like line.
pub fn display_command(program: &Path, args: &[String]) -> String {
    let mut parts = vec![quote(&program.display().to_string())];
    parts.extend(args.iter().map(|a| quote(a)));
    parts.join(" ")
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains(['<', '>']) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}
