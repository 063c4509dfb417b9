//! Mock command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without spawning processes. It
//! records every invocation and answers with scripted output chosen by the
//! first rule whose needle appears in the rendered command line. Unmatched
//! commands succeed silently.
//!
//! # Example
//!
//! ```
//! use dephandler::shell::{CommandRunner, MockResponse, MockRunner};
//! use std::path::Path;
//!
//! let runner = MockRunner::new();
//! runner.respond("Pillow", MockResponse::ok(&["Successfully installed Pillow-9.2.0"]));
//!
//! let args = vec!["-m".to_string(), "pip".to_string(), "install".to_string(), "Pillow".to_string()];
//! let result = runner.run(Path::new("python3"), &args).unwrap();
//! assert!(result.success);
//! assert_eq!(runner.call_count(), 1);
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{DephandError, Result};

use super::command::{display_command, CommandRunner, CommandStream, OutputLine};

/// Scripted answer for a matching command.
#[derive(Clone)]
pub struct MockResponse {
    lines: Vec<OutputLine>,
    exit_code: i32,
    spawn_error: bool,
    on_run: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl std::fmt::Debug for MockResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockResponse")
            .field("lines", &self.lines)
            .field("exit_code", &self.exit_code)
            .field("spawn_error", &self.spawn_error)
            .finish()
    }
}

impl MockResponse {
    /// Exit 0 with the given stdout lines.
    pub fn ok(lines: &[&str]) -> Self {
        Self::with_exit(0, lines)
    }

    /// Exit 1 with the given stderr lines.
    pub fn fail(lines: &[&str]) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|l| OutputLine::Stderr(l.to_string()))
                .collect(),
            exit_code: 1,
            spawn_error: false,
            on_run: None,
        }
    }

    /// Exit with `code` and the given stdout lines.
    pub fn with_exit(code: i32, lines: &[&str]) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|l| OutputLine::Stdout(l.to_string()))
                .collect(),
            exit_code: code,
            spawn_error: false,
            on_run: None,
        }
    }

    /// The program cannot be started at all.
    pub fn spawn_error() -> Self {
        Self {
            lines: Vec::new(),
            exit_code: -1,
            spawn_error: true,
            on_run: None,
        }
    }

    /// Run a side effect when the command is spawned, e.g. flipping a
    /// [`MockImporter`](crate::deps::MockImporter) entry to simulate an install.
    pub fn then(mut self, effect: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_run = Some(Arc::new(effect));
        self
    }
}

#[derive(Default)]
struct MockState {
    rules: Vec<(String, MockResponse)>,
    calls: Vec<String>,
}

/// Scripted [`CommandRunner`]. Clones share state, so a test can keep a
/// handle after moving the runner into a context.
#[derive(Clone, Default)]
pub struct MockRunner {
    state: Arc<Mutex<MockState>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Answer commands containing `needle` with `response`.
    ///
    /// Rules are tried in registration order.
    pub fn respond(&self, needle: &str, response: MockResponse) {
        self.lock().rules.push((needle.to_string(), response));
    }

    /// Every command line spawned so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Check whether any spawned command contains `needle`.
    pub fn was_called_with(&self, needle: &str) -> bool {
        self.lock().calls.iter().any(|c| c.contains(needle))
    }
}

impl CommandRunner for MockRunner {
    fn spawn(&self, program: &Path, args: &[String]) -> Result<CommandStream> {
        let command = display_command(program, args);
        let response = {
            let mut state = self.lock();
            state.calls.push(command.clone());
            state
                .rules
                .iter()
                .find(|(needle, _)| command.contains(needle.as_str()))
                .map(|(_, r)| r.clone())
        };

        let Some(response) = response else {
            return Ok(CommandStream::scripted(command, Vec::new(), 0));
        };

        if let Some(effect) = &response.on_run {
            effect();
        }
        if response.spawn_error {
            return Err(DephandError::CommandFailed {
                command,
                code: None,
            });
        }
        Ok(CommandStream::scripted(
            command,
            response.lines,
            response.exit_code,
        ))
    }
}
