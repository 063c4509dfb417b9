//! Terminal UI.

use console::{Style, Term};
use std::io::Write;

use super::{OutputMode, UserInterface};

/// Whether to emit ANSI colors on stdout.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    Term::stdout().is_term()
}

/// Terminal UI writing to stdout, errors to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    mode: OutputMode,
    success: Style,
    warning: Style,
    error: Style,
    header: Style,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        let colors = should_use_colors();
        let style = |s: Style| if colors { s } else { Style::new() };
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            mode,
            success: style(Style::new().green()),
            warning: style(Style::new().yellow()),
            error: style(Style::new().red().bold()),
            header: style(Style::new().cyan().bold()),
        }
    }
}

/// Create the UI for the given output mode.
pub fn create_ui(mode: OutputMode) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode))
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.success.apply_to(format!("✓ {}", msg))).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.warning.apply_to(format!("⚠ {}", msg))).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.error.apply_to(format!("✗ {}", msg))).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.out, "\n{}\n", self.header.apply_to(title)).ok();
        }
    }
}
