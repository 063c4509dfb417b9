//! Terminal printer.

use console::{Style, Term};
use std::io::Write;

use crate::error::Result;

use super::Printer;

/// How a pip output line should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Error,
    Warning,
    Success,
    Plain,
}

/// Classify a line by pip's conventional prefixes.
pub fn classify(line: &str) -> LineKind {
    let trimmed = line.trim_start();
    if trimmed.starts_with("ERROR") || trimmed.starts_with("Failed") {
        LineKind::Error
    } else if trimmed.starts_with("WARNING") || trimmed.starts_with("[notice]") {
        LineKind::Warning
    } else if trimmed.starts_with("Successfully") || trimmed.starts_with("Requirement already satisfied") {
        LineKind::Success
    } else {
        LineKind::Plain
    }
}

/// Writes every line to the terminal, colouring pip's errors, warnings and
/// success messages.
pub struct ConsolePrinter {
    term: Term,
    title: Option<String>,
    error: Style,
    warning: Style,
    success: Style,
    header: Style,
}

impl ConsolePrinter {
    pub fn new(term: Term) -> Self {
        Self {
            term,
            title: None,
            error: Style::new().red().bold(),
            warning: Style::new().color256(208),
            success: Style::new().green(),
            header: Style::new().bold().magenta(),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Term::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(Term::stderr())
    }

    /// Print `title` as a header when a run starts.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn style(&self, kind: LineKind) -> Option<&Style> {
        match kind {
            LineKind::Error => Some(&self.error),
            LineKind::Warning => Some(&self.warning),
            LineKind::Success => Some(&self.success),
            LineKind::Plain => None,
        }
    }
}

impl Printer for ConsolePrinter {
    fn name(&self) -> &str {
        "console"
    }

    fn prepare(&mut self) -> Result<()> {
        if let Some(title) = &self.title {
            writeln!(self.term, "{}", self.header.apply_to(title))?;
        }
        Ok(())
    }

    fn log(&mut self, message: &str) -> Result<()> {
        let style = self.style(classify(message)).cloned();
        match style {
            Some(style) => writeln!(self.term, "{}", style.apply_to(message))?,
            None => writeln!(self.term, "{}", message)?,
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.term.flush()?;
        Ok(())
    }
}
