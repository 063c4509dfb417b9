//! Spinner printer.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::error::Result;

use super::Printer;

/// Longest line shown next to the spinner.
const MAX_MESSAGE_WIDTH: usize = 96;

/// Shows a single spinner whose message tracks the latest output line.
pub struct SpinnerPrinter {
    bar: Option<ProgressBar>,
    hidden: bool,
    last_line: String,
    lines_seen: usize,
}

impl Default for SpinnerPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpinnerPrinter {
    pub fn new() -> Self {
        Self {
            bar: None,
            hidden: false,
            last_line: String::new(),
            lines_seen: 0,
        }
    }

    /// A spinner that never draws (for tests and non-TTY output).
    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::new()
        }
    }

    pub fn last_line(&self) -> &str {
        &self.last_line
    }

    pub fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    fn make_bar(&self) -> Result<ProgressBar> {
        if self.hidden {
            return Ok(ProgressBar::hidden());
        }
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.magenta} {msg}")
            .map_err(anyhow::Error::from)?;
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Ok(bar)
    }
}

fn truncate(line: &str) -> String {
    if line.chars().count() <= MAX_MESSAGE_WIDTH {
        line.to_string()
    } else {
        let mut cut: String = line.chars().take(MAX_MESSAGE_WIDTH - 1).collect();
        cut.push('…');
        cut
    }
}

impl Printer for SpinnerPrinter {
    fn name(&self) -> &str {
        "spinner"
    }

    fn prepare(&mut self) -> Result<()> {
        if let Some(old) = self.bar.take() {
            old.finish_and_clear();
        }
        self.last_line.clear();
        self.lines_seen = 0;
        let bar = self.make_bar()?;
        bar.set_message("Preparing...");
        self.bar = Some(bar);
        Ok(())
    }

    fn log(&mut self, message: &str) -> Result<()> {
        self.lines_seen += 1;
        self.last_line = message.to_string();
        if let Some(bar) = &self.bar {
            bar.set_message(truncate(message));
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(truncate(&self.last_line));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_last_line_across_a_run() {
        let mut spinner = SpinnerPrinter::hidden();
        spinner.prepare().unwrap();
        spinner.log("Collecting numpy").unwrap();
        spinner.log("Successfully installed numpy-1.26.0").unwrap();
        spinner.finish().unwrap();

        assert_eq!(spinner.last_line(), "Successfully installed numpy-1.26.0");
        assert_eq!(spinner.lines_seen(), 2);
    }

    #[test]
    fn prepare_resets_state() {
        let mut spinner = SpinnerPrinter::hidden();
        spinner.log("stale").unwrap();
        spinner.prepare().unwrap();
        assert_eq!(spinner.lines_seen(), 0);
        assert!(spinner.last_line().is_empty());
    }

    #[test]
    fn long_lines_are_truncated() {
        let line = "x".repeat(200);
        let cut = truncate(&line);
        assert_eq!(cut.chars().count(), MAX_MESSAGE_WIDTH);
        assert!(cut.ends_with('…'));
    }
}
