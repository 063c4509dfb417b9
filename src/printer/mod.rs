//! Output sinks for install runs.
//!
//! The pipeline reports progress through the [`Printer`] capability:
//! `prepare` once before a run, `log` for every line, `finish` once after.
//! [`Printers`] broadcasts each call to every registered sink. A failing
//! sink never aborts a run: its error is caught at the call site and
//! reported to the remaining sinks as an ordinary log line.
//!
//! # Sinks
//!
//! - [`ConsolePrinter`] - styled lines on the terminal
//! - [`SpinnerPrinter`] - a single spinner showing the latest line
//! - [`TracingPrinter`] - forwards lines to `tracing`
//! - [`FilePrinter`] - writes each run's lines to a report file
//! - [`RecordingPrinter`] - captures calls for assertions
//! - [`QueuedPrinter`] - defers another sink's calls to the host's main thread

pub mod file;
pub mod queue;
pub mod recording;
pub mod spinner;
pub mod terminal;

pub use file::{FilePrinter, DEFAULT_REPORT_FILE};
pub use queue::{main_thread_queue, QueueReceiver, QueueSender, QueuedPrinter};
pub use recording::{PrinterEvent, RecordingPrinter};
pub use spinner::SpinnerPrinter;
pub use terminal::ConsolePrinter;

use crate::error::{DephandError, Result};

/// An output front-end for install runs.
///
/// Implementations may be called from a worker thread; sinks that must touch
/// main-thread-only state should wrap themselves in a [`QueuedPrinter`].
pub trait Printer: Send {
    /// Short name used when reporting this sink's failures.
    fn name(&self) -> &str;

    /// Called once before a run starts; sinks reset their state here.
    fn prepare(&mut self) -> Result<()>;

    /// Called for every output line of a run.
    fn log(&mut self, message: &str) -> Result<()>;

    /// Called once after a run ends, successful or not.
    fn finish(&mut self) -> Result<()>;
}

/// Forwards lines to `tracing` at info level.
#[derive(Debug, Default)]
pub struct TracingPrinter;

impl Printer for TracingPrinter {
    fn name(&self) -> &str {
        "tracing"
    }

    fn prepare(&mut self) -> Result<()> {
        tracing::info!("Install run starting");
        Ok(())
    }

    fn log(&mut self, message: &str) -> Result<()> {
        tracing::info!("{}", message);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        tracing::info!("Install run finished");
        Ok(())
    }
}

/// Printer names accepted in configuration.
pub const PRINTER_NAMES: &[&str] = &["console", "spinner", "tracing", "file"];

/// Build a sink from its configuration name. `file` writes to
/// [`DEFAULT_REPORT_FILE`].
pub fn from_name(name: &str) -> Result<Box<dyn Printer>> {
    match name {
        "console" => Ok(Box::new(ConsolePrinter::stdout())),
        "spinner" => Ok(Box::new(SpinnerPrinter::new())),
        "tracing" => Ok(Box::new(TracingPrinter)),
        "file" => Ok(Box::new(FilePrinter::default())),
        other => Err(DephandError::InvalidPrinter {
            name: other.to_string(),
            expected: PRINTER_NAMES.join(", "),
        }),
    }
}

/// The set of registered sinks.
#[derive(Default)]
pub struct Printers {
    sinks: Vec<Box<dyn Printer>>,
}

impl Printers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, printer: Box<dyn Printer>) {
        tracing::debug!("Registered printer '{}'", printer.name());
        self.sinks.push(printer);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.sinks.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn prepare(&mut self) {
        self.broadcast("prepare", |p| p.prepare());
    }

    pub fn log(&mut self, message: &str) {
        self.broadcast("log", |p| p.log(message));
    }

    pub fn finish(&mut self) {
        self.broadcast("finish", |p| p.finish());
    }

    fn broadcast<F>(&mut self, method: &str, mut call: F)
    where
        F: FnMut(&mut dyn Printer) -> Result<()>,
    {
        let mut failures = Vec::new();
        for (i, sink) in self.sinks.iter_mut().enumerate() {
            if let Err(e) = call(sink.as_mut()) {
                failures.push((
                    i,
                    format!("Printer '{}' failed in {}: {}", sink.name(), method, e),
                ));
            }
        }

        // Failures are reported once; errors while reporting them are dropped.
        for (failed, message) in failures {
            tracing::warn!("{}", message);
            for (i, sink) in self.sinks.iter_mut().enumerate() {
                if i != failed {
                    let _ = sink.log(&message);
                }
            }
        }
    }
}
