//! Recording printer for testing.
//!
//! `RecordingPrinter` captures every call it receives. Clones share the
//! capture, so a test keeps one handle and registers another.
//!
//! # Example
//!
//! ```
//! use dephandler::printer::{Printer, PrinterEvent, RecordingPrinter};
//!
//! let recorder = RecordingPrinter::new("test");
//! let mut sink = recorder.clone();
//! sink.prepare().unwrap();
//! sink.log("Collecting numpy").unwrap();
//! sink.finish().unwrap();
//!
//! assert_eq!(recorder.lines(), vec!["Collecting numpy"]);
//! assert_eq!(recorder.events().last(), Some(&PrinterEvent::Finish));
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;

use super::Printer;

/// One captured printer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterEvent {
    Prepare,
    Log(String),
    Finish,
}

#[derive(Debug, Clone)]
pub struct RecordingPrinter {
    name: String,
    events: Arc<Mutex<Vec<PrinterEvent>>>,
    failing: bool,
}

impl RecordingPrinter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            events: Arc::default(),
            failing: false,
        }
    }

    /// Every call returns an error without recording anything.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PrinterEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn events(&self) -> Vec<PrinterEvent> {
        self.lock().clone()
    }

    /// Logged lines only, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                PrinterEvent::Log(line) => Some(line.clone()),
                _ => None,
            })
            .collect()
    }

    /// Check if any logged line contains `needle`.
    pub fn has_line(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }

    pub fn count(&self, event: &PrinterEvent) -> usize {
        self.lock().iter().filter(|e| *e == event).count()
    }

    fn record(&self, event: PrinterEvent) -> Result<()> {
        if self.failing {
            return Err(anyhow::anyhow!("{} sink is broken", self.name).into());
        }
        self.lock().push(event);
        Ok(())
    }
}

impl Printer for RecordingPrinter {
    fn name(&self) -> &str {
        &self.name
    }

    fn prepare(&mut self) -> Result<()> {
        self.record(PrinterEvent::Prepare)
    }

    fn log(&mut self, message: &str) -> Result<()> {
        self.record(PrinterEvent::Log(message.to_string()))
    }

    fn finish(&mut self) -> Result<()> {
        self.record(PrinterEvent::Finish)
    }
}
