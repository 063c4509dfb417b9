//! Report file printer.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::Printer;

/// Report file used when no path is configured, relative to the working
/// directory.
pub const DEFAULT_REPORT_FILE: &str = "dephandler_pip_report.txt";

/// Writes every line of a run to a file. Each run replaces the previous
/// run's report.
#[derive(Debug, Clone)]
pub struct FilePrinter {
    path: PathBuf,
}

impl Default for FilePrinter {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_FILE)
    }
}

impl FilePrinter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Printer for FilePrinter {
    fn name(&self) -> &str {
        "file"
    }

    fn prepare(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::File::create(&self.path)?;
        tracing::debug!("Writing install report to {}", self.path.display());
        Ok(())
    }

    fn log(&mut self, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", message)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}
