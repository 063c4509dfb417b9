//! Shared configuration and context setup for commands.

use std::path::{Path, PathBuf};

use crate::config::{load_config, validate, DephandConfig};
use crate::declare::init;
use crate::deps::Identifier;
use crate::error::{DephandError, Result};
use crate::printer::{self, ConsolePrinter, FilePrinter, Printer};
use crate::shell::is_ci;
use crate::ui::{OutputMode, UserInterface};
use crate::Context;

/// Where a command finds its configuration and interpreter.
#[derive(Debug, Clone)]
pub struct ProjectSetup {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    python: Option<PathBuf>,
}

impl ProjectSetup {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            config_override: None,
            python: None,
        }
    }

    /// Load exactly this file instead of discovering and merging.
    pub fn with_config(mut self, path: Option<PathBuf>) -> Self {
        self.config_override = path;
        self
    }

    /// Use this interpreter whatever the config says.
    pub fn with_python(mut self, python: Option<PathBuf>) -> Self {
        self.python = python;
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Load, override and validate the configuration.
    pub fn load_config(&self) -> Result<DephandConfig> {
        let mut config = load_config(&self.project_root, self.config_override.as_deref())?;
        if let Some(python) = &self.python {
            config.python = python.clone();
        }
        validate(&config)?;
        tracing::debug!(
            "Loaded config: python {}, {} dependencies",
            config.python.display(),
            config.dependencies.len()
        );
        Ok(config)
    }

    /// Like [`load_config`](Self::load_config), but a missing config is
    /// reported on `ui` and returned as `None`.
    pub fn load_or_report(&self, ui: &mut dyn UserInterface) -> Result<Option<DephandConfig>> {
        match self.load_config() {
            Ok(config) => Ok(Some(config)),
            Err(DephandError::ConfigNotFound { path }) => {
                ui.error(&format!(
                    "No configuration found at {}. Create it with a 'dependencies:' list.",
                    path.display()
                ));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// The file printer's report path: `report_file` from the config, or
    /// `.dephandler/pip_report.txt`, under the project root.
    pub fn report_path(&self, config: &DephandConfig) -> PathBuf {
        match &config.report_file {
            Some(path) => self.project_root.join(path),
            None => self.project_root.join(".dephandler").join("pip_report.txt"),
        }
    }

    /// The configured printers for this output mode.
    pub fn printers(
        &self,
        config: &DephandConfig,
        mode: OutputMode,
    ) -> Result<Vec<Box<dyn Printer>>> {
        build_printers(
            &config.printers,
            mode,
            config.title.as_deref(),
            &self.report_path(config),
        )
    }

    /// A context with every configured dependency (plus `extra`) declared.
    pub fn context(
        &self,
        config: &DephandConfig,
        printers: Vec<Box<dyn Printer>>,
        extra: &[Identifier],
    ) -> Result<Context> {
        let mut ctx = Context::from_config(config);
        let identifiers = config.dependencies.iter().chain(extra).cloned();
        init(&mut ctx, identifiers, None, printers, false)?;
        Ok(ctx)
    }
}

/// Resolve configured printer names for the given output mode.
///
/// Quiet drops the terminal sinks. Verbose, and CI where a spinner cannot
/// redraw, show the console printer in place of the spinner.
pub fn build_printers(
    names: &[String],
    mode: OutputMode,
    title: Option<&str>,
    report: &Path,
) -> Result<Vec<Box<dyn Printer>>> {
    let mut printers: Vec<Box<dyn Printer>> = Vec::new();
    let mut console = false;
    for name in names {
        let name = match name.as_str() {
            "console" | "spinner" if mode == OutputMode::Quiet => continue,
            "spinner" if mode.shows_command_output() || is_ci() => "console",
            other => other,
        };
        if name == "console" {
            if console {
                continue;
            }
            console = true;
            let mut printer = ConsolePrinter::stdout();
            if let Some(title) = title {
                printer = printer.with_title(title);
            }
            printers.push(Box::new(printer));
        } else if name == "file" {
            printers.push(Box::new(FilePrinter::new(report)));
        } else {
            printers.push(printer::from_name(name)?);
        }
    }
    Ok(printers)
}
