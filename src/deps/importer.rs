//! Module import probing.
//!
//! An [`Importer`] answers "is this module usable, and which version is it".
//! [`PythonImporter`] asks the configured interpreter; tests use
//! [`MockImporter`](super::mock::MockImporter).

use std::path::{Path, PathBuf};

use crate::error::{DephandError, Result};
use crate::shell::{CommandRunner, SystemRunner};

use super::namespace::ModuleHandle;

/// Pure import attempts: no network access, no installation.
pub trait Importer: Send {
    /// Import `name`; `dist` is the package-manager name used for version
    /// metadata when the module does not report one itself.
    fn import(&self, name: &str, dist: &str) -> Result<ModuleHandle>;

    /// Resolve `submodule` relative to an already imported `parent`.
    fn import_submodule(&self, parent: &ModuleHandle, submodule: &str) -> Result<ModuleHandle>;
}

const IMPORT_SCRIPT: &str = r#"import importlib, sys
name, dist = sys.argv[1], sys.argv[2]
m = importlib.import_module(name)
v = getattr(m, "__version__", None)
if not isinstance(v, str):
    try:
        from importlib import metadata
        v = metadata.version(dist)
    except Exception:
        v = ""
print(v)
print(getattr(m, "__file__", None) or "")
"#;

const SUBMODULE_SCRIPT: &str = r#"import importlib, sys
parent, sub = sys.argv[1], sys.argv[2]
try:
    m = importlib.import_module(parent + "." + sub)
except ImportError:
    m = getattr(importlib.import_module(parent), sub)
v = getattr(m, "__version__", None)
print(v if isinstance(v, str) else "")
print(getattr(m, "__file__", None) or "")
"#;

/// Imports modules by running the interpreter in a child process.
pub struct PythonImporter {
    python: PathBuf,
    runner: Box<dyn CommandRunner>,
}

impl PythonImporter {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self::with_runner(python, Box::new(SystemRunner::new()))
    }

    pub fn with_runner(python: impl Into<PathBuf>, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            python: python.into(),
            runner,
        }
    }

    pub fn python(&self) -> &Path {
        &self.python
    }

    fn query(&self, script: &str, module: &str, arg: &str) -> Result<ModuleHandle> {
        let args = vec![
            "-c".to_string(),
            script.to_string(),
            module.to_string(),
            arg.to_string(),
        ];
        let result = self.runner.run(&self.python, &args)?;
        if !result.success {
            let reason = result
                .stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("import failed")
                .trim()
                .to_string();
            tracing::debug!("Import of {} failed: {}", module, reason);
            return Err(DephandError::ImportFailed {
                module: module.to_string(),
                message: reason,
            });
        }
        Ok(parse_query_output(module, &result.stdout))
    }
}

impl Importer for PythonImporter {
    fn import(&self, name: &str, dist: &str) -> Result<ModuleHandle> {
        self.query(IMPORT_SCRIPT, name, dist)
    }

    fn import_submodule(&self, parent: &ModuleHandle, submodule: &str) -> Result<ModuleHandle> {
        let mut handle = self.query(SUBMODULE_SCRIPT, &parent.name, submodule)?;
        handle.name = format!("{}.{}", parent.name, submodule);
        Ok(handle)
    }
}

/// Two lines: version (possibly empty), then file location (possibly empty).
fn parse_query_output(module: &str, stdout: &str) -> ModuleHandle {
    let mut lines = stdout.lines().map(str::trim);
    let non_empty = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(String::from);
    ModuleHandle {
        name: module.to_string(),
        version: non_empty(lines.next()),
        location: non_empty(lines.next()).map(PathBuf::from),
    }
}
