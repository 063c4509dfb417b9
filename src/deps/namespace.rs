//! Loaded modules and the host namespace they are exposed into.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// A successfully imported module as reported by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleHandle {
    /// Fully qualified module name (`PIL.Image` for a submodule).
    pub name: String,
    /// Version reported by the module or its distribution metadata.
    pub version: Option<String>,
    /// File the module was loaded from, when it has one.
    pub location: Option<PathBuf>,
}

impl ModuleHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            location: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Last dotted component, the name a submodule is exposed under.
    pub fn bare_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<module '{}'", self.name)?;
        if let Some(version) = &self.version {
            write!(f, " {}", version)?;
        }
        if let Some(location) = &self.location {
            write!(f, " from '{}'", location.display())?;
        }
        write!(f, ">")
    }
}

/// Caller-supplied map of exposed modules.
///
/// Clones share the same map, so the host keeps one handle while the context
/// (possibly on a worker thread) writes through another.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    entries: Arc<Mutex<BTreeMap<String, ModuleHandle>>>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, ModuleHandle>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Bind `handle` under `name`, replacing any previous binding.
    pub fn expose(&self, name: &str, handle: ModuleHandle) {
        tracing::debug!("Exposing {} as '{}'", handle.name, name);
        self.lock().insert(name.to_string(), handle);
    }

    pub fn get(&self, name: &str) -> Option<ModuleHandle> {
        self.lock().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Exposed names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
