//! Mock importer for testing.
//!
//! `MockImporter` keeps an in-memory table of "installed" modules. Clones
//! share the table, so a test can flip entries from inside a
//! [`MockResponse::then`](crate::shell::MockResponse::then) side effect to
//! simulate an install landing.
//!
//! # Example
//!
//! ```
//! use dephandler::deps::{Importer, MockImporter};
//!
//! let importer = MockImporter::new();
//! importer.install("PIL", "9.2.0");
//! importer.add_submodule("PIL", "Image");
//!
//! assert_eq!(importer.import("PIL", "Pillow").unwrap().version.as_deref(), Some("9.2.0"));
//! assert!(importer.import("numpy", "numpy").is_err());
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{DephandError, Result};

use super::importer::Importer;
use super::namespace::ModuleHandle;

#[derive(Debug, Default)]
struct MockModules {
    versions: BTreeMap<String, Option<String>>,
    submodules: BTreeMap<String, BTreeSet<String>>,
    imports: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MockImporter {
    modules: Arc<Mutex<MockModules>>,
}

impl MockImporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockModules> {
        self.modules.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make `name` importable at `version`.
    pub fn install(&self, name: &str, version: &str) {
        self.lock()
            .versions
            .insert(name.to_string(), Some(version.to_string()));
    }

    /// Make `name` importable without a reported version.
    pub fn install_unversioned(&self, name: &str) {
        self.lock().versions.insert(name.to_string(), None);
    }

    pub fn uninstall(&self, name: &str) {
        self.lock().versions.remove(name);
    }

    pub fn add_submodule(&self, parent: &str, submodule: &str) {
        self.lock()
            .submodules
            .entry(parent.to_string())
            .or_default()
            .insert(submodule.to_string());
    }

    /// Names passed to `import`, in call order.
    pub fn imports(&self) -> Vec<String> {
        self.lock().imports.clone()
    }
}

impl Importer for MockImporter {
    fn import(&self, name: &str, _dist: &str) -> Result<ModuleHandle> {
        let mut modules = self.lock();
        modules.imports.push(name.to_string());
        match modules.versions.get(name) {
            Some(version) => Ok(ModuleHandle {
                name: name.to_string(),
                version: version.clone(),
                location: Some(format!("/mock/site-packages/{}/__init__.py", name).into()),
            }),
            None => Err(DephandError::ImportFailed {
                module: name.to_string(),
                message: format!("No module named '{}'", name),
            }),
        }
    }

    fn import_submodule(&self, parent: &ModuleHandle, submodule: &str) -> Result<ModuleHandle> {
        let modules = self.lock();
        let known = modules
            .submodules
            .get(&parent.name)
            .is_some_and(|subs| subs.contains(submodule));
        if known {
            Ok(ModuleHandle::new(format!("{}.{}", parent.name, submodule)))
        } else {
            Err(DephandError::ImportFailed {
                module: format!("{}.{}", parent.name, submodule),
                message: format!("cannot import name '{}'", submodule),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_then_uninstall() {
        let importer = MockImporter::new();
        importer.install("alpha", "1.0");
        assert!(importer.import("alpha", "alpha-pkg").is_ok());

        importer.uninstall("alpha");
        assert!(importer.import("alpha", "alpha-pkg").is_err());
        assert_eq!(importer.imports(), vec!["alpha", "alpha"]);
    }

    #[test]
    fn submodules_resolve_only_when_registered() {
        let importer = MockImporter::new();
        importer.install("PIL", "9.2.0");
        importer.add_submodule("PIL", "Image");
        let parent = importer.import("PIL", "Pillow").unwrap();

        assert_eq!(
            importer.import_submodule(&parent, "Image").unwrap().name,
            "PIL.Image"
        );
        assert!(importer.import_submodule(&parent, "ImageCms").is_err());
    }
}
