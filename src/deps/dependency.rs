//! The dependency entity.
//!
//! A [`Dependency`] tracks one optional module from declaration through
//! install to exposure. State changes happen only through the owning
//! [`Context`](crate::Context): the initial import when it is declared, and
//! the re-import that follows an install attempt. Nothing re-imports a
//! dependency outside those two points, so a wrong-version dependency stays
//! unimported until it has been reinstalled.

use serde::Serialize;

use crate::error::Result;

use super::identifier::Identifier;
use super::namespace::ModuleHandle;
use super::version::VersionRange;

/// How a pure import attempt turned out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Imported and within the declared range.
    Imported,
    /// Imported, but the version lies outside the declared range.
    WrongVersion { found: String },
    /// The import itself failed.
    Failed { reason: String },
}

/// One declared optional module.
#[derive(Debug, Clone)]
pub struct Dependency {
    name: String,
    pip_name: String,
    version_range: VersionRange,
    imported: bool,
    installed: bool,
    wrong_version: bool,
    module: Option<ModuleHandle>,
    submodules: Vec<String>,
}

impl Dependency {
    pub(crate) fn new(id: &Identifier) -> Self {
        Self {
            name: id.name.clone(),
            pip_name: id.pip_name().to_string(),
            version_range: id.range.clone(),
            imported: false,
            installed: false,
            wrong_version: false,
            module: None,
            submodules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pip_name(&self) -> &str {
        &self.pip_name
    }

    pub fn version_range(&self) -> &VersionRange {
        &self.version_range
    }

    /// Imported and within the declared range.
    pub fn is_imported(&self) -> bool {
        self.imported
    }

    /// Present according to the last import or install, whether or not it is usable.
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Imported, but outside the declared range.
    pub fn is_wrong_version(&self) -> bool {
        self.wrong_version
    }

    /// The loaded module, also kept for wrong-version dependencies so their
    /// version can be reported. Only imported modules are exposed.
    pub fn module(&self) -> Option<&ModuleHandle> {
        self.module.as_ref()
    }

    pub fn version(&self) -> Option<&str> {
        self.module.as_ref().and_then(|m| m.version.as_deref())
    }

    pub fn submodules(&self) -> &[String] {
        &self.submodules
    }

    /// Package requirement handed to the installer, e.g. `Pillow>=9.0,<=9.2`.
    pub fn requirement(&self) -> String {
        format!("{}{}", self.pip_name, self.version_range.constraint())
    }

    /// Record the outcome of a pure import attempt.
    pub(crate) fn record_import(&mut self, result: Result<ModuleHandle>) -> ImportOutcome {
        let handle = match result {
            Ok(handle) => handle,
            Err(e) => {
                self.imported = false;
                return ImportOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        self.installed = true;
        let outcome = match handle.version.as_deref() {
            Some(found) if !self.version_range.contains(found) => ImportOutcome::WrongVersion {
                found: found.to_string(),
            },
            None if !self.version_range.is_unbounded() => {
                tracing::warn!(
                    "{} reports no version; accepting it against {}",
                    self.name,
                    self.version_range
                );
                ImportOutcome::Imported
            }
            _ => ImportOutcome::Imported,
        };

        match &outcome {
            ImportOutcome::Imported => {
                self.imported = true;
                self.wrong_version = false;
            }
            ImportOutcome::WrongVersion { found } => {
                tracing::info!(
                    "{} {} is outside {}",
                    self.name,
                    found,
                    self.version_range
                );
                self.imported = false;
                self.wrong_version = true;
            }
            ImportOutcome::Failed { .. } => {}
        }
        self.module = Some(handle);
        outcome
    }

    /// The installer reported success, even if the module is not importable yet.
    pub(crate) fn mark_installed(&mut self) {
        self.installed = true;
    }

    /// Append submodules not yet requested, returning the newly added ones.
    pub(crate) fn add_submodules(&mut self, names: &[String]) -> Vec<String> {
        let mut added = Vec::new();
        for name in names {
            if !self.submodules.contains(name) {
                self.submodules.push(name.clone());
                added.push(name.clone());
            }
        }
        added
    }

    pub fn view(&self) -> DependencyView {
        DependencyView {
            name: self.name.clone(),
            pip_name: self.pip_name.clone(),
            version: self.version().map(String::from),
            version_range: self.version_range.clone(),
            imported: self.imported,
            installed: self.installed,
            wrong_version: self.wrong_version,
        }
    }
}

/// Read-only snapshot of a dependency for host UIs and `status --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyView {
    pub name: String,
    pub pip_name: String,
    pub version: Option<String>,
    pub version_range: VersionRange,
    pub imported: bool,
    pub installed: bool,
    pub wrong_version: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DephandError;

    fn dep(id: impl Into<Identifier>) -> Dependency {
        Dependency::new(&id.into())
    }

    fn missing(name: &str) -> Result<ModuleHandle> {
        Err(DephandError::ImportFailed {
            module: name.to_string(),
            message: "No module named".to_string(),
        })
    }

    #[test]
    fn pip_name_defaults_to_name() {
        let d = dep("numpy");
        assert_eq!(d.pip_name(), "numpy");
        assert_eq!(d.requirement(), "numpy");
    }

    #[test]
    fn requirement_embeds_constraint() {
        let d = dep(("PIL", "Pillow", VersionRange::new(Some("9.0"), Some("9.2"))));
        assert_eq!(d.requirement(), "Pillow>=9.0,<=9.2");
    }

    #[test]
    fn successful_import_sets_flags() {
        let mut d = dep("alpha");
        let outcome = d.record_import(Ok(ModuleHandle::new("alpha").with_version("1.0")));
        assert_eq!(outcome, ImportOutcome::Imported);
        assert!(d.is_imported());
        assert!(d.is_installed());
        assert!(!d.is_wrong_version());
        assert_eq!(d.version(), Some("1.0"));
    }

    #[test]
    fn out_of_range_import_is_wrong_version() {
        let mut d = dep(("beta", "beta-pkg", VersionRange::at_least("2.0")));
        let outcome = d.record_import(Ok(ModuleHandle::new("beta").with_version("1.0")));
        assert_eq!(
            outcome,
            ImportOutcome::WrongVersion {
                found: "1.0".to_string()
            }
        );
        assert!(!d.is_imported());
        assert!(d.is_installed());
        assert!(d.is_wrong_version());
        assert_eq!(d.version(), Some("1.0"));
    }

    #[test]
    fn unversioned_module_is_accepted() {
        let mut d = dep(("gamma", VersionRange::at_least("1.0")));
        let outcome = d.record_import(Ok(ModuleHandle::new("gamma")));
        assert_eq!(outcome, ImportOutcome::Imported);
        assert!(d.is_imported());
    }

    #[test]
    fn failed_import_leaves_installed_untouched() {
        let mut d = dep("delta");
        assert!(matches!(
            d.record_import(missing("delta")),
            ImportOutcome::Failed { .. }
        ));
        assert!(!d.is_installed());

        d.mark_installed();
        d.record_import(missing("delta"));
        assert!(d.is_installed());
        assert!(!d.is_imported());
    }

    #[test]
    fn add_submodules_keeps_order_and_skips_duplicates() {
        let mut d = dep("PIL");
        let added = d.add_submodules(&["Image".to_string(), "ImageCms".to_string()]);
        assert_eq!(added.len(), 2);
        let added = d.add_submodules(&["ImageCms".to_string(), "ImageOps".to_string()]);
        assert_eq!(added, vec!["ImageOps"]);
        assert_eq!(d.submodules(), ["Image", "ImageCms", "ImageOps"]);
    }

    #[test]
    fn view_serializes() {
        let mut d = dep(("PIL", "Pillow"));
        d.record_import(Ok(ModuleHandle::new("PIL").with_version("9.2.0")));
        let json = serde_json::to_value(d.view()).unwrap();
        assert_eq!(json["pip_name"], "Pillow");
        assert_eq!(json["version"], "9.2.0");
        assert_eq!(json["imported"], true);
    }
}
