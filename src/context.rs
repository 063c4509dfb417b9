//! The provisioning context.
//!
//! A [`Context`] owns everything one host session needs: the dependency
//! registry, the namespace imported modules are exposed into, the registered
//! printers, and the collaborators that import modules and run pip. Every
//! operation takes the context explicitly; there is no process-wide state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::DephandConfig;
use crate::deps::{
    Dependency, DependencyView, ImportOutcome, Importer, Namespace, PythonImporter, Registry,
};
use crate::error::{DephandError, Result};
use crate::pip::{parse_available_versions, PackageManager};
use crate::printer::{Printer, Printers};
use crate::shell::{CommandRunner, SystemRunner};

/// Aggregate flags readable from any thread, even while a worker holds the
/// context for a run.
#[derive(Debug, Default)]
pub struct SharedFlags {
    dependencies_imported: AtomicBool,
    restart_needed: AtomicBool,
}

impl SharedFlags {
    /// Every registered dependency is imported, as of the last verification.
    pub fn dependencies_imported(&self) -> bool {
        self.dependencies_imported.load(Ordering::SeqCst)
    }

    /// A dependency was replaced while its old version was loaded. Never clears.
    pub fn restart_needed(&self) -> bool {
        self.restart_needed.load(Ordering::SeqCst)
    }
}

pub struct Context {
    pub(crate) registry: Registry,
    pub(crate) namespace: Namespace,
    pub(crate) printers: Printers,
    pub(crate) importer: Box<dyn Importer>,
    pub(crate) runner: Box<dyn CommandRunner>,
    pub(crate) package_manager: PackageManager,
    pub(crate) bootstrapped: bool,
    flags: Arc<SharedFlags>,
}

impl Context {
    pub fn new(
        package_manager: PackageManager,
        importer: Box<dyn Importer>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        let flags = Arc::new(SharedFlags::default());
        flags.dependencies_imported.store(true, Ordering::SeqCst);
        Self {
            registry: Registry::new(),
            namespace: Namespace::new(),
            printers: Printers::new(),
            importer,
            runner,
            package_manager,
            bootstrapped: false,
            flags,
        }
    }

    /// A context that runs the configured interpreter for real.
    ///
    /// Printers and dependencies are not registered here; see
    /// [`init`](crate::init).
    pub fn from_config(config: &DephandConfig) -> Self {
        let package_manager = PackageManager::new(&config.python)
            .with_user_install(config.user_install)
            .with_upgrade_pip(config.upgrade_pip);
        Self::new(
            package_manager,
            Box::new(PythonImporter::new(&config.python)),
            Box::new(SystemRunner::new()),
        )
    }

    /// Expose imported modules into `namespace` from now on.
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    pub(crate) fn set_namespace(&mut self, namespace: Namespace) {
        self.namespace = namespace;
    }

    pub fn add_printer(&mut self, printer: Box<dyn Printer>) {
        self.printers.add(printer);
    }

    pub fn printer_names(&self) -> Vec<String> {
        self.printers.names()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn package_manager(&self) -> &PackageManager {
        &self.package_manager
    }

    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.registry.get(name)
    }

    /// Snapshots of every dependency in declaration order.
    pub fn dependencies(&self) -> Vec<DependencyView> {
        self.registry.all().iter().map(Dependency::view).collect()
    }

    /// Every registered dependency is imported, as of the last verification.
    pub fn dependencies_imported(&self) -> bool {
        self.flags.dependencies_imported()
    }

    /// The sticky restart flag, or some dependency is installed on disk but
    /// not imported in this process.
    pub fn is_restart_needed(&self) -> bool {
        self.flags.restart_needed() || self.registry.any_installed_but_not_imported()
    }

    /// Handle for reading the aggregate flags from other threads.
    pub fn flags(&self) -> Arc<SharedFlags> {
        Arc::clone(&self.flags)
    }

    pub(crate) fn restart_flag(&self) -> bool {
        self.flags.restart_needed()
    }

    pub(crate) fn set_restart_needed(&self) {
        if !self.flags.restart_needed.swap(true, Ordering::SeqCst) {
            tracing::info!("Restart needed to pick up replaced modules");
        }
    }

    /// Recompute `dependencies_imported` from the registry.
    pub(crate) fn refresh_aggregate(&self) -> bool {
        let all = self.registry.all_imported();
        self.flags.dependencies_imported.store(all, Ordering::SeqCst);
        all
    }

    /// Pure import of the dependency at `index`, exposing it on success.
    ///
    /// Only a submodule that fails to resolve is an error.
    pub(crate) fn attempt_import(&mut self, index: usize) -> Result<ImportOutcome> {
        let dep = self.registry.at(index);
        let result = self.importer.import(dep.name(), dep.pip_name());
        let outcome = self.registry.at_mut(index).record_import(result);
        if outcome == ImportOutcome::Imported {
            self.expose(index)?;
        }
        Ok(outcome)
    }

    /// Bind the module and each requested submodule into the namespace.
    pub(crate) fn expose(&self, index: usize) -> Result<()> {
        let dep = self.registry.at(index);
        let Some(module) = dep.module() else {
            return Ok(());
        };
        self.namespace.expose(dep.name(), module.clone());
        self.expose_submodules(index, dep.submodules())
    }

    pub(crate) fn expose_submodules(&self, index: usize, submodules: &[String]) -> Result<()> {
        let dep = self.registry.at(index);
        let Some(module) = dep.module() else {
            return Ok(());
        };
        for sub in submodules {
            let handle = self.importer.import_submodule(module, sub).map_err(|e| {
                tracing::error!("Submodule {}.{} unresolved: {}", dep.name(), sub, e);
                DephandError::SubmoduleNotFound {
                    module: dep.name().to_string(),
                    submodule: sub.clone(),
                }
            })?;
            self.namespace.expose(sub, handle);
        }
        Ok(())
    }

    /// Published versions of a declared dependency, newest first.
    ///
    /// Best effort: pip is asked for a version that cannot exist and the
    /// candidates are scraped from its error message. An unrecognised message
    /// yields an empty list.
    pub fn list_available_versions(&self, name: &str) -> Result<Vec<String>> {
        let dep = self
            .registry
            .get(name)
            .ok_or_else(|| DephandError::UnknownDependency {
                name: name.to_string(),
            })?;
        let args = self.package_manager.available_versions_args(dep.pip_name());
        let result = self.runner.run(self.package_manager.python(), &args)?;
        let versions = parse_available_versions(&result.combined_output());
        tracing::debug!("{} has {} published versions", dep.pip_name(), versions.len());
        Ok(versions)
    }
}
