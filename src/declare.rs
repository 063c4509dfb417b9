//! Declaring dependencies.
//!
//! Declaration registers a dependency and makes one pure import attempt.
//! Nothing is installed here; see [`Context::install_all`].
//!
//! ```
//! use dephandler::deps::{MockImporter, Namespace};
//! use dephandler::pip::PackageManager;
//! use dephandler::shell::MockRunner;
//! use dephandler::Context;
//!
//! let importer = MockImporter::new();
//! importer.install("PIL", "9.2.0");
//! importer.add_submodule("PIL", "Image");
//!
//! let mut ctx = Context::new(
//!     PackageManager::new("python3"),
//!     Box::new(importer),
//!     Box::new(MockRunner::new()),
//! );
//! ctx.declare(("PIL", "Pillow")).unwrap().import(&["Image"]).unwrap();
//!
//! assert!(ctx.namespace().contains("PIL"));
//! assert!(ctx.namespace().contains("Image"));
//! ```

use crate::context::Context;
use crate::deps::{DependencyView, Identifier, Namespace};
use crate::error::Result;
use crate::printer::{ConsolePrinter, Printer};

/// A declared dependency, borrowed from its context for fluent submodule
/// requests.
pub struct DependencyHandle<'a> {
    ctx: &'a mut Context,
    index: usize,
}

impl DependencyHandle<'_> {
    pub fn name(&self) -> &str {
        self.ctx.registry.at(self.index).name()
    }

    /// Imported and within the declared range.
    pub fn imported(&self) -> bool {
        self.ctx.registry.at(self.index).is_imported()
    }

    pub fn view(&self) -> DependencyView {
        self.ctx.registry.at(self.index).view()
    }

    /// Request submodules to be exposed alongside the module.
    ///
    /// When the module is already imported the submodules are exposed now,
    /// otherwise after a later successful install. A submodule that does not
    /// resolve is [`SubmoduleNotFound`](crate::DephandError::SubmoduleNotFound).
    pub fn import<S: AsRef<str>>(mut self, submodules: &[S]) -> Result<Self> {
        let names: Vec<String> = submodules.iter().map(|s| s.as_ref().to_string()).collect();
        let added = self.ctx.registry.at_mut(self.index).add_submodules(&names);
        if self.imported() && !added.is_empty() {
            self.ctx.expose_submodules(self.index, &added)?;
        }
        Ok(self)
    }
}

impl Context {
    /// Register a dependency and try to import it.
    ///
    /// Declaring a name twice returns the existing entry unchanged; the new
    /// package name and range are ignored. Submodules listed on the
    /// identifier are requested as with [`DependencyHandle::import`].
    pub fn declare(&mut self, id: impl Into<Identifier>) -> Result<DependencyHandle<'_>> {
        let id = id.into();
        let (index, created) = self.registry.get_or_create(&id);
        if created {
            tracing::debug!("Declared {} as {}", id.name, self.registry.at(index).requirement());
            self.attempt_import(index)?;
            self.refresh_aggregate();
        }
        let handle = DependencyHandle { ctx: self, index };
        if id.submodules.is_empty() {
            Ok(handle)
        } else {
            handle.import(id.submodules.as_slice())
        }
    }

    /// Declare `id` and report whether it is imported.
    pub fn import(&mut self, id: impl Into<Identifier>) -> Result<bool> {
        Ok(self.declare(id)?.imported())
    }
}

/// Set up a context in one call.
///
/// Registers `printers` (plus a console printer when `use_console` is set),
/// switches to `namespace` when given, and declares every identifier.
/// Returns true iff every declared dependency is imported.
pub fn init<I>(
    ctx: &mut Context,
    identifiers: I,
    namespace: Option<Namespace>,
    printers: Vec<Box<dyn Printer>>,
    use_console: bool,
) -> Result<bool>
where
    I: IntoIterator,
    I::Item: Into<Identifier>,
{
    if let Some(namespace) = namespace {
        ctx.set_namespace(namespace);
    }
    for printer in printers {
        ctx.add_printer(printer);
    }
    if use_console {
        ctx.add_printer(Box::new(ConsolePrinter::stdout()));
    }

    for id in identifiers {
        ctx.declare(id)?;
    }

    let all = ctx.refresh_aggregate();
    tracing::info!(
        "{} of {} dependencies imported",
        ctx.registry.all().iter().filter(|d| d.is_imported()).count(),
        ctx.registry.len()
    );
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::{MockImporter, VersionRange};
    use crate::error::DephandError;
    use crate::pip::PackageManager;
    use crate::printer::RecordingPrinter;
    use crate::shell::MockRunner;

    fn context(importer: &MockImporter, runner: &MockRunner) -> Context {
        Context::new(
            PackageManager::new("python3"),
            Box::new(importer.clone()),
            Box::new(runner.clone()),
        )
    }

    #[test]
    fn declare_imports_and_exposes() {
        let importer = MockImporter::new();
        importer.install("numpy", "1.26.0");
        let runner = MockRunner::new();
        let mut ctx = context(&importer, &runner);

        assert!(ctx.import("numpy").unwrap());
        assert!(ctx.namespace().contains("numpy"));
        assert!(ctx.dependencies_imported());
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn declare_missing_module_leaves_it_pending() {
        let mut ctx = context(&MockImporter::new(), &MockRunner::new());

        let handle = ctx.declare(("NEM", "Non_Existing_Module")).unwrap();
        assert!(!handle.imported());
        assert!(!handle.view().installed);
        assert!(!ctx.dependencies_imported());
        assert!(!ctx.namespace().contains("NEM"));
    }

    #[test]
    fn redeclaring_does_not_import_again() {
        let importer = MockImporter::new();
        importer.install("alpha", "1.0");
        let mut ctx = context(&importer, &MockRunner::new());

        ctx.declare("alpha").unwrap();
        ctx.declare(("alpha", VersionRange::at_least("5.0"))).unwrap();

        assert_eq!(importer.imports(), vec!["alpha"]);
        assert!(ctx.dependency("alpha").unwrap().is_imported());
    }

    #[test]
    fn submodules_exposed_when_imported() {
        let importer = MockImporter::new();
        importer.install("PIL", "9.2.0");
        importer.add_submodule("PIL", "Image");
        importer.add_submodule("PIL", "ImageCms");
        let mut ctx = context(&importer, &MockRunner::new());

        ctx.declare(("PIL", "Pillow"))
            .unwrap()
            .import(&["Image", "ImageCms"])
            .unwrap();

        let ns = ctx.namespace();
        assert_eq!(ns.names(), vec!["Image", "ImageCms", "PIL"]);
        assert_eq!(ns.get("Image").unwrap().name, "PIL.Image");
    }

    #[test]
    fn submodules_deferred_until_imported() {
        let mut ctx = context(&MockImporter::new(), &MockRunner::new());

        ctx.declare("PIL").unwrap().import(&["Image"]).unwrap();

        assert!(ctx.namespace().is_empty());
        assert_eq!(ctx.dependency("PIL").unwrap().submodules(), ["Image"]);
    }

    #[test]
    fn unresolved_submodule_is_fatal() {
        let importer = MockImporter::new();
        importer.install("PIL", "9.2.0");
        let mut ctx = context(&importer, &MockRunner::new());

        let err = ctx.declare("PIL").unwrap().import(&["Nope"]).err().unwrap();
        assert!(err.is_fatal());
        assert!(matches!(err, DephandError::SubmoduleNotFound { .. }));
    }

    #[test]
    fn identifier_submodules_are_requested() {
        let importer = MockImporter::new();
        importer.install("PIL", "9.2.0");
        importer.add_submodule("PIL", "Image");
        let mut ctx = context(&importer, &MockRunner::new());

        ctx.declare(Identifier::new("PIL").with_submodules(&["Image"]))
            .unwrap();
        assert!(ctx.namespace().contains("Image"));
    }

    #[test]
    fn init_registers_printers_and_reports_aggregate() {
        let importer = MockImporter::new();
        importer.install("alpha", "1.0");
        let namespace = Namespace::new();
        let mut ctx = context(&importer, &MockRunner::new());
        let printer = RecordingPrinter::new("recording");

        let all = init(
            &mut ctx,
            ["alpha", "beta"],
            Some(namespace.clone()),
            vec![Box::new(printer)],
            false,
        )
        .unwrap();

        assert!(!all);
        assert!(namespace.contains("alpha"));
        assert_eq!(ctx.printer_names(), vec!["recording"]);
    }
}
