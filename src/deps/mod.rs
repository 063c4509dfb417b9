//! Dependency declarations, state, and import probing.
//!
//! # Modules
//!
//! - [`version`] - Declared version bounds and their (lexical) evaluation
//! - [`identifier`] - The accepted declaration shapes
//! - [`dependency`] - The per-module state machine
//! - [`registry`] - Unique-by-name store in declaration order
//! - [`namespace`] - Loaded module handles and the host namespace
//! - [`importer`] - Pure import attempts against the interpreter

pub mod dependency;
pub mod identifier;
pub mod importer;
pub mod mock;
pub mod namespace;
pub mod registry;
pub mod version;

pub use dependency::{Dependency, DependencyView, ImportOutcome};
pub use identifier::Identifier;
pub use importer::{Importer, PythonImporter};
pub use mock::MockImporter;
pub use namespace::{ModuleHandle, Namespace};
pub use registry::Registry;
pub use version::VersionRange;
