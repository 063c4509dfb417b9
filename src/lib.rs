//! dephandler - Runtime provisioning of optional Python dependencies.
//!
//! A long-lived plugin host declares the Python modules it can use. Each
//! declaration makes one pure import attempt; whatever is missing or outside
//! its version range can later be installed with pip, in the host's own
//! interpreter, while streaming installer output to pluggable printers.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, merging, and validation
//! - [`context`] - The per-host handle that owns all dependency state
//! - [`declare`] - Declaring dependencies and exposing their modules
//! - [`deps`] - Version ranges, the dependency registry, and import probing
//! - [`error`] - Error types and result aliases
//! - [`pip`] - pip invocations and output parsing
//! - [`pipeline`] - The lazy install run and its diagnostics
//! - [`printer`] - Output sinks for install runs
//! - [`shell`] - Process execution with streamed output
//! - [`ui`] - Terminal output for the CLI
//! - [`updates`] - Newer releases of declared dependencies
//! - [`worker`] - Background install and update runs
//!
//! # Example
//!
//! ```
//! use dephandler::deps::{MockImporter, VersionRange};
//! use dephandler::pip::PackageManager;
//! use dephandler::shell::{MockResponse, MockRunner};
//! use dephandler::Context;
//!
//! let importer = MockImporter::new();
//! importer.install("pip", "24.0");
//! let runner = MockRunner::new();
//! let landed = importer.clone();
//! runner.respond(
//!     "numpy",
//!     MockResponse::ok(&["Successfully installed numpy-1.26.4"])
//!         .then(move || landed.install("numpy", "1.26.4")),
//! );
//!
//! let mut ctx = Context::new(
//!     PackageManager::new("python3").with_upgrade_pip(false),
//!     Box::new(importer),
//!     Box::new(runner),
//! );
//! assert!(!ctx.import(("numpy", VersionRange::at_least("1.20"))).unwrap());
//!
//! assert!(ctx.install_all().unwrap());
//! assert!(ctx.namespace().contains("numpy"));
//! ```
//!
//! For file-based config loading, see the integration tests.

pub mod cli;
pub mod config;
pub mod context;
pub mod declare;
pub mod deps;
pub mod error;
pub mod pip;
pub mod pipeline;
pub mod printer;
pub mod shell;
pub mod ui;
pub mod updates;
pub mod worker;

pub use context::{Context, SharedFlags};
pub use declare::{init, DependencyHandle};
pub use error::{DephandError, Result};
pub use pipeline::InstallRun;
pub use updates::UpdateCandidate;
pub use worker::Worker;
