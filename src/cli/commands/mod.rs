//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Configuration loading and context
//! construction are shared through [`ProjectSetup`].
//!
//! Exit codes: 0 when every dependency is imported, 1 otherwise, 2 when no
//! configuration was found.

pub mod completions;
pub mod dispatcher;
pub mod install;
pub mod outdated;
pub mod setup;
pub mod status;
pub mod update;
pub mod versions;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use setup::ProjectSetup;
