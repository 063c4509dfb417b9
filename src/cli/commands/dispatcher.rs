//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use crate::cli::args::{Cli, Commands, StatusArgs};
use crate::error::Result;
use crate::ui::UserInterface;

use super::setup::ProjectSetup;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Exit 0 when every dependency imported, 1 otherwise.
    pub fn from_imported(all_imported: bool) -> Self {
        if all_imported {
            Self::success()
        } else {
            Self::failure(1)
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    setup: ProjectSetup,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given project setup.
    pub fn new(setup: ProjectSetup) -> Self {
        Self { setup }
    }

    pub fn setup(&self) -> &ProjectSetup {
        &self.setup
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Install(args)) => {
                let cmd = super::install::InstallCommand::new(&self.setup, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Status(args)) => {
                let cmd = super::status::StatusCommand::new(&self.setup, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Update(args)) => {
                let cmd = super::update::UpdateCommand::new(&self.setup, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Outdated(args)) => {
                let cmd = super::outdated::OutdatedCommand::new(&self.setup, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Versions(args)) => {
                let cmd = super::versions::VersionsCommand::new(&self.setup, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                let cmd = super::status::StatusCommand::new(&self.setup, StatusArgs::default());
                cmd.execute(ui)
            }
        }
    }
}
