//! Outdated command implementation.
//!
//! The `dephandler outdated` command lists newer releases of declared
//! dependencies that still fit their version range. With `--all` it lists
//! every outdated package in the interpreter's environment.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cli::args::OutdatedArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::setup::ProjectSetup;

/// The outdated command implementation.
pub struct OutdatedCommand {
    setup: ProjectSetup,
    args: OutdatedArgs,
}

#[derive(Debug, Serialize)]
struct OutdatedPackage {
    current: String,
    latest: String,
}

impl OutdatedCommand {
    /// Create a new outdated command.
    pub fn new(setup: &ProjectSetup, args: OutdatedArgs) -> Self {
        Self {
            setup: setup.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &OutdatedArgs {
        &self.args
    }
}

impl Command for OutdatedCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.setup.load_or_report(ui)? else {
            return Ok(CommandResult::failure(2));
        };
        let ctx = self.setup.context(&config, Vec::new(), &[])?;

        if self.args.all {
            let outdated = ctx.list_outdated_packages();
            if self.args.json {
                let packages: BTreeMap<_, _> = outdated
                    .into_iter()
                    .map(|(name, (current, latest))| (name, OutdatedPackage { current, latest }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&packages)?);
                return Ok(CommandResult::success());
            }
            if outdated.is_empty() {
                ui.success("Every package is up to date");
            }
            for (name, (current, latest)) in &outdated {
                ui.message(&format!("{} {} -> {}", name, current, latest));
            }
            return Ok(CommandResult::success());
        }

        let updates = ctx.available_updates();
        if self.args.json {
            println!("{}", serde_json::to_string_pretty(&updates)?);
            return Ok(CommandResult::success());
        }
        if updates.is_empty() {
            ui.success("No updates available");
            return Ok(CommandResult::success());
        }
        for update in &updates {
            let name = if update.name == update.pip_name {
                update.name.clone()
            } else {
                format!("{} ({})", update.name, update.pip_name)
            };
            ui.message(&format!("{} {} -> {}", name, update.current, update.latest));
        }
        Ok(CommandResult::success())
    }
}
