//! Install command implementation.
//!
//! The `dephandler install` command installs configured dependencies that
//! are missing or outside their version range. Installer output goes to the
//! configured printers; the summary goes to the terminal.

use crate::cli::args::InstallArgs;
use crate::deps::Identifier;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::Context;

use super::dispatcher::{Command, CommandResult};
use super::setup::ProjectSetup;

/// The install command implementation.
pub struct InstallCommand {
    setup: ProjectSetup,
    args: InstallArgs,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(setup: &ProjectSetup, args: InstallArgs) -> Self {
        Self {
            setup: setup.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &InstallArgs {
        &self.args
    }

    /// Drive the runs; true iff every target ended up imported.
    fn install(&self, ctx: &mut Context) -> Result<bool> {
        if self.args.names.is_empty() {
            return ctx.install_all();
        }
        for name in &self.args.names {
            for line in ctx.install_dependency(name)? {
                line?;
            }
        }
        Ok(self.args.names.iter().all(|name| {
            ctx.dependency(name)
                .map(|d| d.is_imported())
                .unwrap_or(false)
        }))
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.setup.load_or_report(ui)? else {
            return Ok(CommandResult::failure(2));
        };
        let extra = self
            .args
            .add
            .iter()
            .map(|spec| Identifier::parse(spec))
            .collect::<Result<Vec<_>>>()?;
        let printers = self.setup.printers(&config, ui.output_mode())?;
        let mut ctx = self.setup.context(&config, printers, &extra)?;

        if ctx.registry().is_empty() {
            ui.warning("No dependencies declared, nothing to install");
            return Ok(CommandResult::success());
        }

        let imported = match self.install(&mut ctx) {
            Ok(imported) => imported,
            Err(e) if e.is_fatal() => {
                ui.error(&format!("Installation aborted: {}", e));
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        let missing: Vec<String> = ctx
            .dependencies()
            .into_iter()
            .filter(|d| !d.imported)
            .filter(|d| self.args.names.is_empty() || self.args.names.contains(&d.name))
            .map(|d| d.name)
            .collect();
        if missing.is_empty() {
            ui.success("All dependencies imported");
        } else {
            ui.error(&format!("Not imported: {}", missing.join(", ")));
        }
        if ctx.is_restart_needed() {
            ui.warning("Restart the host application to load the installed versions");
        }

        Ok(CommandResult::from_imported(imported))
    }
}
