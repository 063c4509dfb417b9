//! Update command implementation.
//!
//! The `dephandler update` command upgrades declared dependencies to the
//! newest release inside their version range. Without names it updates every
//! dependency `outdated` would list. With `--to` it installs exactly that
//! version of a single dependency.

use crate::cli::args::UpdateArgs;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::Context;

use super::dispatcher::{Command, CommandResult};
use super::setup::ProjectSetup;
use super::status::format_dependency;

/// The update command implementation.
pub struct UpdateCommand {
    setup: ProjectSetup,
    args: UpdateArgs,
}

impl UpdateCommand {
    /// Create a new update command.
    pub fn new(setup: &ProjectSetup, args: UpdateArgs) -> Self {
        Self {
            setup: setup.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &UpdateArgs {
        &self.args
    }

    fn update(&self, ctx: &mut Context, names: &[String]) -> Result<()> {
        for name in names {
            let run = match &self.args.to {
                Some(version) => ctx.change_version(name, version)?,
                None => ctx.update_dependency(name)?,
            };
            for line in run {
                line?;
            }
        }
        Ok(())
    }
}

impl Command for UpdateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.setup.load_or_report(ui)? else {
            return Ok(CommandResult::failure(2));
        };
        if self.args.to.is_some() && self.args.names.len() != 1 {
            ui.error("--to needs exactly one dependency name");
            return Ok(CommandResult::failure(2));
        }
        let printers = self.setup.printers(&config, ui.output_mode())?;
        let mut ctx = self.setup.context(&config, printers, &[])?;

        let names: Vec<String> = if self.args.names.is_empty() {
            ctx.available_updates().into_iter().map(|u| u.name).collect()
        } else {
            self.args.names.clone()
        };
        if names.is_empty() {
            ui.success("No updates available");
            return Ok(CommandResult::success());
        }

        if let Err(e) = self.update(&mut ctx, &names) {
            if !e.is_fatal() {
                return Err(e);
            }
            ui.error(&format!("Update aborted: {}", e));
            return Ok(CommandResult::failure(1));
        }

        let mut all_imported = true;
        for view in ctx.dependencies().iter().filter(|d| names.contains(&d.name)) {
            let line = format_dependency(view);
            if view.imported {
                ui.success(&line);
            } else {
                all_imported = false;
                ui.error(&line);
            }
        }
        if ctx.is_restart_needed() {
            ui.warning("Restart the host application to load the updated versions");
        }

        Ok(CommandResult::from_imported(all_imported))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DephandError;
    use crate::ui::{MockUI, OutputMode};
    use std::fs;
    use tempfile::TempDir;

    const UNUSABLE: &str =
        "python: /nonexistent/dephandler/python\nprinters: []\ndependencies: [alpha, beta]\n";

    fn setup_project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".dephandler");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), config).unwrap();
        temp
    }

    fn args(names: &[&str], to: Option<&str>) -> UpdateArgs {
        UpdateArgs {
            names: names.iter().map(|s| s.to_string()).collect(),
            to: to.map(str::to_string),
        }
    }

    #[test]
    fn update_without_config_exits_2() {
        let temp = TempDir::new().unwrap();
        let cmd = UpdateCommand::new(&ProjectSetup::new(temp.path()), UpdateArgs::default());
        let mut ui = MockUI::new();
        assert_eq!(cmd.execute(&mut ui).unwrap().exit_code, 2);
    }

    #[test]
    fn pin_needs_exactly_one_name() {
        let temp = setup_project(UNUSABLE);
        let cmd = UpdateCommand::new(
            &ProjectSetup::new(temp.path()),
            args(&["alpha", "beta"], Some("1.0")),
        );
        let mut ui = MockUI::with_mode(OutputMode::Quiet);

        assert_eq!(cmd.execute(&mut ui).unwrap().exit_code, 2);
        assert!(ui.has_error("--to needs exactly one"));
    }

    #[test]
    fn nothing_outdated_is_a_no_op() {
        let temp = setup_project(UNUSABLE);
        let cmd = UpdateCommand::new(&ProjectSetup::new(temp.path()), UpdateArgs::default());
        let mut ui = MockUI::with_mode(OutputMode::Quiet);

        assert!(cmd.execute(&mut ui).unwrap().success);
        assert_eq!(ui.successes(), ["No updates available"]);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let temp = setup_project(UNUSABLE);
        let cmd = UpdateCommand::new(&ProjectSetup::new(temp.path()), args(&["gamma"], None));
        let mut ui = MockUI::with_mode(OutputMode::Quiet);

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, DephandError::UnknownDependency { .. }));
    }

    #[test]
    fn specifier_is_not_a_version() {
        let temp = setup_project(UNUSABLE);
        let cmd = UpdateCommand::new(
            &ProjectSetup::new(temp.path()),
            args(&["alpha"], Some(">=2.0")),
        );
        let mut ui = MockUI::with_mode(OutputMode::Quiet);

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, DephandError::InvalidVersion { .. }));
    }

    #[test]
    fn unusable_interpreter_aborts_the_update() {
        let temp = setup_project(UNUSABLE);
        let cmd = UpdateCommand::new(&ProjectSetup::new(temp.path()), args(&["alpha"], None));
        let mut ui = MockUI::with_mode(OutputMode::Quiet);

        let result = cmd.execute(&mut ui).unwrap();
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("Update aborted"));
    }
}
