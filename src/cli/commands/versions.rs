//! Versions command implementation.
//!
//! The `dephandler versions <name>` command lists the published versions of
//! a dependency, newest first. Names that are not configured may be given in
//! the `name[:package]` form.

use crate::cli::args::VersionsArgs;
use crate::deps::Identifier;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::setup::ProjectSetup;

/// The versions command implementation.
pub struct VersionsCommand {
    setup: ProjectSetup,
    args: VersionsArgs,
}

impl VersionsCommand {
    /// Create a new versions command.
    pub fn new(setup: &ProjectSetup, args: VersionsArgs) -> Self {
        Self {
            setup: setup.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &VersionsArgs {
        &self.args
    }
}

impl Command for VersionsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.setup.load_or_report(ui)? else {
            return Ok(CommandResult::failure(2));
        };
        let mut ctx = self.setup.context(&config, Vec::new(), &[])?;

        let name = if ctx.dependency(&self.args.name).is_some() {
            self.args.name.clone()
        } else {
            let id = Identifier::parse(&self.args.name)?;
            ctx.declare(id)?.name().to_string()
        };

        let versions = ctx.list_available_versions(&name)?;
        if versions.is_empty() {
            ui.warning(&format!("No published versions found for {}", name));
            return Ok(CommandResult::success());
        }
        for version in &versions {
            ui.message(version);
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DephandError;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn setup_project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".dephandler");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.yml"), config).unwrap();
        temp
    }

    fn args(name: &str) -> VersionsArgs {
        VersionsArgs {
            name: name.to_string(),
        }
    }

    #[test]
    fn versions_without_config_exits_2() {
        let temp = TempDir::new().unwrap();
        let cmd = VersionsCommand::new(&ProjectSetup::new(temp.path()), args("numpy"));
        let mut ui = MockUI::new();
        assert_eq!(cmd.execute(&mut ui).unwrap().exit_code, 2);
    }

    #[test]
    fn undeclared_name_is_declared_before_querying() {
        let temp = setup_project("python: /nonexistent/dephandler/python\ndependencies: []\n");
        let cmd = VersionsCommand::new(&ProjectSetup::new(temp.path()), args("PIL:Pillow"));
        let mut ui = MockUI::new();

        // The interpreter cannot run, so the query itself fails.
        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, DephandError::CommandFailed { .. }));
    }
}
