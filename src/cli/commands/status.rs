//! Status command implementation.
//!
//! The `dephandler status` command imports every configured dependency and
//! shows which ones are usable. Nothing is installed.

use serde::Serialize;

use crate::cli::args::StatusArgs;
use crate::deps::DependencyView;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::setup::ProjectSetup;

/// The status command implementation.
pub struct StatusCommand {
    setup: ProjectSetup,
    args: StatusArgs,
}

/// Shape of `status --json`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub dependencies: Vec<DependencyView>,
    pub dependencies_imported: bool,
    pub restart_needed: bool,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(setup: &ProjectSetup, args: StatusArgs) -> Self {
        Self {
            setup: setup.clone(),
            args,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &StatusArgs {
        &self.args
    }
}

/// One status line per dependency.
pub fn format_dependency(view: &DependencyView) -> String {
    let version = view.version.as_deref().unwrap_or("unknown version");
    let state = if view.imported {
        format!("{} imported", version)
    } else if view.wrong_version {
        format!("{} installed, outside {}", version, view.version_range)
    } else if view.installed {
        format!("{} installed, not imported", version)
    } else {
        "not installed".to_string()
    };
    if view.name == view.pip_name {
        format!("{}: {}", view.name, state)
    } else {
        format!("{} ({}): {}", view.name, view.pip_name, state)
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.setup.load_or_report(ui)? else {
            return Ok(CommandResult::failure(2));
        };
        let ctx = self.setup.context(&config, Vec::new(), &[])?;
        let report = StatusReport {
            dependencies: ctx.dependencies(),
            dependencies_imported: ctx.dependencies_imported(),
            restart_needed: ctx.is_restart_needed(),
        };

        if self.args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(CommandResult::from_imported(report.dependencies_imported));
        }

        let title = config.title.as_deref().unwrap_or("Dependencies");
        ui.show_header(&format!("{} - Status", title));
        if report.dependencies.is_empty() {
            ui.warning("No dependencies declared");
            return Ok(CommandResult::success());
        }
        for view in &report.dependencies {
            let line = format_dependency(view);
            if view.imported {
                ui.success(&line);
            } else {
                ui.error(&line);
            }
        }

        let missing = report.dependencies.iter().filter(|d| !d.imported).count();
        if missing > 0 {
            ui.message("");
            ui.message(&format!(
                "{} of {} dependencies not imported. Run `dephandler install` to install them.",
                missing,
                report.dependencies.len()
            ));
        }
        if report.restart_needed {
            ui.warning("Restart the host application to load replaced modules");
        }

        Ok(CommandResult::from_imported(report.dependencies_imported))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::VersionRange;
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

    fn view(name: &str, pip_name: &str) -> DependencyView {
        DependencyView {
            name: name.to_string(),
            pip_name: pip_name.to_string(),
            version: None,
            version_range: VersionRange::any(),
            imported: false,
            installed: false,
            wrong_version: false,
        }
    }

    #[test]
    fn formats_each_state() {
        let mut v = view("PIL", "Pillow");
        assert_eq!(format_dependency(&v), "PIL (Pillow): not installed");

        v.installed = true;
        v.wrong_version = true;
        v.version = Some("8.0".to_string());
        v.version_range = VersionRange::at_least("9.0");
        assert_eq!(
            format_dependency(&v),
            "PIL (Pillow): 8.0 installed, outside [9.0, *]"
        );

        let mut v = view("numpy", "numpy");
        v.imported = true;
        v.installed = true;
        v.version = Some("1.26.4".to_string());
        assert_eq!(format_dependency(&v), "numpy: 1.26.4 imported");
    }

    #[test]
    fn status_without_config_exits_2() {
        let temp = TempDir::new().unwrap();
        let cmd = StatusCommand::new(&ProjectSetup::new(temp.path()), StatusArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn status_with_unusable_interpreter_reports_missing() {
        let temp = setup_project(
            "python: /nonexistent/dephandler/python\ndependencies:\n  - NEM\n",
        );
        let cmd = StatusCommand::new(&ProjectSetup::new(temp.path()), StatusArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("NEM: not installed"));
        assert!(ui.has_message("1 of 1 dependencies not imported"));
    }

    #[test]
    fn status_with_nothing_declared_succeeds() {
        let temp = setup_project("dependencies: []\n");
        let cmd = StatusCommand::new(&ProjectSetup::new(temp.path()), StatusArgs::default());
        let mut ui = MockUI::new();

        assert!(cmd.execute(&mut ui).unwrap().success);
        assert_eq!(ui.warnings(), ["No dependencies declared"]);
    }
}
