//! The installation pipeline.
//!
//! [`InstallRun`] is a lazy stream of output lines: nothing happens until
//! the caller pulls the next line, and every pull advances the run by at
//! most one installer line or one state transition. Each line is also
//! broadcast to the context's printers as it is produced.
//!
//! A run moves through these stages:
//!
//! ```text
//! Preparing -> [Bootstrap] -> Installing(dep) ... -> Verifying -> Done
//! ```
//!
//! Bootstrap makes sure pip is available and happens at most once per
//! context, right before the first install. A dependency whose install fails
//! is reported and skipped; only an unusable pip or a submodule that does
//! not resolve ends the run with an error, yielded as the last item.
//!
//! The same pipeline upgrades an imported dependency within its range
//! ([`Context::update_dependency`]) or pins it to an exact release
//! ([`Context::change_version`]). Replacing a module that is already loaded
//! sets the context's restart flag.
//!
//! Dropping a run before it is exhausted kills the running installer and
//! leaves the printers unfinished.

pub mod diagnostics;

use std::collections::VecDeque;

use crate::context::Context;
use crate::deps::ImportOutcome;
use crate::error::{DephandError, Result};
use crate::shell::CommandStream;

pub use diagnostics::{DiagnosticReport, REMEDIATION};

/// Shown after a successful run that replaced an already loaded module.
/// Later runs that replace nothing stay quiet.
pub const RESTART_NOTICE: &str =
    "Restart the host application to finish loading the updated dependencies.";

enum Stage {
    Preparing,
    SelectNext,
    Bootstrap { index: usize },
    Running { command: CommandStream, task: Task },
    Verifying,
    Done,
}

/// What a run does with each target.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RunKind {
    /// Install targets that are not imported yet.
    Install,
    /// Upgrade targets to the newest release inside their range.
    Update,
    /// Install exactly this release of the target.
    ChangeVersion(String),
}

impl RunKind {
    fn verb(&self) -> &'static str {
        match self {
            RunKind::Install => "Installing",
            RunKind::Update => "Updating",
            RunKind::ChangeVersion(_) => "Changing",
        }
    }

    fn failure(&self, name: &str) -> String {
        match self {
            RunKind::Install => format!("Failed to install {}", name),
            RunKind::Update => format!("Failed to update {}", name),
            RunKind::ChangeVersion(version) => format!("Failed to change {} to {}", name, version),
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            RunKind::Install => "All dependencies installed",
            RunKind::Update => "Update finished",
            RunKind::ChangeVersion(_) => "Version change finished",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Task {
    Ensurepip { index: usize },
    UpgradeSelf { index: usize },
    Install { index: usize },
}

/// A lazily driven install run over a [`Context`].
///
/// Yields `Ok(line)` for every output line and, if the run cannot continue,
/// one final `Err`. Partial failures are reported as lines, not errors.
pub struct InstallRun<'a> {
    ctx: &'a mut Context,
    kind: RunKind,
    restart_was_needed: bool,
    stage: Stage,
    targets: Vec<usize>,
    queue: VecDeque<usize>,
    pending: VecDeque<String>,
    fatal: Option<DephandError>,
    outcome: Option<bool>,
}

impl<'a> InstallRun<'a> {
    pub(crate) fn new(ctx: &'a mut Context, targets: Vec<usize>) -> Self {
        let targets: Vec<usize> = targets
            .into_iter()
            .filter(|&i| !ctx.registry.at(i).is_imported())
            .collect();
        Self::with_kind(ctx, targets, RunKind::Install)
    }

    fn with_kind(ctx: &'a mut Context, targets: Vec<usize>, kind: RunKind) -> Self {
        Self {
            queue: targets.iter().copied().collect(),
            targets,
            restart_was_needed: ctx.restart_flag(),
            ctx,
            kind,
            stage: Stage::Preparing,
            pending: VecDeque::new(),
            fatal: None,
            outcome: None,
        }
    }

    /// Whether every targeted dependency ended up imported; `None` until the
    /// run has completed without a fatal error.
    pub fn outcome(&self) -> Option<bool> {
        self.outcome
    }

    fn emit(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.ctx.printers.log(&line);
        self.pending.push_back(line);
    }

    fn spawn(&mut self, args: Vec<String>, task: Task) -> Result<()> {
        let command = self
            .ctx
            .runner
            .spawn(self.ctx.package_manager.python(), &args)?;
        tracing::debug!("Running {}", command.command());
        self.emit(format!("$ {}", command.command()));
        self.stage = Stage::Running { command, task };
        Ok(())
    }

    fn step(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.stage, Stage::Done) {
            Stage::Preparing => {
                self.ctx.printers.prepare();
                if self.queue.is_empty() {
                    self.stage = Stage::Verifying;
                } else {
                    let names: Vec<&str> = self
                        .queue
                        .iter()
                        .map(|&i| self.ctx.registry.at(i).name())
                        .collect();
                    let line = match &self.kind {
                        RunKind::ChangeVersion(version) => {
                            format!("Changing {} to {}", names.join(", "), version)
                        }
                        kind => format!("{} {}", kind.verb(), names.join(", ")),
                    };
                    self.emit(line);
                    self.stage = Stage::SelectNext;
                }
                Ok(())
            }
            Stage::SelectNext => {
                match self.queue.pop_front() {
                    None => self.stage = Stage::Verifying,
                    Some(index) if self.ctx.bootstrapped => self.start_install(index)?,
                    Some(index) => self.stage = Stage::Bootstrap { index },
                }
                Ok(())
            }
            Stage::Bootstrap { index } => match self.ctx.importer.import("pip", "pip") {
                Ok(pip) => {
                    self.emit(format!(
                        "Using pip {}",
                        pip.version.as_deref().unwrap_or("(unknown version)")
                    ));
                    self.bootstrapped(index)
                }
                Err(e) => {
                    tracing::info!("pip unavailable ({}), running ensurepip", e);
                    self.emit("pip not found, bootstrapping it with ensurepip");
                    let args = self.ctx.package_manager.ensurepip_args();
                    self.spawn(args, Task::Ensurepip { index })
                        .map_err(|e| DephandError::BootstrapFailed {
                            message: format!("could not run ensurepip: {}", e),
                        })
                }
            },
            Stage::Running { mut command, task } => {
                if let Some(line) = command.next() {
                    self.stage = Stage::Running { command, task };
                    self.emit(line.into_text());
                    return Ok(());
                }
                let success = match command.finish() {
                    Ok(result) => result.success,
                    Err(e) => {
                        tracing::warn!("Installer exited abnormally: {}", e);
                        false
                    }
                };
                self.command_finished(task, success)
            }
            Stage::Verifying => {
                self.verify();
                Ok(())
            }
            Stage::Done => Ok(()),
        }
    }

    fn command_finished(&mut self, task: Task, success: bool) -> Result<()> {
        match task {
            Task::Ensurepip { index } => match self.ctx.importer.import("pip", "pip") {
                Ok(_) => {
                    self.emit("pip bootstrapped");
                    self.bootstrapped(index)
                }
                Err(e) => Err(DephandError::BootstrapFailed {
                    message: if success {
                        format!("pip is still unavailable after ensurepip: {}", e)
                    } else {
                        format!("ensurepip failed: {}", e)
                    },
                }),
            },
            Task::UpgradeSelf { index } => {
                if !success {
                    self.emit("WARNING: could not upgrade pip, continuing with the installed version");
                }
                self.start_install(index)
            }
            Task::Install { index } => {
                self.install_finished(index, success)?;
                self.stage = Stage::SelectNext;
                Ok(())
            }
        }
    }

    fn bootstrapped(&mut self, index: usize) -> Result<()> {
        self.ctx.bootstrapped = true;
        if !self.ctx.package_manager.upgrades_pip() {
            return self.start_install(index);
        }
        let args = self.ctx.package_manager.upgrade_self_args();
        if let Err(e) = self.spawn(args, Task::UpgradeSelf { index }) {
            self.emit(format!("WARNING: could not upgrade pip: {}", e));
            return self.start_install(index);
        }
        Ok(())
    }

    fn start_install(&mut self, index: usize) -> Result<()> {
        let dep = self.ctx.registry.at(index);
        let name = dep.name().to_string();
        let (requirement, args) = match &self.kind {
            RunKind::ChangeVersion(version) => (
                format!("{}=={}", dep.pip_name(), version),
                self.ctx
                    .package_manager
                    .change_version_args(dep.pip_name(), version),
            ),
            _ => {
                let requirement = dep.requirement();
                let args = self.ctx.package_manager.install_args(&requirement);
                (requirement, args)
            }
        };
        self.emit(format!("{} {} ({})", self.kind.verb(), name, requirement));
        if let Err(e) = self.spawn(args, Task::Install { index }) {
            self.emit(format!("ERROR: could not start the installer for {}: {}", name, e));
            self.install_finished(index, false)?;
            self.stage = Stage::SelectNext;
        }
        Ok(())
    }

    /// Re-import after an install attempt and update the dependency's state.
    fn install_finished(&mut self, index: usize, success: bool) -> Result<()> {
        let dep = self.ctx.registry.at(index);
        let name = dep.name().to_string();
        let was_wrong_version = dep.is_wrong_version();
        let was_loaded = dep.is_imported() || was_wrong_version;
        let previous = dep.version().map(str::to_string);

        if success {
            self.ctx.registry.at_mut(index).mark_installed();
        } else if was_wrong_version {
            // An old version may be partly removed; the re-import decides.
            self.emit(format!(
                "WARNING: installer reported errors for {}, checking the installed version",
                name
            ));
        } else {
            tracing::warn!("{} {} failed", self.kind.verb(), name);
            self.emit(self.kind.failure(&name));
            return Ok(());
        }

        match self.ctx.attempt_import(index)? {
            ImportOutcome::Imported => {
                let version = self
                    .ctx
                    .registry
                    .at(index)
                    .version()
                    .unwrap_or("(unknown version)")
                    .to_string();
                if was_loaded && previous.as_deref() == Some(version.as_str()) {
                    self.emit(format!("{} is unchanged at {}", name, version));
                    return Ok(());
                }
                self.emit(format!("Installed {} {}", name, version));
                if was_loaded {
                    self.ctx.set_restart_needed();
                    self.emit(format!(
                        "{} was replaced while loaded, a restart is needed to use {}",
                        name, version
                    ));
                }
            }
            ImportOutcome::WrongVersion { found } => {
                let range = self.ctx.registry.at(index).version_range().to_string();
                if was_loaded && previous.as_deref() != Some(found.as_str()) {
                    self.ctx.set_restart_needed();
                    self.emit(format!(
                        "{} {} is installed, outside {}; a restart is needed to load it",
                        name, found, range
                    ));
                } else {
                    self.emit(format!(
                        "{} {} is still loaded, outside {}; restart recommended",
                        name, found, range
                    ));
                }
            }
            ImportOutcome::Failed { reason } if success => {
                self.emit(format!(
                    "{} installed but cannot be imported yet ({}); restart recommended",
                    name, reason
                ));
            }
            ImportOutcome::Failed { reason } => {
                self.emit(format!("Failed to install {} ({})", name, reason));
            }
        }
        Ok(())
    }

    fn verify(&mut self) {
        self.ctx.refresh_aggregate();
        let failed: Vec<String> = self
            .targets
            .iter()
            .map(|&i| self.ctx.registry.at(i))
            .filter(|d| !d.is_imported())
            .map(|d| d.name().to_string())
            .collect();

        if failed.is_empty() {
            if !self.targets.is_empty() {
                self.emit(self.kind.summary());
            }
            if self.ctx.restart_flag() && !self.restart_was_needed {
                self.emit(RESTART_NOTICE);
            }
        } else {
            self.emit(format!("Not imported: {}", failed.join(", ")));
            self.dump_diagnostics();
        }
        tracing::info!(
            "Install run finished, {} of {} targets imported",
            self.targets.len() - failed.len(),
            self.targets.len()
        );

        self.ctx.printers.finish();
        self.outcome = Some(failed.is_empty());
    }

    fn dump_diagnostics(&mut self) {
        for line in DiagnosticReport::collect(self.ctx).lines() {
            self.emit(line);
        }
        self.emit(REMEDIATION);
    }

    fn abort(&mut self, err: DephandError) {
        tracing::error!("Install run aborted: {}", err);
        self.emit(format!("ERROR: {}", err));
        self.ctx.refresh_aggregate();
        self.dump_diagnostics();
        self.ctx.printers.finish();
        self.stage = Stage::Done;
        self.fatal = Some(err);
    }
}

impl Iterator for InstallRun<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }
            if let Some(err) = self.fatal.take() {
                return Some(Err(err));
            }
            if matches!(self.stage, Stage::Done) {
                return None;
            }
            if let Err(err) = self.step() {
                self.abort(err);
            }
        }
    }
}

impl Context {
    /// Lazily install every dependency that is not imported yet.
    pub fn install_run(&mut self) -> InstallRun<'_> {
        let targets = self.registry.pending();
        InstallRun::new(self, targets)
    }

    /// Lazily install one declared dependency.
    pub fn install_dependency(&mut self, name: &str) -> Result<InstallRun<'_>> {
        let index = self.position_of(name)?;
        Ok(InstallRun::new(self, vec![index]))
    }

    /// Lazily upgrade one declared dependency to the newest release inside
    /// its range, even if it is already imported.
    ///
    /// Sets the restart flag when a loaded module is replaced on disk.
    pub fn update_dependency(&mut self, name: &str) -> Result<InstallRun<'_>> {
        let index = self.position_of(name)?;
        Ok(InstallRun::with_kind(self, vec![index], RunKind::Update))
    }

    /// Lazily install exactly `version` of one declared dependency.
    ///
    /// The version is not checked against the declared range; a release
    /// outside it leaves the dependency not imported.
    pub fn change_version(&mut self, name: &str, version: &str) -> Result<InstallRun<'_>> {
        let index = self.position_of(name)?;
        if !is_plain_version(version) {
            return Err(DephandError::InvalidVersion {
                name: name.to_string(),
                version: version.to_string(),
            });
        }
        let kind = RunKind::ChangeVersion(version.to_string());
        Ok(InstallRun::with_kind(self, vec![index], kind))
    }

    fn position_of(&self, name: &str) -> Result<usize> {
        self.registry
            .position(name)
            .ok_or_else(|| DephandError::UnknownDependency {
                name: name.to_string(),
            })
    }

    /// Run [`install_run`](Self::install_run) to completion.
    ///
    /// Returns whether every dependency is now imported.
    pub fn install_all(&mut self) -> Result<bool> {
        for line in self.install_run() {
            line?;
        }
        Ok(self.dependencies_imported())
    }
}

/// A release such as `9.2.0`, `2.0rc1` or `1.0.post1+local`, with no
/// comparison operators or separators pip would read as a specifier.
fn is_plain_version(version: &str) -> bool {
    !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '+' | '!'))
}
