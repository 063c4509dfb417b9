//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// dephandler - Install and check optional Python dependencies.
#[derive(Debug, Parser)]
#[command(name = "dephandler")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .dephandler/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Interpreter to install into (overrides the config file)
    #[arg(long, global = true, env = "DEPHANDLER_PYTHON")]
    pub python: Option<PathBuf>,

    /// Stream installer output line by line
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Install dependencies that are missing or outside their version range
    Install(InstallArgs),

    /// Show which dependencies import (default if no command specified)
    Status(StatusArgs),

    /// Upgrade dependencies within their range, or pin one to a version
    Update(UpdateArgs),

    /// List available updates
    Outdated(OutdatedArgs),

    /// List published versions of a dependency
    Versions(VersionsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Install only these declared dependencies
    pub names: Vec<String>,

    /// Declare an extra dependency as name[:package][@min..max] (repeatable)
    #[arg(long, value_name = "SPEC")]
    pub add: Vec<String>,
}

/// Arguments for the `update` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct UpdateArgs {
    /// Update only these declared dependencies (default: every one with an update)
    pub names: Vec<String>,

    /// Install exactly this version of the single named dependency
    #[arg(long, value_name = "VERSION", requires = "names")]
    pub to: Option<String>,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `outdated` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct OutdatedArgs {
    /// Show every outdated package, not only declared dependencies
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `versions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct VersionsArgs {
    /// Declared dependency, or name[:package] for one that is not declared
    pub name: String,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
