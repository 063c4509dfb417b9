//! Error types for dephandler operations.
//!
//! This module defines [`DephandError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Fatal, run-halting conditions ([`DephandError::BootstrapFailed`],
//!   [`DephandError::SubmoduleNotFound`]) propagate out of the install pipeline
//! - A single dependency failing to install is not an error; it is reported
//!   through the aggregate `dependencies_imported` flag instead
//! - Use `anyhow::Error` (via `DephandError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dephandler operations.
#[derive(Debug, Error)]
pub enum DephandError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A printer name does not refer to any known output sink.
    #[error("'{name}' is not a printer (expected one of: {expected})")]
    InvalidPrinter { name: String, expected: String },

    /// A module could not be imported by the interpreter.
    #[error("Cannot import '{module}': {message}")]
    ImportFailed { module: String, message: String },

    /// A requested submodule could not be resolved after its parent imported.
    #[error("Submodule '{submodule}' not found in '{module}'")]
    SubmoduleNotFound { module: String, submodule: String },

    /// The package manager is unavailable and could not be bootstrapped.
    #[error("Package manager bootstrap failed: {message}")]
    BootstrapFailed { message: String },

    /// No dependency with this name has been declared.
    #[error("Unknown dependency: {name}")]
    UnknownDependency { name: String },

    /// A requested version is not a plain version string.
    #[error("Invalid version '{version}' for {name}")]
    InvalidVersion { name: String, version: String },

    /// External command could not be run.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DephandError {
    /// Whether this error halts an install run instead of failing one dependency.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DephandError::BootstrapFailed { .. } | DephandError::SubmoduleNotFound { .. }
        )
    }
}

/// Result type alias for dephandler operations.
pub type Result<T> = std::result::Result<T, DephandError>;
