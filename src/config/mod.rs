//! Configuration loading, parsing, and validation for dephandler.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use dephandler::config::{load_merged_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let dir = temp.path().join(".dephandler");
//! fs::create_dir_all(&dir).unwrap();
//! fs::write(dir.join("config.yml"), "dependencies: [numpy]").unwrap();
//!
//! let config = load_merged_config(temp.path()).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.dependencies[0].name, "numpy");
//! ```
//!
//! # Configuration File Locations
//!
//! dephandler discovers and merges configuration in this order:
//! 1. User global config (`~/.dephandler/config.yml`)
//! 2. Project config (`.dephandler/config.yml`)
//! 3. Local overrides (`.dephandler/config.local.yml`)

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use schema::DephandConfig;

pub use loader::{
    find_project_root, load_config, load_config_file, load_config_value, load_merged_config,
    parse_config, project_config_path, ConfigPaths, CONFIG_DIR,
};

pub use merger::{deep_merge, merge_configs};

pub use validator::{validate, validate_config, ValidationError};
