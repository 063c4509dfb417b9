//! Configuration schema definitions for dephandler.
//!
//! This module contains the struct that maps to the YAML configuration
//! file format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::deps::Identifier;

/// Root configuration structure for `.dephandler/config.yml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DephandConfig {
    /// Interpreter whose environment receives the packages
    pub python: PathBuf,

    /// Install into the user site directory (`pip install --user`)
    #[serde(skip_serializing_if = "is_false")]
    pub user_install: bool,

    /// Upgrade pip once before the first install of a run
    pub upgrade_pip: bool,

    /// Output sinks by name: console, spinner, tracing, file
    pub printers: Vec<String>,

    /// Where the file printer writes, relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_file: Option<PathBuf>,

    /// Heading shown by the console printer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Declared dependencies, in declaration order
    pub dependencies: Vec<Identifier>,
}

impl Default for DephandConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            user_install: false,
            upgrade_pip: true,
            printers: default_printers(),
            report_file: None,
            title: None,
            dependencies: Vec::new(),
        }
    }
}

fn default_python() -> PathBuf {
    PathBuf::from("python3")
}

fn default_printers() -> Vec<String> {
    vec!["console".to_string()]
}

fn is_false(v: &bool) -> bool {
    !v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::VersionRange;

    #[test]
    fn empty_document_uses_defaults() {
        let config: DephandConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.python, PathBuf::from("python3"));
        assert!(!config.user_install);
        assert!(config.upgrade_pip);
        assert_eq!(config.printers, vec!["console"]);
        assert!(config.dependencies.is_empty());
    }

    #[test]
    fn parses_full_config() {
        let yaml = r#"
python: /opt/blender/python/bin/python3.10
user_install: true
upgrade_pip: false
printers: [spinner, tracing]
title: Addon dependencies
dependencies:
  - numpy
  - name: PIL
    pip: Pillow
    min: "9.0"
    max: "9.2"
"#;
        let config: DephandConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.python,
            PathBuf::from("/opt/blender/python/bin/python3.10")
        );
        assert!(config.user_install);
        assert!(!config.upgrade_pip);
        assert_eq!(config.printers, vec!["spinner", "tracing"]);
        assert_eq!(config.title.as_deref(), Some("Addon dependencies"));
        assert_eq!(config.dependencies.len(), 2);
        assert_eq!(
            config.dependencies[1].range,
            VersionRange::new(Some("9.0"), Some("9.2"))
        );
    }

    #[test]
    fn serializes_without_defaults_noise() {
        let yaml = serde_yaml::to_string(&DephandConfig::default()).unwrap();
        assert!(yaml.contains("python: python3"));
        assert!(!yaml.contains("user_install"));
        assert!(!yaml.contains("title"));
    }
}
