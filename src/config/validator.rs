//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - Dependency names and package names must not be empty
//! - Version bounds must not be empty strings
//! - Printer names must refer to known output sinks
//! - `report_file`, when set, must not be empty
//!
//! Declaring the same name twice is allowed; the first declaration wins.

use crate::config::schema::DephandConfig;
use crate::error::{DephandError, Result};
use crate::printer::PRINTER_NAMES;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Dependency name if error is dependency-specific
    pub dependency: Option<String>,
}

/// Validate a configuration and return all errors.
///
/// This function collects all validation errors rather than stopping
/// at the first one, allowing users to fix multiple issues at once.
pub fn validate_config(config: &DephandConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_dependencies(config));
    errors.extend(validate_printers(config));

    if config.python.as_os_str().is_empty() {
        errors.push(ValidationError {
            rule: "empty-python".to_string(),
            message: "'python' must name an interpreter".to_string(),
            dependency: None,
        });
    }

    if config
        .report_file
        .as_ref()
        .is_some_and(|p| p.as_os_str().is_empty())
    {
        errors.push(ValidationError {
            rule: "empty-report-file".to_string(),
            message: "'report_file' must name a file".to_string(),
            dependency: None,
        });
    }

    errors
}

fn validate_dependencies(config: &DephandConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (i, id) in config.dependencies.iter().enumerate() {
        if id.name.trim().is_empty() {
            errors.push(ValidationError {
                rule: "empty-name".to_string(),
                message: format!("Dependency #{} has an empty name", i + 1),
                dependency: None,
            });
            continue;
        }

        if id.pip_name.as_deref().is_some_and(|p| p.trim().is_empty()) {
            errors.push(ValidationError {
                rule: "empty-pip-name".to_string(),
                message: format!("Dependency '{}' has an empty package name", id.name),
                dependency: Some(id.name.clone()),
            });
        }

        let bounds = [id.range.min.as_deref(), id.range.max.as_deref()];
        if bounds.into_iter().flatten().any(|b| b.trim().is_empty()) {
            errors.push(ValidationError {
                rule: "empty-bound".to_string(),
                message: format!("Dependency '{}' has an empty version bound", id.name),
                dependency: Some(id.name.clone()),
            });
        }
    }

    errors
}

fn validate_printers(config: &DephandConfig) -> Vec<ValidationError> {
    config
        .printers
        .iter()
        .filter(|name| !PRINTER_NAMES.contains(&name.as_str()))
        .map(|name| ValidationError {
            rule: "unknown-printer".to_string(),
            message: format!(
                "'{}' is not a printer (expected one of: {})",
                name,
                PRINTER_NAMES.join(", ")
            ),
            dependency: None,
        })
        .collect()
}

/// Validate a configuration, failing on the first batch of errors.
pub fn validate(config: &DephandConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(DephandError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::{Identifier, VersionRange};

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&DephandConfig::default()).is_ok());
    }

    #[test]
    fn rejects_empty_name() {
        let mut config = DephandConfig::default();
        config.dependencies.push(Identifier::new("  "));

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| e.rule == "empty-name"));
    }

    #[test]
    fn rejects_empty_pip_name_and_bound() {
        let mut config = DephandConfig::default();
        config.dependencies.push(
            Identifier::new("PIL")
                .with_pip_name("")
                .with_range(VersionRange::new(Some(""), None)),
        );

        let rules: Vec<String> = validate_config(&config)
            .into_iter()
            .map(|e| e.rule)
            .collect();
        assert_eq!(rules, vec!["empty-pip-name", "empty-bound"]);
    }

    #[test]
    fn duplicate_names_are_allowed() {
        let mut config = DephandConfig::default();
        config.dependencies.push(Identifier::new("numpy"));
        config.dependencies.push(Identifier::new("numpy"));
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn rejects_unknown_printer() {
        let config = DephandConfig {
            printers: vec!["console".to_string(), "fax".to_string()],
            ..Default::default()
        };

        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("'fax' is not a printer"));
    }

    #[test]
    fn accepts_file_printer_and_rejects_empty_report_file() {
        let mut config = DephandConfig {
            printers: vec!["file".to_string()],
            ..Default::default()
        };
        assert!(validate(&config).is_ok());

        config.report_file = Some(std::path::PathBuf::new());
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule, "empty-report-file");
    }

    #[test]
    fn collects_all_errors() {
        let mut config = DephandConfig {
            printers: vec!["fax".to_string()],
            ..Default::default()
        };
        config.dependencies.push(Identifier::new(""));

        assert_eq!(validate_config(&config).len(), 2);
    }
}
