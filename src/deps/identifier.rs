//! Dependency declarations.
//!
//! An [`Identifier`] is what user code (or the config file) hands to
//! [`Context::declare`](crate::Context::declare). Four shapes are accepted:
//!
//! - bare name: `"numpy"`
//! - name and package: `("PIL", "Pillow")`
//! - name and range: `("numpy", VersionRange::at_least("1.20"))`
//! - all three: `("PIL", "Pillow", VersionRange::new(Some("9.0"), None))`

use serde::{Deserialize, Serialize};

use crate::error::{DephandError, Result};

use super::version::VersionRange;

/// A declared dependency before it reaches the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IdentifierSpec")]
pub struct Identifier {
    /// Import name; unique key in the registry.
    pub name: String,
    /// Package-manager name, when it differs from the import name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pip_name: Option<String>,
    #[serde(flatten)]
    pub range: VersionRange,
    /// Submodules to expose once the dependency imports.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub submodules: Vec<String>,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_pip_name(mut self, pip_name: impl Into<String>) -> Self {
        self.pip_name = Some(pip_name.into());
        self
    }

    pub fn with_range(mut self, range: VersionRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_submodules(mut self, submodules: &[&str]) -> Self {
        self.submodules = submodules.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Package-manager name, falling back to the import name.
    pub fn pip_name(&self) -> &str {
        self.pip_name.as_deref().unwrap_or(&self.name)
    }

    /// Parse the compact command-line form `name[:pip_name][@min..max]`.
    ///
    /// Either bound may be omitted: `numpy@1.20..`, `PIL:Pillow@..9.2`.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |message: &str| DephandError::ConfigValidationError {
            message: format!("invalid dependency '{}': {}", input, message),
        };

        let (names, range) = match input.split_once('@') {
            Some((names, bounds)) => {
                let (min, max) = bounds
                    .split_once("..")
                    .ok_or_else(|| invalid("version bounds must look like min..max"))?;
                let bound = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());
                (
                    names,
                    VersionRange {
                        min: bound(min),
                        max: bound(max),
                    },
                )
            }
            None => (input, VersionRange::any()),
        };

        let (name, pip_name) = match names.split_once(':') {
            Some((name, pip)) => (name.trim(), Some(pip.trim())),
            None => (names.trim(), None),
        };
        if name.is_empty() {
            return Err(invalid("name is empty"));
        }
        if pip_name == Some("") {
            return Err(invalid("package name is empty"));
        }

        Ok(Self {
            name: name.to_string(),
            pip_name: pip_name.map(String::from),
            range,
            submodules: Vec::new(),
        })
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Identifier::new(name)
    }
}

impl From<String> for Identifier {
    fn from(name: String) -> Self {
        Identifier::new(name)
    }
}

impl From<(&str, &str)> for Identifier {
    fn from((name, pip_name): (&str, &str)) -> Self {
        Identifier::new(name).with_pip_name(pip_name)
    }
}

impl From<(&str, VersionRange)> for Identifier {
    fn from((name, range): (&str, VersionRange)) -> Self {
        Identifier::new(name).with_range(range)
    }
}

impl From<(&str, &str, VersionRange)> for Identifier {
    fn from((name, pip_name, range): (&str, &str, VersionRange)) -> Self {
        Identifier::new(name)
            .with_pip_name(pip_name)
            .with_range(range)
    }
}

/// YAML shapes accepted for a dependency entry.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdentifierSpec {
    Bare(String),
    Detailed {
        name: String,
        #[serde(default, alias = "pip_name")]
        pip: Option<String>,
        #[serde(default)]
        min: Option<String>,
        #[serde(default)]
        max: Option<String>,
        #[serde(default)]
        submodules: Vec<String>,
    },
}

impl From<IdentifierSpec> for Identifier {
    fn from(spec: IdentifierSpec) -> Self {
        match spec {
            IdentifierSpec::Bare(name) => Identifier::new(name),
            IdentifierSpec::Detailed {
                name,
                pip,
                min,
                max,
                submodules,
            } => Identifier {
                name,
                pip_name: pip,
                range: VersionRange { min, max },
                submodules,
            },
        }
    }
}
