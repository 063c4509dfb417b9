//! Declared version bounds.
//!
//! Versions are compared as raw strings exactly as the package manager
//! reports them. This is lexical ordering, not semantic versioning: `"9.10"`
//! sorts before `"9.2"`. Callers relying on multi-digit components should
//! declare bounds with that in mind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive lower/upper bound on an installed version. Either side may be
/// absent, meaning unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

impl VersionRange {
    pub fn new(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: min.map(String::from),
            max: max.map(String::from),
        }
    }

    /// No bound on either side.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn at_least(min: &str) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: &str) -> Self {
        Self::new(None, Some(max))
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether `version` lies within the bounds (inclusive, lexical).
    pub fn contains(&self, version: &str) -> bool {
        let above_min = self.min.as_deref().is_none_or(|min| version >= min);
        let below_max = self.max.as_deref().is_none_or(|max| version <= max);
        above_min && below_max
    }

    /// Installer constraint suffix: `>=min`, `<=max`, `>=min,<=max`, or empty.
    pub fn constraint(&self) -> String {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => format!(">={},<={}", min, max),
            (Some(min), None) => format!(">={}", min),
            (None, Some(max)) => format!("<={}", max),
            (None, None) => String::new(),
        }
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]",
            self.min.as_deref().unwrap_or("*"),
            self.max.as_deref().unwrap_or("*")
        )
    }
}
