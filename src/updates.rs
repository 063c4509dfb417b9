//! Update inspection for declared dependencies.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::context::Context;
use crate::pip::parse_outdated;

/// A declared dependency with a newer release inside its version range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateCandidate {
    pub name: String,
    pub pip_name: String,
    pub current: String,
    pub latest: String,
    pub checked_at: DateTime<Utc>,
}

/// pip prints canonical project names, so compare case-insensitively and
/// treat `_`, `-` and `.` as equal.
fn normalize(name: &str) -> String {
    name.to_ascii_lowercase().replace(['_', '.'], "-")
}

impl Context {
    /// Every outdated package in the environment, keyed by package name, as
    /// `(current, latest)`.
    ///
    /// Never fails: if pip cannot be run the map is empty, and if it exits
    /// non-zero whatever rows it printed are kept.
    pub fn list_outdated_packages(&self) -> BTreeMap<String, (String, String)> {
        let args = self.package_manager.list_outdated_args();
        let result = match self.runner.run(self.package_manager.python(), &args) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Could not list outdated packages: {}", e);
                return BTreeMap::new();
            }
        };
        if !result.success {
            tracing::warn!(
                "pip list --outdated exited with {:?}",
                result.exit_code
            );
        }
        let outdated = parse_outdated(&result.stdout);
        tracing::debug!("{} outdated packages", outdated.len());
        outdated
    }

    /// Outdated declared dependencies whose latest release satisfies the
    /// declared range, in declaration order.
    pub fn available_updates(&self) -> Vec<UpdateCandidate> {
        let outdated: BTreeMap<String, (String, String)> = self
            .list_outdated_packages()
            .into_iter()
            .map(|(name, versions)| (normalize(&name), versions))
            .collect();
        let checked_at = Utc::now();

        self.registry
            .all()
            .iter()
            .filter_map(|dep| {
                let (current, latest) = outdated.get(&normalize(dep.pip_name()))?;
                if !dep.version_range().contains(latest) {
                    tracing::debug!(
                        "{} {} is outside {}, not offered",
                        dep.pip_name(),
                        latest,
                        dep.version_range()
                    );
                    return None;
                }
                Some(UpdateCandidate {
                    name: dep.name().to_string(),
                    pip_name: dep.pip_name().to_string(),
                    current: current.clone(),
                    latest: latest.clone(),
                    checked_at,
                })
            })
            .collect()
    }
}
