//! Diagnostic dump written when an install run does not end fully imported.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::context::Context;
use crate::deps::DependencyView;
use crate::shell::platform_summary;

/// Shown after the diagnostic dump of a failed run.
pub const REMEDIATION: &str = "Some dependencies could not be installed. Restart the host \
application and retry the installation; if the problem persists, include the diagnostic \
output above in a bug report.";

/// Environment snapshot taken at the end of a failed run.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub platform: String,
    pub python: PathBuf,
    pub host_executable: Option<PathBuf>,
    pub dependencies: Vec<DependencyReport>,
}

/// One dependency's state plus the module handle it resolved to, if any.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyReport {
    #[serde(flatten)]
    pub view: DependencyView,
    pub module: Option<String>,
}

impl DiagnosticReport {
    pub fn collect(ctx: &Context) -> Self {
        Self {
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            platform: platform_summary(),
            python: ctx.package_manager().python().to_path_buf(),
            host_executable: std::env::current_exe().ok(),
            dependencies: ctx
                .registry()
                .all()
                .iter()
                .map(|d| DependencyReport {
                    view: d.view(),
                    module: d.module().map(ToString::to_string),
                })
                .collect(),
        }
    }

    /// Render as printer lines.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "---- dephandler diagnostics ({}) ----",
                self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            format!("dephandler: {}", self.version),
            format!("platform: {}", self.platform),
            format!("python: {}", self.python.display()),
        ];
        if let Some(exe) = &self.host_executable {
            lines.push(format!("host: {}", exe.display()));
        }
        for dep in &self.dependencies {
            let v = &dep.view;
            let state = if v.imported {
                "imported"
            } else if v.wrong_version {
                "wrong version"
            } else if v.installed {
                "installed, not imported"
            } else {
                "missing"
            };
            lines.push(format!(
                "{} ({} {}): {} [{}]",
                v.name,
                v.pip_name,
                v.version_range,
                state,
                dep.module.as_deref().unwrap_or("no module")
            ));
        }
        lines.push("----".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::{MockImporter, VersionRange};
    use crate::pip::PackageManager;
    use crate::shell::MockRunner;

    #[test]
    fn report_lists_every_dependency_state() {
        let importer = MockImporter::new();
        importer.install("alpha", "1.0");
        importer.install("beta", "1.0");
        let mut ctx = Context::new(
            PackageManager::new("/usr/bin/python3"),
            Box::new(importer),
            Box::new(MockRunner::new()),
        );
        ctx.declare("alpha").unwrap();
        ctx.declare(("beta", VersionRange::at_least("2.0"))).unwrap();
        ctx.declare(("NEM", "Non_Existing_Module")).unwrap();

        let lines = DiagnosticReport::collect(&ctx).lines();
        assert!(lines[0].starts_with("---- dephandler diagnostics"));
        assert!(lines.iter().any(|l| l == "python: /usr/bin/python3"));
        assert!(lines.iter().any(|l| l.starts_with("alpha (alpha [*, *]): imported")));
        assert!(lines.iter().any(|l| l.starts_with("beta (beta [2.0, *]): wrong version")));
        assert!(lines
            .iter()
            .any(|l| l == "NEM (Non_Existing_Module [*, *]): missing [no module]"));
    }

    #[test]
    fn report_serializes_flat_dependency_fields() {
        let ctx = Context::new(
            PackageManager::new("python3"),
            Box::new(MockImporter::new()),
            Box::new(MockRunner::new()),
        );
        let json = serde_json::to_value(DiagnosticReport::collect(&ctx)).unwrap();
        assert_eq!(json["python"], "python3");
        assert!(json["dependencies"].as_array().unwrap().is_empty());
    }
}
