//! The pip package manager boundary.
//!
//! [`PackageManager`] builds the argument lists for every pip invocation the
//! pipeline makes; the parsers for pip's text output live in [`outdated`]
//! and [`versions`]. Running the commands is left to a
//! [`CommandRunner`](crate::shell::CommandRunner).

pub mod outdated;
pub mod versions;

use std::path::{Path, PathBuf};

pub use outdated::parse_outdated;
pub use versions::parse_available_versions;

/// Version token no release can match, used to make pip list candidates.
const UNSATISFIABLE_VERSION: &str = "dephandler-no-such-version";

/// Settings for invoking pip through an interpreter (`<python> -m pip`).
#[derive(Debug, Clone)]
pub struct PackageManager {
    python: PathBuf,
    user_install: bool,
    upgrade_pip: bool,
}

impl PackageManager {
    pub fn new(python: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            user_install: false,
            upgrade_pip: true,
        }
    }

    /// Install into the user site directory (`--user`).
    pub fn with_user_install(mut self, user_install: bool) -> Self {
        self.user_install = user_install;
        self
    }

    /// Upgrade pip itself once it is known to be present.
    pub fn with_upgrade_pip(mut self, upgrade_pip: bool) -> Self {
        self.upgrade_pip = upgrade_pip;
        self
    }

    /// The interpreter every command is run with.
    pub fn python(&self) -> &Path {
        &self.python
    }

    pub fn upgrades_pip(&self) -> bool {
        self.upgrade_pip
    }

    fn pip(&self, rest: &[&str]) -> Vec<String> {
        let mut args = vec!["-m".to_string(), "pip".to_string()];
        args.extend(rest.iter().map(|s| s.to_string()));
        args
    }

    fn push_user(&self, args: &mut Vec<String>) {
        if self.user_install {
            args.push("--user".to_string());
        }
    }

    /// `python -m ensurepip --upgrade`
    pub fn ensurepip_args(&self) -> Vec<String> {
        let mut args = vec![
            "-m".to_string(),
            "ensurepip".to_string(),
            "--upgrade".to_string(),
        ];
        self.push_user(&mut args);
        args
    }

    /// `python -m pip install --upgrade pip`
    pub fn upgrade_self_args(&self) -> Vec<String> {
        let mut args = self.pip(&["install", "--upgrade"]);
        self.push_user(&mut args);
        args.push("pip".to_string());
        args
    }

    /// Install or upgrade one requirement such as `Pillow>=9.0,<=9.2`.
    pub fn install_args(&self, requirement: &str) -> Vec<String> {
        let mut args = self.pip(&[
            "install",
            "--upgrade",
            "--upgrade-strategy",
            "only-if-needed",
        ]);
        self.push_user(&mut args);
        args.push(requirement.to_string());
        args
    }

    /// `python -m pip install pkg==version`, without upgrading anything else.
    pub fn change_version_args(&self, pip_name: &str, version: &str) -> Vec<String> {
        let mut args = self.pip(&["install"]);
        self.push_user(&mut args);
        args.push(format!("{}=={}", pip_name, version));
        args
    }

    /// `python -m pip list --outdated`
    pub fn list_outdated_args(&self) -> Vec<String> {
        let mut args = self.pip(&["list", "--outdated"]);
        self.push_user(&mut args);
        args
    }

    /// An install request for a version that cannot exist, so pip's error
    /// lists the versions it could have picked.
    pub fn available_versions_args(&self, pip_name: &str) -> Vec<String> {
        self.pip(&["install", &format!("{}==={}", pip_name, UNSATISFIABLE_VERSION)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_args_carry_requirement_last() {
        let pm = PackageManager::new("python3");
        let args = pm.install_args("Pillow>=9.0");
        assert_eq!(args[..3], ["-m", "pip", "install"]);
        assert!(args.contains(&"only-if-needed".to_string()));
        assert_eq!(args.last().unwrap(), "Pillow>=9.0");
        assert!(!args.contains(&"--user".to_string()));
    }

    #[test]
    fn user_install_adds_flag() {
        let pm = PackageManager::new("python3").with_user_install(true);
        assert!(pm.install_args("numpy").contains(&"--user".to_string()));
        assert!(pm.ensurepip_args().contains(&"--user".to_string()));
        assert_eq!(pm.upgrade_self_args().last().unwrap(), "pip");
    }

    #[test]
    fn change_version_pins_without_upgrade_strategy() {
        let pm = PackageManager::new("python3").with_user_install(true);
        let args = pm.change_version_args("Pillow", "9.1.1");
        assert_eq!(args, ["-m", "pip", "install", "--user", "Pillow==9.1.1"]);
    }

    #[test]
    fn ensurepip_does_not_go_through_pip() {
        let args = PackageManager::new("python3").ensurepip_args();
        assert_eq!(args[..2], ["-m", "ensurepip"]);
    }

    #[test]
    fn available_versions_uses_arbitrary_equality() {
        let args = PackageManager::new("python3").available_versions_args("Pillow");
        assert_eq!(args.last().unwrap(), "Pillow===dephandler-no-such-version");
    }

    #[test]
    fn upgrade_pip_defaults_on() {
        assert!(PackageManager::new("python3").upgrades_pip());
        assert!(!PackageManager::new("python3")
            .with_upgrade_pip(false)
            .upgrades_pip());
    }
}
