//! Recovering the list of published versions from a pip error.
//!
//! pip has no stable "list versions" query across releases, so
//! [`PackageManager::available_versions_args`](super::PackageManager::available_versions_args)
//! asks for a version that cannot exist and this module scrapes the
//! `(from versions: ...)` list out of the resulting error. It is a
//! best-effort heuristic: a different message format yields an empty list.
//! Substitute a real package index query where one is available.

use std::sync::LazyLock;

use regex::Regex;

static FROM_VERSIONS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(from versions:\s*([^)]*)\)").expect("FROM_VERSIONS_REGEX must compile")
});

/// Published versions, newest first.
pub fn parse_available_versions(output: &str) -> Vec<String> {
    let Some(captures) = FROM_VERSIONS_REGEX.captures(output) else {
        return Vec::new();
    };
    let list = captures[1].trim();
    if list.is_empty() || list == "none" {
        return Vec::new();
    }
    list.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .rev()
        .map(String::from)
        .collect()
}
