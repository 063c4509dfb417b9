//! Parsing `pip list --outdated`.

use std::collections::BTreeMap;

/// Map of package name to `(current, latest)` from the tabular output:
///
/// ```text
/// Package    Version Latest Type
/// ---------- ------- ------ -----
/// Pillow     9.1.1   9.2.0  wheel
/// ```
///
/// Output that does not open with the `Package` header and a dashed
/// separator row yields an empty map. Rows with fewer than three columns are
/// skipped.
pub fn parse_outdated(output: &str) -> BTreeMap<String, (String, String)> {
    let mut lines = output.lines();
    let header = lines.next().unwrap_or_default();
    let separator = lines.next().unwrap_or_default();
    if !is_header(header) || !is_separator(separator) {
        return BTreeMap::new();
    }

    lines
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let name = cols.next()?;
            let current = cols.next()?;
            let latest = cols.next()?;
            Some((name.to_string(), (current.to_string(), latest.to_string())))
        })
        .collect()
}

fn is_header(line: &str) -> bool {
    line.trim_start().starts_with("Package")
}

fn is_separator(line: &str) -> bool {
    line.contains('-') && line.chars().all(|c| c == '-' || c.is_whitespace())
}
