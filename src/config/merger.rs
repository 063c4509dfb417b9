//! Layered configuration merging.
//!
//! The user, project, and local files are merged in that order, later files
//! winning. Mappings merge key by key; anything else in the overlay (a list
//! of dependencies, a scalar) replaces the base value outright. An explicit
//! `null` in the overlay removes the key, so a local file can unset `title`.

use serde_yaml::Value;

/// Merge `overlay` into `base` in place.
fn merge_into(base: &mut Value, overlay: &Value) {
    let (Value::Mapping(base_map), Value::Mapping(overlay_map)) = (&mut *base, overlay) else {
        *base = overlay.clone();
        return;
    };
    for (key, value) in overlay_map {
        if value.is_null() {
            base_map.remove(key);
            continue;
        }
        match base_map.get_mut(key) {
            Some(existing) => merge_into(existing, value),
            None => {
                base_map.insert(key.clone(), value.clone());
            }
        }
    }
}

/// `overlay` layered over `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay);
    merged
}

/// Layer `configs` in order over an empty mapping.
pub fn merge_configs(configs: &[Value]) -> Value {
    let mut merged = Value::Mapping(Default::default());
    for config in configs {
        merge_into(&mut merged, config);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn scalars_are_overridden() {
        let base = yaml("python: python3\nupgrade_pip: true");
        let overlay = yaml("python: /opt/blender/python/bin/python3.10");

        let result = deep_merge(&base, &overlay);
        assert_eq!(result["python"], "/opt/blender/python/bin/python3.10");
        assert_eq!(result["upgrade_pip"], true);
    }

    #[test]
    fn dependency_lists_are_replaced_not_merged() {
        let base = yaml("dependencies: [numpy, scipy]");
        let overlay = yaml("dependencies: [requests]");

        let result = deep_merge(&base, &overlay);
        assert_eq!(result["dependencies"].as_sequence().unwrap().len(), 1);
        assert_eq!(result["dependencies"][0], "requests");
    }

    #[test]
    fn null_removes_key() {
        let base = yaml("title: Addon\npython: python3");
        let overlay = yaml("title: null");

        let result = deep_merge(&base, &overlay);
        assert!(result.get("title").is_none());
        assert_eq!(result["python"], "python3");
    }

    #[test]
    fn merge_configs_applies_in_order() {
        let configs = vec![
            yaml("printers: [console]\npython: python3"),
            yaml("printers: [spinner]"),
            yaml("printers: [tracing]"),
        ];

        let result = merge_configs(&configs);
        assert_eq!(result["printers"][0], "tracing");
        assert_eq!(result["python"], "python3");
    }

    #[test]
    fn nested_mappings_merge_key_by_key() {
        let base = yaml("extra:\n  index: https://pypi.org/simple\n  timeout: 30");
        let overlay = yaml("extra:\n  timeout: 5");

        let result = deep_merge(&base, &overlay);
        assert_eq!(result["extra"]["index"], "https://pypi.org/simple");
        assert_eq!(result["extra"]["timeout"], 5);
    }

    #[test]
    fn merge_of_nothing_is_empty_mapping() {
        assert!(merge_configs(&[]).as_mapping().unwrap().is_empty());
    }
}
