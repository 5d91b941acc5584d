//! Flattening of manifest env definitions into a plain name/value map.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::manifest::AppManifest;

/// Flat environment: variable name to literal value, in manifest order.
pub type FlatEnv = Map<String, Value>;

/// Keeps every entry that carries a literal `value` and drops the rest.
///
/// Values are copied verbatim. Only names are logged, never values.
#[tracing::instrument(skip_all, fields(entries = manifest.len()))]
pub fn flatten_env(manifest: &AppManifest) -> FlatEnv {
    let mut flat = FlatEnv::new();
    let mut skipped = 0usize;

    for entry in manifest.entries() {
        match entry.literal_value() {
            Some(value) => {
                flat.insert(entry.name.to_owned(), value.clone());
            }
            None => {
                debug!(name = entry.name, "No literal value, skipping");
                skipped += 1;
            }
        }
    }

    info!(kept = flat.len(), skipped, "Environment flattened");
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(document: Value) -> AppManifest {
        AppManifest::from_value(document).unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let flat = flatten_env(&manifest(json!({
            "env": {
                "PORT": {"value": "8080"},
                "DEBUG": {"required": false},
                "SECRET": {"value": "abc123"}
            }
        })));

        let pairs: Vec<_> = flat.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
        assert_eq!(
            pairs,
            vec![("PORT", json!("8080")), ("SECRET", json!("abc123"))]
        );
    }

    #[test]
    fn test_empty_env_gives_empty_map() {
        let flat = flatten_env(&manifest(json!({"env": {}})));
        assert!(flat.is_empty());
    }

    #[test]
    fn test_required_without_value_is_excluded() {
        let flat = flatten_env(&manifest(json!({"env": {"DATABASE_URL": {"required": true}}})));
        assert!(!flat.contains_key("DATABASE_URL"));
    }

    #[test]
    fn test_non_object_definitions_are_excluded() {
        let flat = flatten_env(&manifest(json!({
            "env": {
                "PLAIN": "some value",
                "LIST": ["value"],
                "NUMBER": 3,
                "NOTHING": null,
                "KEPT": {"value": "yes"}
            }
        })));
        let names: Vec<_> = flat.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["KEPT"]);
    }

    #[test]
    fn test_values_are_copied_verbatim() {
        let flat = flatten_env(&manifest(json!({
            "env": {
                "SPACED": {"value": "  padded  "},
                "EMPTY": {"value": ""},
                "NULLED": {"value": null},
                "NUMERIC": {"value": 42},
                "NESTED": {"value": {"inner": [1, 2]}}
            }
        })));

        assert_eq!(flat["SPACED"], json!("  padded  "));
        assert_eq!(flat["EMPTY"], json!(""));
        assert_eq!(flat["NULLED"], Value::Null);
        assert_eq!(flat["NUMERIC"], json!(42));
        assert_eq!(flat["NESTED"], json!({"inner": [1, 2]}));
    }

    #[test]
    fn test_output_keys_are_subset_of_input() {
        let m = manifest(json!({
            "env": {
                "A": {"value": "1"},
                "B": {},
                "C": {"value": "3", "required": true},
                "D": {"description": "set by add-on"}
            }
        }));
        let flat = flatten_env(&m);

        for entry in m.entries() {
            assert_eq!(
                flat.get(entry.name),
                entry.literal_value(),
                "mismatch for {}",
                entry.name
            );
        }
        assert_eq!(flat.len(), 2);
    }
}
