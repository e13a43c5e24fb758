//! Deep-merge overlay for configuration trees
//!
//! Objects merge key-wise; arrays and scalars replace wholesale; a `null`
//! (or absent) override leaves the base value in place.

use serde_json::Value;

/// Merge `overlay` into `base`, recursively.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    if overlay.is_null() {
        return;
    }
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                if value.is_null() {
                    continue;
                }
                match base_map.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_objects_merge_keywise() {
        let mut base = json!({ "a": { "x": 1, "y": 2 }, "b": true });
        deep_merge(&mut base, json!({ "a": { "y": 3 } }));
        assert_eq!(base, json!({ "a": { "x": 1, "y": 3 }, "b": true }));
    }

    #[test]
    fn test_arrays_replace_wholesale() {
        let mut base = json!({ "filters": [1, 2, 3] });
        deep_merge(&mut base, json!({ "filters": [9] }));
        assert_eq!(base, json!({ "filters": [9] }));
    }

    #[test]
    fn test_scalars_replace() {
        let mut base = json!({ "file": "Changelog.md" });
        deep_merge(&mut base, json!({ "file": "HISTORY.md" }));
        assert_eq!(base["file"], "HISTORY.md");
    }

    #[test]
    fn test_null_falls_back_to_base() {
        let mut base = json!({ "template": "md", "nested": { "k": 1 } });
        deep_merge(&mut base, json!({ "template": null, "nested": null }));
        assert_eq!(base, json!({ "template": "md", "nested": { "k": 1 } }));
    }

    #[test]
    fn test_new_keys_are_added() {
        let mut base = json!({ "a": 1 });
        deep_merge(&mut base, json!({ "b": 2 }));
        assert_eq!(base, json!({ "a": 1, "b": 2 }));
    }

    #[test]
    fn test_type_mismatch_replaces() {
        let mut base = json!({ "a": { "x": 1 } });
        deep_merge(&mut base, json!({ "a": "scalar now" }));
        assert_eq!(base["a"], "scalar now");
    }
}
