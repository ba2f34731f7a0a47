//! Structural key renaming between controller wire naming and model naming
//!
//! The controller hyphenates multi-word keys (`idle-timeout`) while the
//! model uses underscores. Two keys are exceptions and stay underscored on
//! the wire: `table_id` and `cookie_mask`. Renaming walks the document tree
//! and touches keys only, never string values.

use serde_json::{Map, Value};

/// Statistics container key as it reads after hyphens become underscores
pub const STATISTICS_KEY: &str = "opendaylight_flow_statistics:flow_statistics";

/// Model name of the statistics container
pub const STATISTICS_FIELD: &str = "flow_statistics";

/// Keys kept in underscore form on the wire
pub const UNDERSCORED_WIRE_KEYS: [&str; 2] = ["table_id", "cookie_mask"];

/// Rewrite every key from controller naming to model naming
pub fn underscore_keys(value: Value) -> Value {
    rename_keys(value, &|key| {
        let key = key.replace('-', "_");
        if key == STATISTICS_KEY {
            STATISTICS_FIELD.to_string()
        } else {
            key
        }
    })
}

/// Rewrite every key from model naming to controller wire naming
pub fn hyphenate_keys(value: Value) -> Value {
    rename_keys(value, &|key| {
        if UNDERSCORED_WIRE_KEYS.contains(&key) {
            key.to_string()
        } else {
            key.replace('_', "-")
        }
    })
}

/// Drop every mapping entry holding `null`, at any depth
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

fn rename_keys(value: Value, rename: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(rename(&k), rename_keys(v, rename));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(|v| rename_keys(v, rename)).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_underscore_keys_renames_statistics() {
        let doc = json!({
            "idle-timeout": 0,
            "opendaylight-flow-statistics:flow-statistics": {"packet-count": 4},
            "flow-name": "keep-my-hyphens"
        });
        let out = underscore_keys(doc);
        assert_eq!(out["idle_timeout"], 0);
        assert_eq!(out["flow_statistics"]["packet_count"], 4);
        // values are untouched
        assert_eq!(out["flow_name"], "keep-my-hyphens");
    }

    #[test]
    fn test_hyphenate_keeps_exceptions() {
        let doc = json!({
            "table_id": 0,
            "cookie_mask": 255,
            "hard_timeout": 10,
            "instructions": {"instruction": [{"apply_actions": {"action": []}}]}
        });
        let out = hyphenate_keys(doc);
        assert!(out.get("table_id").is_some());
        assert!(out.get("cookie_mask").is_some());
        assert!(out.get("hard-timeout").is_some());
        assert!(out["instructions"]["instruction"][0].get("apply-actions").is_some());
    }

    #[test]
    fn test_strip_nulls_recursive() {
        let doc = json!({"a": null, "b": {"c": null, "d": 1}, "e": [{"f": null}]});
        assert_eq!(strip_nulls(doc), json!({"b": {"d": 1}, "e": [{}]}));
    }
}
