//! Search helpers over controller inventory documents

use serde_json::{Map, Value};

/// Every value stored under `key`, at any depth, in document order
pub fn find_key_values<'a>(doc: &'a Value, key: &str) -> Vec<&'a Value> {
    let mut found = Vec::new();
    collect_key_values(doc, key, &mut found);
    found
}

fn collect_key_values<'a>(doc: &'a Value, key: &str, found: &mut Vec<&'a Value>) {
    match doc {
        Value::Object(map) => {
            for (k, v) in map {
                if k == key {
                    found.push(v);
                }
                collect_key_values(v, key, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_key_values(item, key, found);
            }
        }
        _ => {}
    }
}

/// First mapping in `list` that holds `key`
pub fn find_map_in_list<'a>(list: &'a [Value], key: &str) -> Option<&'a Map<String, Value>> {
    list.iter()
        .filter_map(Value::as_object)
        .find(|map| map.contains_key(key))
}

/// Copy of `doc` with `pattern` removed from every string value
pub fn strip_str_in_values(doc: &Value, pattern: &str) -> Value {
    match doc {
        Value::String(s) => Value::String(s.replace(pattern, "")),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| strip_str_in_values(item, pattern))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), strip_str_in_values(v, pattern)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Render a scalar JSON value as plain text (strings without quotes)
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_key_values_nested() {
        let doc = json!({
            "node": [{
                "id": "openflow:1",
                "flow-node-inventory:software": "OVS 2.3",
                "node-connector": [{"id": "openflow:1:1"}, {"id": "openflow:1:2"}]
            }]
        });
        let ids = find_key_values(&doc, "id");
        assert_eq!(ids.len(), 3);
        assert_eq!(find_key_values(&doc, "flow-node-inventory:software"), vec![&json!("OVS 2.3")]);
        assert!(find_key_values(&doc, "missing").is_empty());
    }

    #[test]
    fn test_find_map_in_list() {
        let list = vec![json!("x"), json!({"a": 1}), json!({"b": 2})];
        assert_eq!(find_map_in_list(&list, "b").unwrap()["b"], 2);
        assert!(find_map_in_list(&list, "c").is_none());
    }

    #[test]
    fn test_strip_str_in_values() {
        let doc = json!({"capabilities": ["p-flow-stats", "p-table-stats"], "max_tables": 254});
        let out = strip_str_in_values(&doc, "p-");
        assert_eq!(out, json!({"capabilities": ["flow-stats", "table-stats"], "max_tables": 254}));
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!(3)).as_deref(), Some("3"));
        assert_eq!(scalar_text(&json!("LOCAL")).as_deref(), Some("LOCAL"));
        assert!(scalar_text(&json!({})).is_none());
    }
}
