//! Shared decode/encode capability for the model's value records
//!
//! Every record in this crate (field groups, `Match`, `FlowEntry`) is built
//! from a generic JSON mapping whose keys are already in underscore form
//! (see [`crate::naming`]). Unrecognized keys are ignored, so documents from
//! newer controllers still decode.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// A value record decodable from, and encodable to, a JSON mapping
pub trait Document: Serialize + DeserializeOwned {
    /// Record name used in error messages
    const NAME: &'static str;

    /// Decode from a mapping. Non-mapping input is a type mismatch.
    fn from_document(doc: &Value) -> Result<Self> {
        if !doc.is_object() {
            return Err(Error::type_mismatch(Self::NAME, "dict", doc));
        }
        Ok(Self::deserialize(doc)?)
    }

    /// Encode into a mapping with absent fields omitted
    fn to_document(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Deserialize an optional identifier the controller may send either as a
/// string (`"openflow:1:3"`) or as a bare number (`3`).
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, found {}",
            crate::error::json_type_name(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Port {
        #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
        port: Option<String>,
    }

    impl Document for Port {
        const NAME: &'static str = "Port";
    }

    #[test]
    fn test_rejects_non_mapping() {
        let err = Port::from_document(&json!("openflow:1")).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { found: "string", .. }));
    }

    #[test]
    fn test_port_accepts_number_or_string() {
        let p = Port::from_document(&json!({"port": 3})).unwrap();
        assert_eq!(p.port.as_deref(), Some("3"));

        let p = Port::from_document(&json!({"port": "openflow:1:3"})).unwrap();
        assert_eq!(p.port.as_deref(), Some("openflow:1:3"));

        let p = Port::from_document(&json!({})).unwrap();
        assert!(p.port.is_none());
    }

    #[test]
    fn test_port_rejects_list() {
        assert!(Port::from_document(&json!({"port": [1]})).is_err());
    }

    #[test]
    fn test_absent_fields_omitted_on_encode() {
        let doc = Port::default().to_document().unwrap();
        assert_eq!(doc, json!({}));
    }
}
