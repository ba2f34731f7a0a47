//! Error types for the flow-entry model

use thiserror::Error;

/// Errors raised while building or decoding flow-entry documents.
///
/// These are caller errors: a wrong-shaped argument or a violated
/// construction rule. Controller-side conditions never surface here.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Argument Shape Errors
    // ========================================================================
    #[error("{what}: wrong argument type '{found}' ('{expected}' is expected)")]
    TypeMismatch {
        what: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("flow entry accepts either JSON text or a decoded document, not both")]
    ConflictingSources,

    #[error("missing required field: {0}")]
    MissingField(String),

    // ========================================================================
    // Construction Errors
    // ========================================================================
    #[error("flow entry already has a match")]
    DuplicateMatch,

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using the model's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a type mismatch error from the offending JSON value
    pub fn type_mismatch(what: &'static str, expected: &'static str, found: &serde_json::Value) -> Self {
        Error::TypeMismatch {
            what,
            expected,
            found: json_type_name(found),
        }
    }

    /// Create a missing field error
    pub fn missing_field(name: impl Into<String>) -> Self {
        Error::MissingField(name.into())
    }

    /// Returns true if the error comes from a wrong-shaped argument
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::TypeMismatch { .. } | Error::ConflictingSources | Error::MissingField(_)
        )
    }
}

/// Name of a JSON value's type, used in error messages
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_mismatch_message() {
        let err = Error::type_mismatch("Match", "dict", &json!([1, 2]));
        assert_eq!(
            err.to_string(),
            "Match: wrong argument type 'list' ('dict' is expected)"
        );
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_duplicate_match_is_not_argument_error() {
        assert!(!Error::DuplicateMatch.is_argument_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
