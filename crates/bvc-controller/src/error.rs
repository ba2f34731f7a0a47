//! Error types for controller configuration

use thiserror::Error;

/// Errors raised while loading or validating controller settings.
///
/// Request outcomes are never reported through this type; see
/// [`crate::status::OperStatus`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_message() {
        let err = Error::invalid_config("node must not be empty");
        assert_eq!(err.to_string(), "Invalid configuration: node must not be empty");
    }
}
