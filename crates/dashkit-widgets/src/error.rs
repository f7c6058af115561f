//! Error types for dashkit-widgets.

use thiserror::Error;

/// Errors raised while constructing a flyout menu.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlyoutError {
    /// A required owner callback was not supplied.
    #[error("missing required callback: {0}")]
    MissingCallback(&'static str),
}

/// Errors raised while loading widget configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid YAML or does not match the schema.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A field parsed but its value is out of range.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Offending field
        field: String,
        /// What is wrong with it
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_callback_display() {
        let err = FlyoutError::MissingCallback("on_apply");
        assert_eq!(err.to_string(), "missing required callback: on_apply");
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            field: "precision".to_string(),
            message: "must be at most 100".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for 'precision': must be at most 100"
        );
    }

    #[test]
    fn test_yaml_error_converts() {
        let parse: Result<Vec<u32>, _> = serde_yaml_ng::from_str("[1, two");
        let err: ConfigError = parse.unwrap_err().into();
        assert!(matches!(err, ConfigError::Yaml(_)));
        assert!(err.to_string().starts_with("YAML parse error"));
    }
}
