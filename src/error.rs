//! Error types for common-table
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use std::collections::BTreeMap;

use snafu::Snafu;

/// Main error type for the crate
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (settings files)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// The injected list API failed
    #[snafu(display("Fetch failed: {message}"))]
    Fetch { message: String },

    /// A caller supplied callback (submit, switch) failed
    #[snafu(display("Callback failed: {message}"))]
    Callback { message: String },

    /// Form validation rejected one or more fields
    #[snafu(display("Validation failed: {}", summarize(errors)))]
    Validation { errors: BTreeMap<String, String> },
}

fn summarize(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Shorthand for a fetch failure
    pub fn fetch(message: impl Into<String>) -> Self {
        Error::Fetch {
            message: message.into(),
        }
    }

    /// Shorthand for a callback failure
    pub fn callback(message: impl Into<String>) -> Self {
        Error::Callback {
            message: message.into(),
        }
    }

    /// Per-field messages when this is a validation failure
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Error::Validation { errors } => Some(errors),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_lists_fields() {
        let mut errors = BTreeMap::new();
        errors.insert("name".to_string(), "Name is required".to_string());
        errors.insert("age".to_string(), "too young".to_string());
        let err = Error::Validation { errors };
        assert_eq!(
            err.to_string(),
            "Validation failed: age: too young; name: Name is required"
        );
        assert_eq!(err.field_errors().map(|e| e.len()), Some(2));
    }

    #[test]
    fn test_fetch_is_not_validation() {
        assert!(Error::fetch("boom").field_errors().is_none());
    }
}
