// packages/interpose/src/utils/errors.rs
//! Error types shared by the registry, the proxies and wrapped targets
//!
//! Targets report their own failures with these variants too, so an error
//! raised below a proxy reaches the caller exactly as the target produced it.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, InterposeError>;

/// Interception errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterposeError {
    /// The target type declares no member with this name
    #[error("'{type_name}' object has no attribute '{name}'")]
    MissingAttribute { type_name: String, name: String },

    /// A method was read as if it were a property
    #[error("'{type_name}.{name}' is a method, not a property")]
    NotAProperty { type_name: String, name: String },

    /// A property was called as if it were a method
    #[error("'{type_name}.{name}' is a property and cannot be called")]
    NotCallable { type_name: String, name: String },

    /// The target rejected the arguments of a call
    #[error("{member}(): {message}")]
    InvalidArguments { member: String, message: String },

    /// A value had a different shape than a typed conversion required
    #[error("expected {expected}, got {got}")]
    UnexpectedValue { expected: String, got: String },

    /// A typed proxy was requested for a type outside the wrappable set
    #[error("type '{0}' is not registered as wrappable")]
    NotWrappable(String),

    /// A pre- or post-processor failed while transforming a value
    #[error("processor for '{name}' failed: {message}")]
    ProcessorFailed { name: String, message: String },

    /// A processor was configured for a member no wrappable type declares
    #[error("no wrappable type declares a member named '{0}'")]
    UnknownMember(String),

    /// A pre-processor was configured for a member that is only ever a property
    #[error("pre-processor configured for '{0}', which is a property and takes no arguments")]
    PreProcessorOnProperty(String),

    /// A configured type name is not in the descriptor catalog
    #[error("unknown type '{0}'")]
    UnknownType(String),

    /// Configuration could not be loaded or deserialized
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl InterposeError {
    pub fn missing_attribute(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingAttribute {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    pub fn invalid_arguments(member: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            member: member.into(),
            message: message.into(),
        }
    }

    pub fn unexpected_value(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::UnexpectedValue {
            expected: expected.into(),
            got: got.into(),
        }
    }

    pub fn processor_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProcessorFailed {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for InterposeError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attribute_message() {
        let err = InterposeError::missing_attribute("Element", "nonexistent");
        assert_eq!(
            err.to_string(),
            "'Element' object has no attribute 'nonexistent'"
        );
    }

    #[test]
    fn test_unexpected_value_message() {
        let err = InterposeError::unexpected_value("a list", "int");
        assert_eq!(err.to_string(), "expected a list, got int");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: InterposeError = config::ConfigError::Message("bad key".to_string()).into();
        assert!(matches!(err, InterposeError::ConfigError(ref msg) if msg.contains("bad key")));
    }
}
