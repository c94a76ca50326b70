//! Error types for the dispatch contract

/// Errors raised while classifying or parsing type references
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// The type name is empty or contains characters no class name can hold
    #[error("Invalid type name: '{0}'")]
    InvalidTypeName(String),

    /// A JVM descriptor could not be parsed
    #[error("Malformed descriptor '{descriptor}': {reason}")]
    MalformedDescriptor {
        /// The descriptor text
        descriptor: String,
        /// What went wrong
        reason: String,
    },

    /// `void` used where only value types are allowed (parameters, array elements)
    #[error("'void' is not a value type")]
    VoidNotAllowed,
}

/// Errors surfaced by a dispatch protocol implementation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProtocolError {
    /// A substitute implementation raised an exception
    #[error("Substitute for {class}.{method} failed: {message}")]
    SubstituteFailed {
        /// Class the intercepted member belongs to
        class: String,
        /// Intercepted member name
        method: String,
        /// Failure description
        message: String,
    },

    /// A substitute returned a value that does not fit the declared return type
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Any other relay failure
    #[error("{0}")]
    Relay(String),
}

impl From<String> for ProtocolError {
    fn from(s: String) -> Self {
        ProtocolError::Relay(s)
    }
}

impl From<&str> for ProtocolError {
    fn from(s: &str) -> Self {
        ProtocolError::Relay(s.to_string())
    }
}
