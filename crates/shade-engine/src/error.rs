//! Weaving errors

use crate::ir::ValidationError;
use shade_sdk::DescriptorError;
use thiserror::Error;

/// Result alias for weaving operations
pub type WeaveResult<T> = Result<T, WeaveError>;

/// Errors that abort weaving of a class.
///
/// None of these are retried. Weaving is deterministic, so the only recourse
/// is to fix the input class and run again.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WeaveError {
    /// Synthesis of one member failed; `member` is its full description
    /// (modifiers, return type, qualified name, parameter types).
    #[error("problem instrumenting {member}")]
    Synthesis {
        /// Member description, taken before any modification
        member: String,
        /// Underlying failure
        #[source]
        source: Box<WeaveError>,
    },

    /// The class violates a structural requirement of weaving
    #[error("Cannot weave {class}: {reason}")]
    StructuralPrecondition {
        /// Class being woven
        class: String,
        /// What is missing or inconsistent
        reason: String,
    },

    /// A class named in the hierarchy is not in the pool
    #[error("Class not found: {name}")]
    UnknownClass {
        /// Qualified name that failed to resolve
        name: String,
    },

    /// A signature type could not be classified
    #[error("Unrepresentable signature: {0}")]
    Descriptor(#[from] DescriptorError),

    /// A generated fragment is not well-formed
    #[error("Malformed generated body: {0}")]
    Validation(#[from] ValidationError),

    /// A batch worker died before reporting
    #[error("Weaving worker for {class} did not report a result")]
    WorkerLost {
        /// Class the lost worker was assigned
        class: String,
    },
}

impl WeaveError {
    /// Wrap an error with the description of the member being synthesized
    pub fn in_member(member: impl Into<String>, source: WeaveError) -> Self {
        WeaveError::Synthesis {
            member: member.into(),
            source: Box::new(source),
        }
    }

    /// Shorthand for [`WeaveError::StructuralPrecondition`]
    pub fn structural(class: impl Into<String>, reason: impl Into<String>) -> Self {
        WeaveError::StructuralPrecondition {
            class: class.into(),
            reason: reason.into(),
        }
    }

    /// The innermost error, looking through synthesis wrappers
    pub fn root_cause(&self) -> &WeaveError {
        match self {
            WeaveError::Synthesis { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesis_message_names_member() {
        let err = WeaveError::in_member(
            "public native int com.example.Foo.compute(int)",
            WeaveError::UnknownClass {
                name: "com.example.Base".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "problem instrumenting public native int com.example.Foo.compute(int)"
        );
        assert!(matches!(err.root_cause(), WeaveError::UnknownClass { .. }));
    }
}
