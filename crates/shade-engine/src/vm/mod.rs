//! Reference interpreter
//!
//! Executes member bodies, woven or not, against a [`DispatchProtocol`] so the
//! call-time behaviour of generated dispatch blocks can be observed without a
//! JVM.
//!
//! [`DispatchProtocol`]: shade_sdk::DispatchProtocol

mod convert;
pub mod interpreter;

pub use convert::unbox;
pub use interpreter::Interpreter;

use shade_sdk::ProtocolError;

/// Maximum call depth before [`VmError::StackOverflow`]
pub const MAX_CALL_DEPTH: usize = 256;

/// Interpreter errors
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum VmError {
    /// Call depth exceeded [`MAX_CALL_DEPTH`]
    #[error("Stack overflow")]
    StackOverflow,

    /// Receiver required but `null` or absent
    #[error("Null pointer exception")]
    NullPointer,

    /// Abstract or native member without code was executed
    #[error("No body to execute for {member}")]
    NoBody {
        /// Member description
        member: String,
    },

    /// A `throw` statement ran
    #[error("{class}: {message}")]
    Thrown {
        /// Exception class
        class: String,
        /// Exception message
        message: String,
    },

    /// A value does not fit the type it is used as
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type
        expected: String,
        /// Actual value description
        got: String,
    },

    /// Class missing from the pool
    #[error("Class not found: {0}")]
    UnknownClass(String),

    /// No method or constructor with the requested signature
    #[error("No such member: {class}.{name}({params})")]
    NoSuchMember {
        /// Class searched
        class: String,
        /// Member name
        name: String,
        /// Parameter type names, comma separated
        params: String,
    },

    /// Wrong number of arguments
    #[error("Expected {expected} arguments, got {got}")]
    ArityMismatch {
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// The dispatch protocol failed
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Malformed body reached at run time
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}
