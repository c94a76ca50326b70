//! Backend-agnostic emission traits and implementations
//!
//! Weavers only produce IR. A [`Backend`] lowers a woven [`ClassUnit`] to one
//! output format.

pub mod java;
pub mod json;

pub use java::JavaSourceBackend;
pub use json::JsonBackend;

use crate::ir::PrettyPrint;
use crate::model::ClassUnit;

/// Error during emission
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// The IR has no rendering in this format
    #[error("Cannot emit {member}: {reason}")]
    Unsupported {
        /// Member description
        member: String,
        /// What could not be rendered
        reason: String,
    },
    /// Serialization failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// An output format for woven classes
pub trait Backend: Send + Sync {
    /// Backend name (for diagnostics and `--emit`)
    fn name(&self) -> &str;

    /// File extension of emitted artifacts, without the dot
    fn extension(&self) -> &str;

    /// Render one class
    fn emit_class(&self, class: &ClassUnit) -> Result<String, EmitError>;
}

/// Human-readable IR, for debugging
#[derive(Debug, Clone, Copy, Default)]
pub struct IrBackend;

impl Backend for IrBackend {
    fn name(&self) -> &str {
        "ir"
    }

    fn extension(&self) -> &str {
        "ir"
    }

    fn emit_class(&self, class: &ClassUnit) -> Result<String, EmitError> {
        Ok(class.pretty_print())
    }
}
