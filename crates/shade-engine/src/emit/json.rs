//! JSON backend
//!
//! Serializes the woven class in the same shape class-pool documents use, so
//! output can be fed back in as a document entry.

use super::{Backend, EmitError};
use crate::model::ClassUnit;

/// Emits pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

impl Backend for JsonBackend {
    fn name(&self) -> &str {
        "json"
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn emit_class(&self, class: &ClassUnit) -> Result<String, EmitError> {
        let mut out = serde_json::to_string_pretty(class)?;
        out.push('\n');
        Ok(out)
    }
}
