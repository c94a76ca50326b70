//! Class-pool documents
//!
//! A document lists classes in JSON (`.json`) or TOML (`.toml`):
//!
//! ```toml
//! [[classes]]
//! name = "com.example.Foo"
//! modifiers = ["public"]
//!
//! [[classes.methods]]
//! name = "compute"
//! params = ["int"]
//! returns = "int"
//! modifiers = ["public", "native"]
//! ```

use super::class::{Callable, ClassUnit};
use super::pool::ClassPool;
use serde::{Deserialize, Serialize};
use shade_sdk::TypeDescriptor;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a document
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the file
    #[error("Failed to read class pool: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("Failed to parse class pool JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML
    #[error("Failed to parse class pool TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Well-formed but inconsistent content
    #[error("Invalid class pool: {0}")]
    Invalid(String),
}

/// Serialized list of classes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolDocument {
    /// Classes in declaration order
    #[serde(default)]
    pub classes: Vec<ClassUnit>,
}

impl PoolDocument {
    /// Load from a file, choosing the format by extension (TOML for `.toml`,
    /// JSON otherwise)
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Parse JSON
    pub fn from_json_str(content: &str) -> Result<Self, LoadError> {
        let doc: PoolDocument = serde_json::from_str(content)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse TOML
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        let doc: PoolDocument = toml::from_str(content)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Check names are well-formed and unique
    pub fn validate(&self) -> Result<(), LoadError> {
        let mut seen = rustc_hash::FxHashSet::default();
        for class in &self.classes {
            match TypeDescriptor::classify(class.name()) {
                Ok(ty) if ty.is_reference() && !ty.is_array() => {}
                _ => {
                    return Err(LoadError::Invalid(format!(
                        "'{}' is not a class name",
                        class.name()
                    )))
                }
            }
            if ClassPool::is_bootstrap(class.name()) {
                return Err(LoadError::Invalid(format!(
                    "'{}' is provided by the pool and cannot be redefined",
                    class.name()
                )));
            }
            if !seen.insert(class.name()) {
                return Err(LoadError::Invalid(format!(
                    "class '{}' is listed twice",
                    class.name()
                )));
            }
            let methods = class.methods();
            for (idx, method) in methods.iter().enumerate() {
                if methods[..idx]
                    .iter()
                    .any(|m| m.matches(method.name(), method.params()))
                {
                    return Err(LoadError::Invalid(format!(
                        "{} declares {}{} more than once",
                        class.name(),
                        method.name(),
                        method.descriptor()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Bootstrap pool with every listed class added
    pub fn into_pool(self) -> ClassPool {
        let mut pool = ClassPool::bootstrap();
        for class in self.classes {
            pool.insert(class);
        }
        pool
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
