//! Weave configuration (shade.toml)
//!
//! ```toml
//! protocol_class = "org.shade.internal.ShadowDispatch"
//! prefix_guard_fallback = "default-value"
//! workers = 0
//!
//! [[identity_methods]]
//! name = "equals"
//! descriptor = "(Ljava/lang/Object;)Z"
//! ```

use serde::{Deserialize, Serialize};
use shade_sdk::{DescriptorError, MethodDescriptor, TypeDescriptor};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Well-formed but invalid settings
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// What a prefix guard does when the relay returns the null sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixGuardFallback {
    /// Return the type default without running the original statements
    #[default]
    DefaultValue,
    /// Continue into the original statements
    FallThrough,
}

/// An inherited method always made interceptable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMethod {
    /// Method name
    pub name: String,
    /// JVM method descriptor, e.g. `()I`
    pub descriptor: String,
}

impl IdentityMethod {
    /// Create from a name and descriptor
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    /// Parsed parameter list and return type
    pub fn signature(&self) -> Result<MethodDescriptor, DescriptorError> {
        MethodDescriptor::parse(&self.descriptor)
    }
}

fn default_protocol_class() -> String {
    "org.shade.internal.ShadowDispatch".to_string()
}

fn default_identity_methods() -> Vec<IdentityMethod> {
    vec![
        IdentityMethod::new("equals", "(Ljava/lang/Object;)Z"),
        IdentityMethod::new("hashCode", "()I"),
        IdentityMethod::new("toString", "()Ljava/lang/String;"),
    ]
}

/// Weaving settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeaveConfig {
    /// Runtime class holding the dispatch entry points, referenced by emitted
    /// Java source
    #[serde(default = "default_protocol_class")]
    pub protocol_class: String,

    /// Inherited methods woven through a synthesized override
    #[serde(default = "default_identity_methods")]
    pub identity_methods: Vec<IdentityMethod>,

    /// Null-sentinel behaviour of prefix guards
    #[serde(default)]
    pub prefix_guard_fallback: PrefixGuardFallback,

    /// Batch worker threads (0 = one per CPU)
    #[serde(default)]
    pub workers: usize,
}

impl Default for WeaveConfig {
    fn default() -> Self {
        Self {
            protocol_class: default_protocol_class(),
            identity_methods: default_identity_methods(),
            prefix_guard_fallback: PrefixGuardFallback::default(),
            workers: 0,
        }
    }
}

impl WeaveConfig {
    /// Load from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: WeaveConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        match TypeDescriptor::classify(&self.protocol_class) {
            Ok(ty) if ty.is_reference() && !ty.is_array() => {}
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "protocol_class '{}' is not a class name",
                    self.protocol_class
                )))
            }
        }

        for method in &self.identity_methods {
            if method.name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "identity method name cannot be empty".to_string(),
                ));
            }
            method.signature().map_err(|e| {
                ConfigError::ValidationError(format!("identity method '{}': {}", method.name, e))
            })?;
        }
        Ok(())
    }

    /// Worker threads for batch weaving
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get()
        } else {
            self.workers
        }
    }

    /// Identity methods with parsed signatures
    pub fn identity_signatures(&self) -> Result<Vec<(&str, MethodDescriptor)>, DescriptorError> {
        self.identity_methods
            .iter()
            .map(|m| Ok((m.name.as_str(), m.signature()?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WeaveConfig::from_toml_str("").unwrap();
        assert_eq!(config, WeaveConfig::default());
        assert_eq!(config.identity_methods.len(), 3);
        assert_eq!(config.prefix_guard_fallback, PrefixGuardFallback::DefaultValue);
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_parse_overrides() {
        let config = WeaveConfig::from_toml_str(
            r#"
protocol_class = "com.example.Internals"
prefix_guard_fallback = "fall-through"
workers = 3

[[identity_methods]]
name = "hashCode"
descriptor = "()I"
"#,
        )
        .unwrap();
        assert_eq!(config.protocol_class, "com.example.Internals");
        assert_eq!(config.prefix_guard_fallback, PrefixGuardFallback::FallThrough);
        assert_eq!(config.worker_count(), 3);
        let sigs = config.identity_signatures().unwrap();
        assert_eq!(sigs.len(), 1);
        assert_eq!(sigs[0].0, "hashCode");
        assert_eq!(sigs[0].1.ret, TypeDescriptor::Int);
    }

    #[test]
    fn test_rejects_bad_descriptor() {
        let result = WeaveConfig::from_toml_str(
            r#"
[[identity_methods]]
name = "equals"
descriptor = "(Ljava/lang/Object)Z"
"#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_empty_protocol_class() {
        let result = WeaveConfig::from_toml_str("protocol_class = \"\"");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            WeaveConfig::from_toml_str("wokers = 2"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
