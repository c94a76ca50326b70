//! Subcommand implementations

pub mod plan;
pub mod weave;

use anyhow::Context;
use shade_engine::{
    Backend, ClassPool, IrBackend, JavaSourceBackend, JsonBackend, PoolDocument, WeaveConfig,
};
use std::path::Path;

/// Output format of `shade weave`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EmitFormat {
    /// Java source with the dispatch blocks written out
    Java,
    /// Human-readable weaving IR
    Ir,
    /// Class-pool document JSON
    Json,
}

impl EmitFormat {
    pub fn backend(self, config: &WeaveConfig) -> Box<dyn Backend> {
        match self {
            EmitFormat::Java => Box::new(JavaSourceBackend::from_config(config)),
            EmitFormat::Ir => Box::new(IrBackend),
            EmitFormat::Json => Box::new(JsonBackend),
        }
    }
}

/// `--config` file, or defaults
pub fn load_config(path: Option<&Path>) -> anyhow::Result<WeaveConfig> {
    match path {
        Some(path) => WeaveConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(WeaveConfig::default()),
    }
}

/// Class pool built from a pool document
pub fn load_pool(path: &Path) -> anyhow::Result<ClassPool> {
    let doc = PoolDocument::from_file(path)
        .with_context(|| format!("failed to load class pool {}", path.display()))?;
    Ok(doc.into_pool())
}

/// Requested classes, or every weavable class in the pool when none are named
pub fn select_classes(pool: &ClassPool, requested: &[String]) -> Vec<String> {
    if !requested.is_empty() {
        return requested.to_vec();
    }
    pool.user_classes()
        .filter(|class| !class.is_interface())
        .map(|class| class.name().to_string())
        .collect()
}
