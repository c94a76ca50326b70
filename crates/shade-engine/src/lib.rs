//! Shade Weaving Engine
//!
//! This crate rewrites classes so every member routes through a
//! [`DispatchProtocol`] before (or instead of) running its own code:
//! - **Model**: classes, members, modifiers and the class pool (`model` module)
//! - **IR**: the statement tree weavers produce (`ir` module)
//! - **Weaver**: method and constructor weaving, planning, batches (`weaver` module)
//! - **Emit**: Java source, IR and JSON backends (`emit` module)
//! - **VM**: a reference interpreter for woven bodies (`vm` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use shade_engine::{PoolDocument, WeaveConfig, Weaver};
//!
//! let pool = PoolDocument::from_file("pool.json".as_ref())?.into_pool();
//! let config = WeaveConfig::default();
//!
//! let (woven, report) = Weaver::new(&pool, &config).weave_named("com.example.Foo")?;
//! println!("{}", report);
//! ```
//!
//! [`DispatchProtocol`]: shade_sdk::DispatchProtocol

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Weaving configuration (`shade.toml`)
pub mod config;

/// Output backends
pub mod emit;

/// Weaving errors
pub mod error;

/// Weaving IR
pub mod ir;

/// Class model and pool
pub mod model;

/// Reference interpreter
pub mod vm;

/// Method and constructor weaving
pub mod weaver;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{ConfigError, IdentityMethod, PrefixGuardFallback, WeaveConfig};
pub use emit::{Backend, EmitError, IrBackend, JavaSourceBackend, JsonBackend};
pub use error::{WeaveError, WeaveResult};
pub use ir::{GeneratedBody, MethodBody};
pub use model::{
    Callable, ClassPool, ClassUnit, ConstructorUnit, LoadError, MethodUnit, Modifiers,
    PoolDocument,
};
pub use vm::{Interpreter, VmError};
pub use weaver::{weave_batch, Action, BatchOutcome, WeavePlan, WeaveReport, Weaver};

pub use shade_sdk;
