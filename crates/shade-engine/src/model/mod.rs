//! Class model
//!
//! The in-memory form of the classes weaving reads and writes: classes with
//! their constructors and methods, modifier sets, and the pool used to
//! resolve superclasses and inherited members.

pub mod class;
pub mod document;
pub mod modifiers;
pub mod pool;

pub use class::{
    Callable, ClassUnit, ConstructorUnit, MethodUnit, CONSTRUCTOR_NAME, ENUM_CLASS, OBJECT_CLASS,
};
pub use document::{LoadError, PoolDocument};
pub use modifiers::Modifiers;
pub use pool::ClassPool;
