//! Weaving IR
//!
//! A target-agnostic statement/expression tree. Weavers build it, backends
//! in [`crate::emit`] lower it to an output format, and the interpreter in
//! [`crate::vm`] executes it.
//!
//! # Structure
//!
//! - `Expr` / `Stmt` / `Block` - the tree itself
//! - `GeneratedBody` - sealed output of one weaving step
//! - `MethodBody` - what a member's code currently is (absent, original, woven)
//! - `validate_body` - well-formedness of generated fragments

pub mod body;
pub mod expr;
pub mod pretty;
pub mod stmt;
pub mod validate;

pub use body::{GeneratedBody, MethodBody};
pub use expr::{BinaryOp, Expr, Intrinsic, Literal, RelayCall};
pub use pretty::PrettyPrint;
pub use stmt::{Block, Stmt};
pub use validate::{validate_body, ValidationError};
