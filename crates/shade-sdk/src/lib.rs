//! Shade SDK - the dispatch protocol contract
//!
//! Woven classes call back into three operations at run time: a policy
//! check, an invocation relay and value boxing. This crate defines that
//! boundary without depending on the weaving engine, so substitute
//! registries can be written against it alone.
//!
//! # Example
//!
//! ```ignore
//! use shade_sdk::{CallContext, DispatchProtocol, Invocation, ProtocolError, Value};
//!
//! struct AnswerEverything;
//!
//! impl DispatchProtocol for AnswerEverything {
//!     fn method_invoked(
//!         &self,
//!         _ctx: &CallContext,
//!         _invocation: &Invocation<'_>,
//!     ) -> Result<Value, ProtocolError> {
//!         Ok(Value::Int(42))
//!     }
//! }
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod descriptor;
pub mod error;
pub mod protocol;
pub mod value;

pub use context::{CallContext, CallPolicy, CallTarget};
pub use descriptor::{MethodDescriptor, TypeDescriptor, TypeKind};
pub use error::{DescriptorError, ProtocolError};
pub use protocol::{DispatchProtocol, Invocation, NoopProtocol};
pub use value::{BoxedArg, ObjectRef, Value};
