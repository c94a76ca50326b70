//! DispatchProtocol trait: the run-time boundary woven code calls into
//!
//! Every woven member starts with a dispatch block that asks
//! [`DispatchProtocol::should_call_directly`], boxes its arguments with
//! [`DispatchProtocol::autobox`] and relays the call through
//! [`DispatchProtocol::method_invoked`]. The registry behind the relay lives
//! outside this crate.
//!
//! Implementations are shared by every thread that calls woven code and a
//! substitute may itself call woven members, so all three operations must be
//! safe to invoke concurrently and re-entrantly.

use crate::context::{CallContext, CallTarget};
use crate::descriptor::TypeDescriptor;
use crate::error::ProtocolError;
use crate::value::{BoxedArg, ObjectRef, Value};

/// A relayed call
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Class whose woven member is running
    pub declaring_class: &'a str,
    /// Member name (`<init>` for constructors)
    pub method_name: &'a str,
    /// Receiver, or `None` for static members
    pub receiver: Option<&'a ObjectRef>,
    /// Fully qualified parameter type names, in declaration order
    pub param_types: &'a [String],
    /// Boxed arguments, in declaration order
    pub args: &'a [BoxedArg],
}

impl Invocation<'_> {
    /// Whether the relayed member is static
    pub fn is_static(&self) -> bool {
        self.receiver.is_none()
    }

    /// Number of arguments
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// The three operations generated dispatch blocks call.
pub trait DispatchProtocol: Send + Sync {
    /// Policy check. When `true` the dispatch block is skipped and the member
    /// behaves as it did before weaving.
    fn should_call_directly(&self, ctx: &CallContext, target: CallTarget<'_>) -> bool {
        let _ = target;
        ctx.policy().is_direct()
    }

    /// Relay a call to any registered substitute.
    ///
    /// Returning [`Value::Null`] is the null sentinel: no substitute handled
    /// the call and the woven member falls through to its fallback.
    fn method_invoked(
        &self,
        ctx: &CallContext,
        invocation: &Invocation<'_>,
    ) -> Result<Value, ProtocolError>;

    /// Box a parameter value for the relay.
    fn autobox(&self, ty: &TypeDescriptor, value: Value) -> BoxedArg {
        BoxedArg::new(ty.clone(), value)
    }
}

/// Protocol with no substitutes: every call runs directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProtocol;

impl DispatchProtocol for NoopProtocol {
    fn should_call_directly(&self, _ctx: &CallContext, _target: CallTarget<'_>) -> bool {
        true
    }

    fn method_invoked(
        &self,
        _ctx: &CallContext,
        _invocation: &Invocation<'_>,
    ) -> Result<Value, ProtocolError> {
        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Value);

    impl DispatchProtocol for Fixed {
        fn method_invoked(
            &self,
            _ctx: &CallContext,
            _invocation: &Invocation<'_>,
        ) -> Result<Value, ProtocolError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_default_policy_follows_context() {
        let protocol = Fixed(Value::Null);
        let target = CallTarget::Class("com.example.Foo");
        assert!(!protocol.should_call_directly(&CallContext::intercept(), target));
        assert!(protocol.should_call_directly(&CallContext::direct(), target));
    }

    #[test]
    fn test_default_autobox_keeps_declared_type() {
        let protocol = Fixed(Value::Null);
        let boxed = protocol.autobox(&TypeDescriptor::Short, Value::Short(3));
        assert_eq!(boxed.ty, TypeDescriptor::Short);
        assert_eq!(boxed.value, Value::Short(3));
    }

    #[test]
    fn test_noop_protocol() {
        let protocol = NoopProtocol;
        let types = vec!["int".to_string()];
        let args = vec![BoxedArg::new(TypeDescriptor::Int, Value::Int(1))];
        let invocation = Invocation {
            declaring_class: "com.example.Foo",
            method_name: "compute",
            receiver: None,
            param_types: &types,
            args: &args,
        };
        assert!(invocation.is_static());
        assert_eq!(invocation.arity(), 1);
        assert!(protocol.should_call_directly(&CallContext::intercept(), CallTarget::Class("x")));
        assert!(protocol.method_invoked(&CallContext::intercept(), &invocation).unwrap().is_null());
    }
}
