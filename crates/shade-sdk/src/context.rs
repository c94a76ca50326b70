//! Explicit call context
//!
//! The "call the real code or intercept?" decision is carried as a value
//! handed to every protocol operation, never as ambient thread-local state.

use crate::value::ObjectRef;

/// Whether woven members should run their own code or be intercepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CallPolicy {
    /// Route calls through the relay (the normal test-time mode)
    #[default]
    Intercept,
    /// Bypass dispatch entirely; woven members behave as the original
    Direct,
}

impl CallPolicy {
    /// Whether this policy bypasses dispatch
    pub fn is_direct(self) -> bool {
        matches!(self, CallPolicy::Direct)
    }
}

/// Context passed to every protocol operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallContext {
    policy: CallPolicy,
    depth: u32,
}

impl CallContext {
    /// Context that intercepts every call
    pub fn intercept() -> Self {
        Self::with_policy(CallPolicy::Intercept)
    }

    /// Context that lets every call run directly
    pub fn direct() -> Self {
        Self::with_policy(CallPolicy::Direct)
    }

    /// Context with an explicit policy
    pub fn with_policy(policy: CallPolicy) -> Self {
        Self { policy, depth: 0 }
    }

    /// The active policy
    pub fn policy(&self) -> CallPolicy {
        self.policy
    }

    /// Nesting depth of woven calls (0 for the outermost call)
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Context for a woven call made from inside another woven call
    pub fn nested(&self) -> Self {
        Self {
            policy: self.policy,
            depth: self.depth.saturating_add(1),
        }
    }
}

/// What a policy check is asked about: an instance, or a class for static members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTarget<'a> {
    /// Instance member invoked on this receiver
    Instance(&'a ObjectRef),
    /// Static member of this class
    Class(&'a str),
}

impl CallTarget<'_> {
    /// Qualified class name of the target
    pub fn class_name(&self) -> &str {
        match self {
            CallTarget::Instance(obj) => obj.class_name(),
            CallTarget::Class(name) => name,
        }
    }
}
