//! Call-through fallbacks
//!
//! What a woven member does when no substitute handled the call: forward to
//! the superclass implementation, or return the type's default value.

use crate::ir::{Expr, Stmt};
use crate::model::Callable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalleeKind {
    /// Same-signature superclass member, parameters forwarded in order
    SuperCall,
    /// Raw default value of the return type
    DefaultValue,
}

impl fmt::Display for CalleeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalleeKind::SuperCall => f.write_str("super call"),
            CalleeKind::DefaultValue => f.write_str("default value"),
        }
    }
}

/// Statements implementing the fallback for `member`.
///
/// `SuperCall` returns the superclass result (or calls it and returns, for
/// void). `DefaultValue` returns the default, or returns bare for void.
pub fn emit_fallback(member: &dyn Callable, kind: CalleeKind) -> Vec<Stmt> {
    let void = member.return_type().is_void();
    match kind {
        CalleeKind::DefaultValue if void => vec![Stmt::Return(None)],
        CalleeKind::DefaultValue => vec![Stmt::Return(Some(Expr::DefaultValue(
            member.return_type().clone(),
        )))],
        CalleeKind::SuperCall => {
            let call = super_call(member);
            if void {
                vec![Stmt::Expr(call), Stmt::Return(None)]
            } else {
                vec![Stmt::Return(Some(call))]
            }
        }
    }
}

fn super_call(member: &dyn Callable) -> Expr {
    Expr::SuperCall {
        name: member.name().to_string(),
        params: member.params().to_vec(),
        args: (0..member.params().len()).map(Expr::Param).collect(),
    }
}
