//! Member bodies
//!
//! A member's body is either what the loader found ([`MethodBody::Absent`],
//! [`MethodBody::Original`]) or what weaving made of it
//! ([`MethodBody::Replaced`], [`MethodBody::Guarded`]).

use super::stmt::{Block, Stmt};
use serde::{Deserialize, Serialize};

/// Statements produced by weaving one member.
///
/// Built once per member per weaving pass and never changed afterwards: there
/// is no mutable access to the statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedBody {
    stmts: Vec<Stmt>,
}

impl GeneratedBody {
    /// Seal a statement list
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    /// The generated statements
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }
}

/// Body of a method or constructor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MethodBody {
    /// No code (abstract or native)
    #[default]
    Absent,
    /// Code as loaded
    Original(Block),
    /// Fully replaced by generated code
    Replaced(GeneratedBody),
    /// Generated guard run before the retained original statements
    Guarded {
        /// Dispatch prefix
        guard: GeneratedBody,
        /// Original statements, reachable when the guard does not return
        original: Block,
    },
}

impl MethodBody {
    /// Whether the body carries generated code
    pub fn is_woven(&self) -> bool {
        matches!(self, MethodBody::Replaced(_) | MethodBody::Guarded { .. })
    }

    /// Whether there is no code at all
    pub fn is_absent(&self) -> bool {
        matches!(self, MethodBody::Absent)
    }

    /// Statement runs in execution order: the guard (if any) then the rest.
    /// Empty for an absent body.
    pub fn segments(&self) -> Vec<&[Stmt]> {
        match self {
            MethodBody::Absent => Vec::new(),
            MethodBody::Original(block) => vec![&block.stmts],
            MethodBody::Replaced(body) => vec![body.stmts()],
            MethodBody::Guarded { guard, original } => vec![guard.stmts(), &original.stmts],
        }
    }

    /// The generated part of the body, if woven
    pub fn generated(&self) -> Option<&GeneratedBody> {
        match self {
            MethodBody::Replaced(body) | MethodBody::Guarded { guard: body, .. } => Some(body),
            MethodBody::Absent | MethodBody::Original(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Expr;

    #[test]
    fn test_guarded_segments_run_guard_first() {
        let guard = GeneratedBody::new(vec![Stmt::Return(None)]);
        let original = Block::new(vec![Stmt::Expr(Expr::This)]);
        let body = MethodBody::Guarded {
            guard: guard.clone(),
            original,
        };
        let segments = body.segments();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], guard.stmts());
        assert!(body.is_woven());
        assert_eq!(body.generated(), Some(&guard));
    }

    #[test]
    fn test_absent_has_no_segments() {
        assert!(MethodBody::Absent.segments().is_empty());
        assert!(!MethodBody::Absent.is_woven());
        assert_eq!(MethodBody::default(), MethodBody::Absent);
    }

    #[test]
    fn test_serde_shape() {
        let body = MethodBody::Original(Block::new(vec![Stmt::Return(Some(Expr::int(1)))]));
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"kind\":\"original\""));
        let back: MethodBody = serde_json::from_str(&json).unwrap();
        assert_eq!(back, body);
    }
}
