//! IR statements and blocks

use super::expr::Expr;
use serde::{Deserialize, Serialize};

/// IR statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stmt {
    /// Introduce a local: `let name = value`
    Let {
        /// Local name
        name: String,
        /// Initial value
        value: Expr,
    },
    /// Evaluate for effect
    Expr(Expr),
    /// Conditional without an else branch
    If {
        /// Condition
        cond: Expr,
        /// Statements run when `cond` holds
        then: Block,
    },
    /// Return, with a value for non-void members
    Return(Option<Expr>),
    /// Throw a new exception of `class`
    Throw {
        /// Exception class
        class: String,
        /// Message
        message: String,
    },
}

impl Stmt {
    /// Whether control never continues past this statement
    pub fn is_exit(&self) -> bool {
        matches!(self, Stmt::Return(_) | Stmt::Throw { .. })
    }

    /// Visit every expression in this statement, recursing into nested blocks
    pub fn walk_exprs(&self, visit: &mut dyn FnMut(&Expr)) {
        match self {
            Stmt::Let { value, .. } => value.walk(visit),
            Stmt::Expr(expr) => expr.walk(visit),
            Stmt::If { cond, then } => {
                cond.walk(visit);
                for stmt in &then.stmts {
                    stmt.walk_exprs(visit);
                }
            }
            Stmt::Return(Some(expr)) => expr.walk(visit),
            Stmt::Return(None) | Stmt::Throw { .. } => {}
        }
    }
}

/// A sequence of statements
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    /// Statements in execution order
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

impl Block {
    /// Create a block
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    /// Whether the block has no statements
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    /// Whether control cannot fall off the end of this block
    pub fn always_exits(&self) -> bool {
        self.stmts.last().is_some_and(Stmt::is_exit)
    }
}

impl From<Vec<Stmt>> for Block {
    fn from(stmts: Vec<Stmt>) -> Self {
        Self::new(stmts)
    }
}
