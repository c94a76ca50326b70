//! Well-formedness checks for generated bodies

use super::expr::Expr;
use super::stmt::Stmt;
use crate::model::Callable;
use rustc_hash::FxHashSet;
use thiserror::Error;

/// Ways a generated fragment can be ill-formed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// `return <value>` in a void member
    #[error("void member returns a value")]
    ReturnValueInVoid,

    /// Bare `return` in a non-void member
    #[error("missing return value of type {expected}")]
    MissingReturnValue {
        /// Declared return type
        expected: String,
    },

    /// Reference to a parameter the member does not have
    #[error("parameter ${index} out of range (member has {count})")]
    ParamOutOfRange {
        /// Zero-based index used
        index: usize,
        /// Parameter count
        count: usize,
    },

    /// `this` or `super` used in a static member
    #[error("receiver used in a static member")]
    ReceiverInStatic,

    /// Local read before any `let` introduced it
    #[error("undeclared local '{0}'")]
    UndeclaredLocal(String),

    /// A value of type `void` was requested
    #[error("void has no value")]
    VoidValue,

    /// A non-void body can run off its end
    #[error("control can reach the end of a non-void body")]
    MissingExit,
}

/// Check `stmts` as the body (or body prefix) of `member`.
///
/// With `require_exit`, a non-void body must end in `return` or `throw`;
/// prefixes that fall through into retained code pass `false`.
pub fn validate_body(
    member: &dyn Callable,
    stmts: &[Stmt],
    require_exit: bool,
) -> Result<(), ValidationError> {
    let mut checker = Checker {
        member,
        scopes: vec![FxHashSet::default()],
    };
    checker.check_block(stmts)?;

    if require_exit && !member.return_type().is_void() && !stmts.last().is_some_and(Stmt::is_exit) {
        return Err(ValidationError::MissingExit);
    }
    Ok(())
}

struct Checker<'a> {
    member: &'a dyn Callable,
    scopes: Vec<FxHashSet<String>>,
}

impl Checker<'_> {
    fn check_block(&mut self, stmts: &[Stmt]) -> Result<(), ValidationError> {
        for stmt in stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Result<(), ValidationError> {
        match stmt {
            Stmt::Let { name, value } => {
                self.check_expr(value)?;
                if let Some(scope) = self.scopes.last_mut() {
                    scope.insert(name.clone());
                }
            }
            Stmt::Expr(expr) => self.check_expr(expr)?,
            Stmt::If { cond, then } => {
                self.check_expr(cond)?;
                self.scopes.push(FxHashSet::default());
                let result = self.check_block(&then.stmts);
                self.scopes.pop();
                result?;
            }
            Stmt::Return(value) => {
                let ret = self.member.return_type();
                match (value, ret.is_void()) {
                    (Some(_), true) => return Err(ValidationError::ReturnValueInVoid),
                    (None, false) => {
                        return Err(ValidationError::MissingReturnValue {
                            expected: ret.name().to_string(),
                        })
                    }
                    (Some(expr), false) => self.check_expr(expr)?,
                    (None, true) => {}
                }
            }
            Stmt::Throw { .. } => {}
        }
        Ok(())
    }

    fn check_expr(&self, expr: &Expr) -> Result<(), ValidationError> {
        let mut failure = None;
        expr.walk(&mut |node| {
            if failure.is_none() {
                failure = self.check_node(node).err();
            }
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn check_node(&self, node: &Expr) -> Result<(), ValidationError> {
        match node {
            Expr::Param(index) => {
                let count = self.member.params().len();
                if *index >= count {
                    return Err(ValidationError::ParamOutOfRange {
                        index: *index,
                        count,
                    });
                }
            }
            Expr::This | Expr::SuperCall { .. } | Expr::Intrinsic(_) if self.member.is_static() => {
                return Err(ValidationError::ReceiverInStatic);
            }
            Expr::Local(name) => {
                if !self.scopes.iter().any(|scope| scope.contains(name)) {
                    return Err(ValidationError::UndeclaredLocal(name.clone()));
                }
            }
            Expr::DefaultValue(ty) | Expr::Autobox { ty, .. } | Expr::Unbox { ty, .. }
                if ty.is_void() =>
            {
                return Err(ValidationError::VoidValue);
            }
            _ => {}
        }
        Ok(())
    }
}
