//! Dispatch block construction
//!
//! The block inserted into every woven member:
//!
//! ```text
//! if !should_call_directly(this | class C) {
//!   let __result = method_invoked(C, "m", this | null, [types], [autobox($0), ..])
//!   if __result != null {
//!     return unbox<T>(__result)
//!   }
//!   <fallback>
//! }
//! ```
//!
//! Void members relay and return unconditionally instead.

use crate::ir::{Block, Expr, RelayCall, Stmt};
use crate::model::Callable;

/// Local holding the relay result
pub const RESULT_LOCAL: &str = "__result";

/// Build the dispatch block of `member` as woven into `class_name`.
///
/// `fallback` runs inside the block when the relay returns the null sentinel.
/// It is ignored for void members, whose block always returns.
pub fn dispatch_block(class_name: &str, member: &dyn Callable, fallback: Vec<Stmt>) -> Stmt {
    let (target, receiver) = if member.is_static() {
        (Expr::ClassLiteral(class_name.to_string()), Expr::null())
    } else {
        (Expr::This, Expr::This)
    };

    let relay = Expr::MethodInvoked(Box::new(RelayCall {
        declaring_class: class_name.to_string(),
        method_name: member.name().to_string(),
        receiver,
        param_types: member.param_type_names(),
        args: member
            .params()
            .iter()
            .enumerate()
            .map(|(idx, ty)| Expr::Autobox {
                ty: ty.clone(),
                value: Box::new(Expr::Param(idx)),
            })
            .collect(),
    }));

    let ret = member.return_type();
    let then = if ret.is_void() {
        vec![Stmt::Expr(relay), Stmt::Return(None)]
    } else {
        let result = || Expr::Local(RESULT_LOCAL.to_string());
        let mut stmts = vec![
            Stmt::Let {
                name: RESULT_LOCAL.to_string(),
                value: relay,
            },
            Stmt::If {
                cond: Expr::IsNotNull(Box::new(result())),
                then: Block::new(vec![Stmt::Return(Some(Expr::Unbox {
                    ty: ret.clone(),
                    value: Box::new(result()),
                }))]),
            },
        ];
        stmts.extend(fallback);
        stmts
    };

    Stmt::If {
        cond: Expr::Not(Box::new(Expr::ShouldCallDirectly(Box::new(target)))),
        then: Block::new(then),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PrettyPrint;
    use crate::model::{MethodUnit, Modifiers};
    use shade_sdk::TypeDescriptor;

    #[test]
    fn test_instance_block_shape() {
        let m = MethodUnit::new(
            "compute",
            vec![TypeDescriptor::Int],
            TypeDescriptor::Int,
            Modifiers::PUBLIC,
        );
        let block = dispatch_block(
            "com.example.Foo",
            &m,
            vec![Stmt::Return(Some(Expr::DefaultValue(TypeDescriptor::Int)))],
        );
        let text = vec![block].pretty_print();
        assert_eq!(
            text,
            "if !should_call_directly(this) {\n  \
             let __result = method_invoked(com.example.Foo, \"compute\", this, [\"int\"], [autobox<int>($0)])\n  \
             if __result != null {\n    \
             return unbox<int>(__result)\n  \
             }\n  \
             return default<int>\n\
             }\n"
        );
    }

    #[test]
    fn test_static_block_passes_class_and_null() {
        let m = MethodUnit::new(
            "reset",
            vec![],
            TypeDescriptor::Void,
            Modifiers::PUBLIC | Modifiers::STATIC,
        );
        let Stmt::If { cond, then } = dispatch_block("com.example.Foo", &m, Vec::new()) else {
            panic!("expected if");
        };
        assert_eq!(cond.to_string(), "!should_call_directly(class com.example.Foo)");
        assert_eq!(then.stmts.len(), 2);
        assert_eq!(
            then.stmts[0],
            Stmt::Expr(Expr::MethodInvoked(Box::new(RelayCall {
                declaring_class: "com.example.Foo".to_string(),
                method_name: "reset".to_string(),
                receiver: Expr::null(),
                param_types: Vec::new(),
                args: Vec::new(),
            })))
        );
        assert_eq!(then.stmts[1], Stmt::Return(None));
    }

    #[test]
    fn test_void_ignores_fallback() {
        let m = MethodUnit::new("run", vec![], TypeDescriptor::Void, Modifiers::PUBLIC);
        let Stmt::If { then, .. } = dispatch_block("a.A", &m, vec![Stmt::Return(None), Stmt::Return(None)])
        else {
            panic!("expected if");
        };
        assert_eq!(then.stmts.len(), 2);
    }
}
