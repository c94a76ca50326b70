//! Pretty-printing for IR
//!
//! Human-readable output for debugging woven classes.

use super::body::MethodBody;
use super::stmt::Stmt;
use crate::model::{Callable, ClassUnit, ConstructorUnit, MethodUnit};

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    /// Render as indented text
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for ClassUnit {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        let kind = if self.is_enum() { "enum" } else { "class" };
        output.push_str(&format!("; {} {}", kind, self.name()));
        if let Some(superclass) = self.superclass() {
            output.push_str(&format!(" extends {}", superclass));
        }
        output.push('\n');

        for ctor in self.constructors() {
            output.push('\n');
            output.push_str(&ctor.pretty_print());
        }
        for method in self.methods() {
            output.push('\n');
            output.push_str(&method.pretty_print());
        }
        output
    }
}

impl PrettyPrint for MethodUnit {
    fn pretty_print(&self) -> String {
        print_member(self, self.body())
    }
}

impl PrettyPrint for ConstructorUnit {
    fn pretty_print(&self) -> String {
        print_member(self, self.body())
    }
}

impl PrettyPrint for [Stmt] {
    fn pretty_print(&self) -> String {
        let mut output = String::new();
        print_stmts(&mut output, self, 0);
        output
    }
}

fn print_member(member: &dyn Callable, body: &MethodBody) -> String {
    let mut output = String::new();
    let params: Vec<&str> = member.params().iter().map(|p| p.name()).collect();
    let modifiers = member.modifiers().to_string();
    if !modifiers.is_empty() {
        output.push_str(&modifiers);
        output.push(' ');
    }
    output.push_str(&format!(
        "fn {}({}) -> {}",
        member.name(),
        params.join(", "),
        member.return_type()
    ));

    match body {
        MethodBody::Absent => output.push_str(" ; no body\n"),
        MethodBody::Original(block) => {
            output.push_str(" {\n");
            print_stmts(&mut output, &block.stmts, 1);
            output.push_str("}\n");
        }
        MethodBody::Replaced(generated) => {
            output.push_str(" ; replaced {\n");
            print_stmts(&mut output, generated.stmts(), 1);
            output.push_str("}\n");
        }
        MethodBody::Guarded { guard, original } => {
            output.push_str(" ; guarded {\n");
            print_stmts(&mut output, guard.stmts(), 1);
            output.push_str("  ; original\n");
            print_stmts(&mut output, &original.stmts, 1);
            output.push_str("}\n");
        }
    }
    output
}

fn print_stmts(output: &mut String, stmts: &[Stmt], depth: usize) {
    let prefix = "  ".repeat(depth);
    for stmt in stmts {
        match stmt {
            Stmt::Let { name, value } => {
                output.push_str(&format!("{}let {} = {}\n", prefix, name, value));
            }
            Stmt::Expr(expr) => output.push_str(&format!("{}{}\n", prefix, expr)),
            Stmt::If { cond, then } => {
                output.push_str(&format!("{}if {} {{\n", prefix, cond));
                print_stmts(output, &then.stmts, depth + 1);
                output.push_str(&format!("{}}}\n", prefix));
            }
            Stmt::Return(Some(expr)) => output.push_str(&format!("{}return {}\n", prefix, expr)),
            Stmt::Return(None) => output.push_str(&format!("{}return\n", prefix)),
            Stmt::Throw { class, message } => {
                output.push_str(&format!("{}throw {}(\"{}\")\n", prefix, class, message.escape_default()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Block, Expr};
    use crate::model::Modifiers;
    use shade_sdk::TypeDescriptor;

    #[test]
    fn test_print_original_method() {
        let m = MethodUnit::new("twice", vec![TypeDescriptor::Int], TypeDescriptor::Int, Modifiers::PUBLIC)
            .with_body(MethodBody::Original(Block::new(vec![Stmt::Return(Some(Expr::binary(
                crate::ir::BinaryOp::Mul,
                Expr::Param(0),
                Expr::int(2),
            )))])));
        let text = m.pretty_print();
        assert_eq!(text, "public fn twice(int) -> int {\n  return ($0 * 2)\n}\n");
    }

    #[test]
    fn test_print_absent() {
        let m = MethodUnit::new(
            "compute",
            vec![],
            TypeDescriptor::Int,
            Modifiers::PUBLIC | Modifiers::NATIVE,
        );
        assert_eq!(m.pretty_print(), "public native fn compute() -> int ; no body\n");
    }
}
