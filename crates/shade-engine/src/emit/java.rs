//! Java source backend
//!
//! Renders bodies in the dialect bytecode rewriters such as Javassist accept
//! for `setBody`/`insertBefore`: parameters are `$1..$n`, the receiver is
//! `this`. Parameters are declared with those same names in the class
//! skeleton, so the skeleton is also plain Java.

use super::{Backend, EmitError};
use crate::config::WeaveConfig;
use crate::ir::{Expr, Intrinsic, Literal, MethodBody, Stmt};
use crate::model::{Callable, ClassUnit, CONSTRUCTOR_NAME};
use crate::weaver::Classify;

const INDENT: &str = "    ";

/// Emits Java source calling into a runtime dispatch class
#[derive(Debug, Clone)]
pub struct JavaSourceBackend {
    protocol_class: String,
}

impl JavaSourceBackend {
    /// Backend referencing `protocol_class` for the dispatch entry points
    pub fn new(protocol_class: impl Into<String>) -> Self {
        Self {
            protocol_class: protocol_class.into(),
        }
    }

    /// Backend using the configured protocol class
    pub fn from_config(config: &WeaveConfig) -> Self {
        Self::new(config.protocol_class.as_str())
    }

    /// Render `stmts` as a braced body of `member`, one statement per line
    pub fn emit_member_body(&self, member: &dyn Callable, stmts: &[Stmt]) -> String {
        let mut out = String::from("{\n");
        self.write_stmts(&mut out, member, stmts, 1);
        out.push_str("}\n");
        out
    }

    fn write_member(
        &self,
        out: &mut String,
        class: &ClassUnit,
        member: &dyn Callable,
        exceptions: &[String],
        body: &MethodBody,
    ) -> Result<(), EmitError> {
        out.push_str(INDENT);
        let modifiers = member.modifiers().to_string();
        if !modifiers.is_empty() {
            out.push_str(&modifiers);
            out.push(' ');
        }
        if member.name() == CONSTRUCTOR_NAME {
            out.push_str(class.simple_name());
        } else {
            out.push_str(member.return_type().name());
            out.push(' ');
            out.push_str(member.name());
        }

        let params: Vec<String> = member
            .params()
            .iter()
            .enumerate()
            .map(|(idx, ty)| format!("{} ${}", ty.name(), idx + 1))
            .collect();
        out.push_str(&format!("({})", params.join(", ")));
        if !exceptions.is_empty() {
            out.push_str(&format!(" throws {}", exceptions.join(", ")));
        }

        let segments = body.segments();
        if segments.is_empty() {
            out.push_str(";\n");
            return Ok(());
        }

        for segment in &segments {
            for stmt in segment.iter() {
                self.check_stmt(class, member, stmt)?;
            }
        }

        out.push_str(" {\n");
        for (idx, segment) in segments.iter().enumerate() {
            if idx > 0 && !segment.is_empty() {
                out.push_str(&format!("{}{}// original body\n", INDENT, INDENT));
            }
            self.write_stmts(out, member, segment, 2);
        }
        out.push_str(INDENT);
        out.push_str("}\n");
        Ok(())
    }

    fn check_stmt(&self, class: &ClassUnit, member: &dyn Callable, stmt: &Stmt) -> Result<(), EmitError> {
        let mut failure = None;
        stmt.walk_exprs(&mut |expr| {
            if failure.is_some() {
                return;
            }
            if let Expr::SuperCall { name, .. } = expr {
                if class.superclass().is_none() {
                    failure = Some(EmitError::Unsupported {
                        member: format!("{}.{}", class.name(), member.name()),
                        reason: format!("super.{} in a class without a superclass", name),
                    });
                }
            }
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn write_stmts(&self, out: &mut String, member: &dyn Callable, stmts: &[Stmt], depth: usize) {
        let prefix = INDENT.repeat(depth);
        for stmt in stmts {
            match stmt {
                Stmt::Let { name, value } => out.push_str(&format!(
                    "{}{} {} = {};\n",
                    prefix,
                    local_type(member, value),
                    name,
                    self.expr(value)
                )),
                Stmt::Expr(expr) => out.push_str(&format!("{}{};\n", prefix, self.expr(expr))),
                Stmt::If { cond, then } => {
                    out.push_str(&format!("{}if ({}) {{\n", prefix, self.expr(cond)));
                    self.write_stmts(out, member, &then.stmts, depth + 1);
                    out.push_str(&format!("{}}}\n", prefix));
                }
                Stmt::Return(Some(expr)) => {
                    out.push_str(&format!("{}return {};\n", prefix, self.expr(expr)))
                }
                Stmt::Return(None) => out.push_str(&format!("{}return;\n", prefix)),
                Stmt::Throw { class, message } => out.push_str(&format!(
                    "{}throw new {}({});\n",
                    prefix,
                    class,
                    string_literal(message)
                )),
            }
        }
    }

    fn expr(&self, expr: &Expr) -> String {
        let protocol = &self.protocol_class;
        match expr {
            Expr::Literal(lit) => literal(lit),
            Expr::DefaultValue(ty) => ty.default_return_literal().to_string(),
            Expr::This => "this".to_string(),
            Expr::ClassLiteral(name) => format!("{}.class", name),
            Expr::Param(idx) => format!("${}", idx + 1),
            Expr::Local(name) => name.clone(),
            Expr::ShouldCallDirectly(target) => {
                format!("{}.shouldCallDirectly({})", protocol, self.expr(target))
            }
            Expr::MethodInvoked(call) => {
                let types = if call.param_types.is_empty() {
                    "new String[0]".to_string()
                } else {
                    let names: Vec<String> = call.param_types.iter().map(|t| string_literal(t)).collect();
                    format!("new String[] {{{}}}", names.join(", "))
                };
                let args = if call.args.is_empty() {
                    "new Object[0]".to_string()
                } else {
                    let values: Vec<String> = call.args.iter().map(|a| self.expr(a)).collect();
                    format!("new Object[] {{{}}}", values.join(", "))
                };
                format!(
                    "{}.methodInvoked({}.class, {}, {}, {}, {})",
                    protocol,
                    call.declaring_class,
                    string_literal(&call.method_name),
                    self.expr(&call.receiver),
                    types,
                    args
                )
            }
            Expr::Autobox { value, .. } => format!("{}.autobox({})", protocol, self.expr(value)),
            Expr::Unbox { ty, value } => ty.unbox_expression(&self.expr(value)),
            Expr::SuperCall { name, args, .. } => {
                let args: Vec<String> = args.iter().map(|a| self.expr(a)).collect();
                if name == CONSTRUCTOR_NAME {
                    format!("super({})", args.join(", "))
                } else {
                    format!("super.{}({})", name, args.join(", "))
                }
            }
            Expr::Not(inner) => format!("!{}", self.expr(inner)),
            Expr::IsNotNull(inner) => format!("{} != null", self.expr(inner)),
            Expr::Binary { op, lhs, rhs } => {
                format!("({} {} {})", self.expr(lhs), op, self.expr(rhs))
            }
            Expr::Intrinsic(Intrinsic::IdentityEquals) => "this == $1".to_string(),
            Expr::Intrinsic(Intrinsic::IdentityHashCode) => {
                "System.identityHashCode(this)".to_string()
            }
            Expr::Intrinsic(Intrinsic::DefaultToString) => {
                "getClass().getName() + \"@\" + Integer.toHexString(hashCode())".to_string()
            }
        }
    }
}

impl Default for JavaSourceBackend {
    fn default() -> Self {
        Self::from_config(&WeaveConfig::default())
    }
}

impl Backend for JavaSourceBackend {
    fn name(&self) -> &str {
        "java"
    }

    fn extension(&self) -> &str {
        "java"
    }

    fn emit_class(&self, class: &ClassUnit) -> Result<String, EmitError> {
        let mut out = String::new();
        if let Some((package, _)) = class.name().rsplit_once('.') {
            out.push_str(&format!("package {};\n\n", package));
        }

        let mut modifiers = class.modifiers();
        if class.is_enum() {
            modifiers = modifiers.without(crate::model::Modifiers::FINAL);
        }
        let modifiers = modifiers.to_string();
        if !modifiers.is_empty() {
            out.push_str(&modifiers);
            out.push(' ');
        }
        let keyword = if class.is_enum() {
            "enum"
        } else if class.is_interface() {
            "interface"
        } else {
            "class"
        };
        out.push_str(&format!("{} {}", keyword, class.simple_name()));
        match class.superclass() {
            Some(parent) if !class.is_enum() => out.push_str(&format!(" extends {}", parent)),
            _ => {}
        }
        out.push_str(" {\n");

        for ctor in class.constructors() {
            out.push('\n');
            self.write_member(&mut out, class, ctor, ctor.exceptions(), ctor.body())?;
        }
        for method in class.methods() {
            out.push('\n');
            self.write_member(&mut out, class, method, method.exceptions(), method.body())?;
        }
        out.push_str("}\n");
        Ok(out)
    }
}

/// Java type of a local initialized with `value`
fn local_type(member: &dyn Callable, value: &Expr) -> String {
    match value {
        Expr::Literal(Literal::Boolean(_)) => "boolean".to_string(),
        Expr::Literal(Literal::Int(_)) => "int".to_string(),
        Expr::Literal(Literal::Long(_)) => "long".to_string(),
        Expr::Literal(Literal::Float(_)) => "float".to_string(),
        Expr::Literal(Literal::Double(_)) => "double".to_string(),
        Expr::Literal(Literal::Char(_)) => "char".to_string(),
        Expr::Literal(Literal::Str(_)) => "String".to_string(),
        Expr::Param(idx) => member
            .params()
            .get(*idx)
            .map_or_else(|| "Object".to_string(), |ty| ty.name().to_string()),
        Expr::DefaultValue(ty) | Expr::Unbox { ty, .. } => ty.name().to_string(),
        Expr::Binary { lhs, .. } => local_type(member, lhs),
        Expr::Not(_) | Expr::IsNotNull(_) | Expr::ShouldCallDirectly(_) => "boolean".to_string(),
        _ => "Object".to_string(),
    }
}

fn literal(lit: &Literal) -> String {
    match lit {
        Literal::Null => "null".to_string(),
        Literal::Boolean(b) => b.to_string(),
        Literal::Int(v) => v.to_string(),
        Literal::Long(v) => format!("{}L", v),
        Literal::Float(v) => format!("{:?}f", v),
        Literal::Double(v) => format!("{:?}", v),
        Literal::Char(c) => match char::from_u32(u32::from(*c)) {
            Some(ch) if ch.is_ascii_graphic() && ch != '\'' && ch != '\\' => format!("'{}'", ch),
            Some(' ') => "' '".to_string(),
            _ => format!("'\\u{:04x}'", c),
        },
        Literal::Str(s) => string_literal(s),
    }
}

fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
    }
    out.push('"');
    out
}
