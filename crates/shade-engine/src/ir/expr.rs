//! IR expressions

use serde::{Deserialize, Serialize};
use shade_sdk::{TypeDescriptor, Value};
use std::fmt;

/// Constant values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Literal {
    /// `null`
    Null,
    /// Boolean constant
    Boolean(bool),
    /// 32-bit integer
    Int(i32),
    /// 64-bit integer
    Long(i64),
    /// 32-bit float
    Float(f32),
    /// 64-bit float
    Double(f64),
    /// UTF-16 code unit
    Char(u16),
    /// String constant
    Str(String),
}

impl Literal {
    /// Run-time value of this constant
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Int(v) => Value::Int(*v),
            Literal::Long(v) => Value::Long(*v),
            Literal::Float(v) => Value::Float(*v),
            Literal::Double(v) => Value::Double(*v),
            Literal::Char(c) => Value::Char(*c),
            Literal::Str(s) => Value::string(s.as_str()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Same spelling as run-time values
        write!(f, "{}", self.to_value())
    }
}

/// Arithmetic used by loaded method bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinaryOp {
    /// `+` (numeric addition, or string concatenation)
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
        };
        f.write_str(s)
    }
}

/// Platform behaviour with no expression form of its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intrinsic {
    /// `this == $1`
    IdentityEquals,
    /// Identity hash of `this`
    IdentityHashCode,
    /// `ClassName@hash`
    DefaultToString,
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Intrinsic::IdentityEquals => "identity_equals",
            Intrinsic::IdentityHashCode => "identity_hash_code",
            Intrinsic::DefaultToString => "default_to_string",
        };
        f.write_str(s)
    }
}

/// Arguments of a relay call (`methodInvoked`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayCall {
    /// Class reference passed as the first argument
    pub declaring_class: String,
    /// Member name
    pub method_name: String,
    /// `this`, or `null` for static members
    pub receiver: Expr,
    /// Qualified parameter type names (empty, never omitted, for no parameters)
    pub param_types: Vec<String>,
    /// Boxed parameter values
    pub args: Vec<Expr>,
}

/// IR expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Expr {
    /// Constant
    Literal(Literal),
    /// Type-correct default value of a non-void type
    DefaultValue(TypeDescriptor),
    /// The receiver
    This,
    /// A class reference (`Foo.class`)
    ClassLiteral(String),
    /// Parameter by zero-based position
    Param(usize),
    /// Local variable introduced by `Stmt::Let`
    Local(String),
    /// Protocol policy check on a receiver or class reference
    ShouldCallDirectly(Box<Expr>),
    /// Protocol invocation relay
    MethodInvoked(Box<RelayCall>),
    /// Protocol boxing of a value declared as `ty`
    Autobox {
        /// Declared type of the value
        ty: TypeDescriptor,
        /// Value to box
        value: Box<Expr>,
    },
    /// Conversion of a boxed value back to `ty`
    Unbox {
        /// Target type
        ty: TypeDescriptor,
        /// Boxed value
        value: Box<Expr>,
    },
    /// Call of the superclass member with this name and parameter list
    SuperCall {
        /// Member name (`<init>` for a superclass constructor)
        name: String,
        /// Parameter types, identifying the overload
        params: Vec<TypeDescriptor>,
        /// Arguments, forwarded positionally
        args: Vec<Expr>,
    },
    /// Boolean negation
    Not(Box<Expr>),
    /// `value != null`
    IsNotNull(Box<Expr>),
    /// Arithmetic
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        lhs: Box<Expr>,
        /// Right operand
        rhs: Box<Expr>,
    },
    /// Platform intrinsic
    Intrinsic(Intrinsic),
}

impl Expr {
    /// `null`
    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    /// Integer constant
    pub fn int(v: i32) -> Self {
        Expr::Literal(Literal::Int(v))
    }

    /// String constant
    pub fn string(s: impl Into<String>) -> Self {
        Expr::Literal(Literal::Str(s.into()))
    }

    /// Binary expression
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Visit this expression and every subexpression, parents first
    pub fn walk(&self, visit: &mut dyn FnMut(&Expr)) {
        visit(self);
        match self {
            Expr::ShouldCallDirectly(inner) | Expr::Not(inner) | Expr::IsNotNull(inner) => {
                inner.walk(visit)
            }
            Expr::Autobox { value, .. } | Expr::Unbox { value, .. } => value.walk(visit),
            Expr::MethodInvoked(call) => {
                call.receiver.walk(visit);
                for arg in &call.args {
                    arg.walk(visit);
                }
            }
            Expr::SuperCall { args, .. } => {
                for arg in args {
                    arg.walk(visit);
                }
            }
            Expr::Binary { lhs, rhs, .. } => {
                lhs.walk(visit);
                rhs.walk(visit);
            }
            Expr::Literal(_)
            | Expr::DefaultValue(_)
            | Expr::This
            | Expr::ClassLiteral(_)
            | Expr::Param(_)
            | Expr::Local(_)
            | Expr::Intrinsic(_) => {}
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::DefaultValue(ty) => write!(f, "default<{}>", ty),
            Expr::This => write!(f, "this"),
            Expr::ClassLiteral(name) => write!(f, "class {}", name),
            Expr::Param(idx) => write!(f, "${}", idx),
            Expr::Local(name) => write!(f, "{}", name),
            Expr::ShouldCallDirectly(target) => write!(f, "should_call_directly({})", target),
            Expr::MethodInvoked(call) => {
                write!(
                    f,
                    "method_invoked({}, \"{}\", {}, [",
                    call.declaring_class, call.method_name, call.receiver
                )?;
                let types: Vec<String> = call.param_types.iter().map(|t| format!("\"{}\"", t)).collect();
                write!(f, "{}], [", types.join(", "))?;
                let args: Vec<String> = call.args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}])", args.join(", "))
            }
            Expr::Autobox { ty, value } => write!(f, "autobox<{}>({})", ty, value),
            Expr::Unbox { ty, value } => write!(f, "unbox<{}>({})", ty, value),
            Expr::SuperCall { name, args, .. } => {
                let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "super.{}({})", name, args.join(", "))
            }
            Expr::Not(inner) => write!(f, "!{}", inner),
            Expr::IsNotNull(inner) => write!(f, "{} != null", inner),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
            Expr::Intrinsic(intrinsic) => write!(f, "{}()", intrinsic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = Expr::Unbox {
            ty: TypeDescriptor::Int,
            value: Box::new(Expr::Local("__result".to_string())),
        };
        assert_eq!(e.to_string(), "unbox<int>(__result)");
        assert_eq!(Expr::binary(BinaryOp::Mul, Expr::Param(0), Expr::int(2)).to_string(), "($0 * 2)");
        assert_eq!(Expr::Not(Box::new(Expr::This)).to_string(), "!this");
    }

    #[test]
    fn test_walk_visits_nested() {
        let e = Expr::SuperCall {
            name: "equals".to_string(),
            params: vec![TypeDescriptor::object()],
            args: vec![Expr::Param(0)],
        };
        let mut params = Vec::new();
        e.walk(&mut |node| {
            if let Expr::Param(i) = node {
                params.push(*i);
            }
        });
        assert_eq!(params, vec![0]);
    }

    #[test]
    fn test_literal_values() {
        assert_eq!(Literal::Int(3).to_value(), Value::Int(3));
        assert_eq!(Literal::Null.to_value(), Value::Null);
        assert_eq!(Literal::Str("a".to_string()).to_string(), "\"a\"");
    }
}
