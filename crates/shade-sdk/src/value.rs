//! Values crossing the dispatch boundary
//!
//! [`Value`] is the run-time representation of any parameter, return value
//! or receiver. [`BoxedArg`] pairs a value with the declared type of the
//! slot it came from, so a relay never has to guess what `Value::Int(1)`
//! was declared as (an `int`, or a `short` widened on the way in).

use crate::descriptor::TypeDescriptor;
use std::fmt;
use std::sync::Arc;

/// Handle to an object instance.
///
/// Identity is the `id`; two handles are the same object when their ids match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    class: Arc<str>,
    id: u64,
}

impl ObjectRef {
    /// Create a handle for an instance of `class`
    pub fn new(class: impl Into<Arc<str>>, id: u64) -> Self {
        Self {
            class: class.into(),
            id,
        }
    }

    /// Qualified name of the instance's run-time class
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// Identity of the instance
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:x}", self.class, self.id)
    }
}

/// Run-time value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null reference; also the relay's "no substitute responded" sentinel
    Null,
    /// `boolean`
    Boolean(bool),
    /// `byte`
    Byte(i8),
    /// `short`
    Short(i16),
    /// `char` (UTF-16 code unit)
    Char(u16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `java.lang.String`
    Str(Arc<str>),
    /// Any other object
    Object(ObjectRef),
}

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Whether this is the null reference (the relay's null sentinel)
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type-correct default for a slot of type `ty`; `None` for `void`.
    pub fn default_for(ty: &TypeDescriptor) -> Option<Value> {
        let value = match ty {
            TypeDescriptor::Void => return None,
            TypeDescriptor::Boolean => Value::Boolean(false),
            TypeDescriptor::Byte => Value::Byte(0),
            TypeDescriptor::Short => Value::Short(0),
            TypeDescriptor::Char => Value::Char(0),
            TypeDescriptor::Int => Value::Int(0),
            TypeDescriptor::Long => Value::Long(0),
            TypeDescriptor::Float => Value::Float(0.0),
            TypeDescriptor::Double => Value::Double(0.0),
            TypeDescriptor::Reference(_) => Value::Null,
        };
        Some(value)
    }

    /// Short name of the value's run-time type, for diagnostics
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Byte(_) => "byte",
            Value::Short(_) => "short",
            Value::Char(_) => "char",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Str(_) => "java.lang.String",
            Value::Object(obj) => obj.class_name(),
        }
    }

    /// Integral value widened to `i64`, if this is an integral or `char` value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(*v as i64),
            Value::Short(v) => Some(*v as i64),
            Value::Char(v) => Some(*v as i64),
            Value::Int(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value widened to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// Boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Object handle, if this is an object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Short(v) => write!(f, "{}", v),
            Value::Char(c) => match char::from_u32(*c as u32) {
                Some(ch) => write!(f, "'{}'", ch.escape_default()),
                None => write!(f, "'\\u{:04x}'", c),
            },
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) => write!(f, "{}L", v),
            Value::Float(v) => write!(f, "{:?}f", v),
            Value::Double(v) => write!(f, "{:?}", v),
            Value::Str(s) => write!(f, "\"{}\"", s.escape_default()),
            Value::Object(obj) => write!(f, "{}", obj),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

/// A boxed argument: a value tagged with the declared type of its slot
#[derive(Debug, Clone, PartialEq)]
pub struct BoxedArg {
    /// Declared parameter type
    pub ty: TypeDescriptor,
    /// The argument value
    pub value: Value,
}

impl BoxedArg {
    /// Pair a value with its declared type
    pub fn new(ty: TypeDescriptor, value: Value) -> Self {
        Self { ty, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_kind() {
        assert_eq!(Value::default_for(&TypeDescriptor::Int), Some(Value::Int(0)));
        assert_eq!(Value::default_for(&TypeDescriptor::Boolean), Some(Value::Boolean(false)));
        assert_eq!(Value::default_for(&TypeDescriptor::Double), Some(Value::Double(0.0)));
        assert_eq!(Value::default_for(&TypeDescriptor::Char), Some(Value::Char(0)));
        assert_eq!(Value::default_for(&TypeDescriptor::string()), Some(Value::Null));
        assert_eq!(Value::default_for(&TypeDescriptor::Void), None);
    }

    #[test]
    fn test_widening_accessors() {
        assert_eq!(Value::Short(-3).as_i64(), Some(-3));
        assert_eq!(Value::Char(65).as_i64(), Some(65));
        assert_eq!(Value::Int(7).as_f64(), Some(7.0));
        assert_eq!(Value::Boolean(true).as_i64(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Long(5).to_string(), "5L");
        assert_eq!(Value::string("hi").to_string(), "\"hi\"");
        assert_eq!(Value::Char(b'a' as u16).to_string(), "'a'");
        let obj = ObjectRef::new("com.example.Foo", 255);
        assert_eq!(Value::Object(obj).to_string(), "com.example.Foo@ff");
    }
}
