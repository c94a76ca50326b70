//! Boxed value conversion

use super::VmError;
use crate::weaver::Classify;
use shade_sdk::{TypeDescriptor, Value};

const OBJECT: &str = "java.lang.Object";
const STRING_TYPES: [&str; 3] = ["java.lang.String", "java.lang.CharSequence", OBJECT];

/// Convert a relay result back to `ty`.
///
/// Integral values convert between integral widths when they fit, and any
/// numeric value converts to a floating type. References accept `null` and
/// objects; strings and boxed primitives are accepted where their wrapper
/// type (or `Object`) is expected.
pub fn unbox(ty: &TypeDescriptor, value: Value) -> Result<Value, VmError> {
    let converted = match ty {
        TypeDescriptor::Void => None,
        TypeDescriptor::Boolean => value.as_bool().map(Value::Boolean),
        TypeDescriptor::Byte => integral(&value).and_then(|v| i8::try_from(v).ok()).map(Value::Byte),
        TypeDescriptor::Short => integral(&value).and_then(|v| i16::try_from(v).ok()).map(Value::Short),
        TypeDescriptor::Char => match &value {
            Value::Char(c) => Some(Value::Char(*c)),
            _ => integral(&value).and_then(|v| u16::try_from(v).ok()).map(Value::Char),
        },
        TypeDescriptor::Int => integral(&value).and_then(|v| i32::try_from(v).ok()).map(Value::Int),
        TypeDescriptor::Long => integral(&value).map(Value::Long),
        TypeDescriptor::Float => value.as_f64().map(|v| Value::Float(v as f32)),
        TypeDescriptor::Double => value.as_f64().map(Value::Double),
        TypeDescriptor::Reference(name) => match &value {
            Value::Null | Value::Object(_) => Some(value.clone()),
            Value::Str(_) if STRING_TYPES.contains(&name.as_str()) => Some(value.clone()),
            Value::Str(_) => None,
            primitive => {
                let wrapper = primitive_type(primitive).map(|t| t.boxed_type_name().to_string());
                if name == OBJECT || wrapper.as_deref() == Some(name.as_str()) {
                    Some(value.clone())
                } else {
                    None
                }
            }
        },
    };
    converted.ok_or_else(|| VmError::TypeMismatch {
        expected: ty.name().to_string(),
        got: value.type_name().to_string(),
    })
}

fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Char(_) | Value::Boolean(_) => None,
        other => other.as_i64(),
    }
}

fn primitive_type(value: &Value) -> Option<TypeDescriptor> {
    let ty = match value {
        Value::Boolean(_) => TypeDescriptor::Boolean,
        Value::Byte(_) => TypeDescriptor::Byte,
        Value::Short(_) => TypeDescriptor::Short,
        Value::Char(_) => TypeDescriptor::Char,
        Value::Int(_) => TypeDescriptor::Int,
        Value::Long(_) => TypeDescriptor::Long,
        Value::Float(_) => TypeDescriptor::Float,
        Value::Double(_) => TypeDescriptor::Double,
        Value::Null | Value::Str(_) | Value::Object(_) => return None,
    };
    Some(ty)
}
