//! Type descriptor classification
//!
//! Maps signature types to their kind and supplies the source fragments the
//! Java backend needs for each kind: default return literals, boxed wrapper
//! names and unboxing expressions.

use crate::error::WeaveResult;
use shade_sdk::{TypeDescriptor, TypeKind};

/// Classify a type reference by its Java source name.
///
/// Total over every name that can appear in a signature; anything else is a
/// [`crate::WeaveError::Descriptor`].
pub fn classify(type_ref: &str) -> WeaveResult<TypeDescriptor> {
    Ok(TypeDescriptor::classify(type_ref)?)
}

/// Per-kind code fragments
pub trait Classify {
    /// Literal returned when no value is available: `0` for integral kinds,
    /// `0.0` / `0.0f` for floating kinds, `false`, `'\0'`, `null`, and the
    /// empty string for `void`.
    fn default_return_literal(&self) -> &'static str;

    /// Wrapper type able to hold a boxed value of this kind
    fn boxed_type_name(&self) -> &str;

    /// Accessor that extracts the primitive from its wrapper
    fn unbox_method(&self) -> Option<&'static str>;

    /// Expression converting the boxed `boxed` back to this type: a cast for
    /// references, a cast plus accessor call for primitives.
    fn unbox_expression(&self, boxed: &str) -> String {
        match self.unbox_method() {
            Some(method) => format!("(({}) {}).{}()", self.boxed_type_name(), boxed, method),
            None => format!("(({}) {})", self.boxed_type_name(), boxed),
        }
    }
}

impl Classify for TypeDescriptor {
    fn default_return_literal(&self) -> &'static str {
        match self {
            TypeDescriptor::Void => "",
            TypeDescriptor::Boolean => "false",
            TypeDescriptor::Char => "'\\0'",
            TypeDescriptor::Float => "0.0f",
            TypeDescriptor::Double => "0.0",
            TypeDescriptor::Byte
            | TypeDescriptor::Short
            | TypeDescriptor::Int
            | TypeDescriptor::Long => "0",
            TypeDescriptor::Reference(_) => "null",
        }
    }

    fn boxed_type_name(&self) -> &str {
        match self {
            TypeDescriptor::Void => "java.lang.Void",
            TypeDescriptor::Boolean => "java.lang.Boolean",
            TypeDescriptor::Byte => "java.lang.Byte",
            TypeDescriptor::Short => "java.lang.Short",
            TypeDescriptor::Char => "java.lang.Character",
            TypeDescriptor::Int => "java.lang.Integer",
            TypeDescriptor::Long => "java.lang.Long",
            TypeDescriptor::Float => "java.lang.Float",
            TypeDescriptor::Double => "java.lang.Double",
            TypeDescriptor::Reference(name) => name,
        }
    }

    fn unbox_method(&self) -> Option<&'static str> {
        match self.kind() {
            TypeKind::Void | TypeKind::Reference => None,
            _ => Some(match self {
                TypeDescriptor::Boolean => "booleanValue",
                TypeDescriptor::Byte => "byteValue",
                TypeDescriptor::Short => "shortValue",
                TypeDescriptor::Char => "charValue",
                TypeDescriptor::Int => "intValue",
                TypeDescriptor::Long => "longValue",
                TypeDescriptor::Float => "floatValue",
                _ => "doubleValue",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_literals() {
        assert_eq!(TypeDescriptor::Int.default_return_literal(), "0");
        assert_eq!(TypeDescriptor::Short.default_return_literal(), "0");
        assert_eq!(TypeDescriptor::Double.default_return_literal(), "0.0");
        assert_eq!(TypeDescriptor::Float.default_return_literal(), "0.0f");
        assert_eq!(TypeDescriptor::Boolean.default_return_literal(), "false");
        assert_eq!(TypeDescriptor::Char.default_return_literal(), "'\\0'");
        assert_eq!(TypeDescriptor::string().default_return_literal(), "null");
        assert_eq!(TypeDescriptor::Void.default_return_literal(), "");
    }

    #[test]
    fn test_unbox_expression() {
        assert_eq!(
            TypeDescriptor::Int.unbox_expression("x"),
            "((java.lang.Integer) x).intValue()"
        );
        assert_eq!(
            TypeDescriptor::Char.unbox_expression("x"),
            "((java.lang.Character) x).charValue()"
        );
        assert_eq!(TypeDescriptor::string().unbox_expression("x"), "((java.lang.String) x)");
        let array = classify("int[]").unwrap();
        assert_eq!(array.unbox_expression("x"), "((int[]) x)");
    }

    #[test]
    fn test_classify_rejects_garbage() {
        assert!(classify("java.lang.").is_err());
        assert_eq!(classify(" long ").unwrap(), TypeDescriptor::Long);
    }
}
