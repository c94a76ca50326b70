//! Type descriptors
//!
//! A [`TypeDescriptor`] is the classified form of a type reference that
//! appears in a member signature. Names use Java source spelling (`int`,
//! `java.lang.String`, `byte[][]`). JVM descriptor syntax (`I`,
//! `Ljava/lang/String;`, `[[B`) is accepted and produced as well, since
//! inherited members are looked up by name + descriptor.

use crate::error::DescriptorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified type reference.
///
/// Classification is a pure function of the type name: the same name always
/// yields the same descriptor. Arrays are reference types named with their
/// `[]` suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeDescriptor {
    /// No value (return position only)
    Void,
    /// `boolean`
    Boolean,
    /// `byte`
    Byte,
    /// `short`
    Short,
    /// `char`
    Char,
    /// `int`
    Int,
    /// `long`
    Long,
    /// `float`
    Float,
    /// `double`
    Double,
    /// Class, interface or array type, by qualified name
    Reference(String),
}

/// Semantic kind of a type, the granularity default values and boxing care about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `void`
    Void,
    /// `boolean`
    Boolean,
    /// `byte`, `short`, `int`, `long`
    Integral,
    /// `float`, `double`
    Floating,
    /// `char`
    Character,
    /// Anything held by reference
    Reference,
}

const OBJECT: &str = "java.lang.Object";
const STRING: &str = "java.lang.String";

impl TypeDescriptor {
    /// Classify a type by its Java source name.
    pub fn classify(name: &str) -> Result<Self, DescriptorError> {
        let name = name.trim();
        if let Some(primitive) = primitive_by_name(name) {
            return Ok(primitive);
        }
        validate_reference_name(name)?;
        Ok(TypeDescriptor::Reference(name.to_string()))
    }

    /// Classify a single JVM field descriptor (`I`, `[J`, `Ljava/lang/String;`, `V`).
    pub fn from_descriptor(descriptor: &str) -> Result<Self, DescriptorError> {
        let bytes = descriptor.as_bytes();
        let mut pos = 0;
        let ty = parse_field(descriptor, bytes, &mut pos)?;
        if pos != bytes.len() {
            return Err(malformed(descriptor, "trailing characters"));
        }
        Ok(ty)
    }

    /// `java.lang.Object`
    pub fn object() -> Self {
        TypeDescriptor::Reference(OBJECT.to_string())
    }

    /// `java.lang.String`
    pub fn string() -> Self {
        TypeDescriptor::Reference(STRING.to_string())
    }

    /// Semantic kind of this type
    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDescriptor::Void => TypeKind::Void,
            TypeDescriptor::Boolean => TypeKind::Boolean,
            TypeDescriptor::Byte
            | TypeDescriptor::Short
            | TypeDescriptor::Int
            | TypeDescriptor::Long => TypeKind::Integral,
            TypeDescriptor::Float | TypeDescriptor::Double => TypeKind::Floating,
            TypeDescriptor::Char => TypeKind::Character,
            TypeDescriptor::Reference(_) => TypeKind::Reference,
        }
    }

    /// Whether this is `void`
    pub fn is_void(&self) -> bool {
        matches!(self, TypeDescriptor::Void)
    }

    /// Whether this is one of the eight primitive value types
    pub fn is_primitive(&self) -> bool {
        !matches!(self, TypeDescriptor::Void | TypeDescriptor::Reference(_))
    }

    /// Whether this is held by reference
    pub fn is_reference(&self) -> bool {
        matches!(self, TypeDescriptor::Reference(_))
    }

    /// Whether this is an array type
    pub fn is_array(&self) -> bool {
        matches!(self, TypeDescriptor::Reference(name) if name.ends_with("[]"))
    }

    /// Fully qualified source name (`int`, `java.lang.String`, `long[]`)
    pub fn name(&self) -> &str {
        match self {
            TypeDescriptor::Void => "void",
            TypeDescriptor::Boolean => "boolean",
            TypeDescriptor::Byte => "byte",
            TypeDescriptor::Short => "short",
            TypeDescriptor::Char => "char",
            TypeDescriptor::Int => "int",
            TypeDescriptor::Long => "long",
            TypeDescriptor::Float => "float",
            TypeDescriptor::Double => "double",
            TypeDescriptor::Reference(name) => name,
        }
    }

    /// Name without its package (`String` for `java.lang.String`)
    pub fn simple_name(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(idx) => &name[idx + 1..],
            None => name,
        }
    }

    /// JVM descriptor for this type
    pub fn to_descriptor(&self) -> String {
        name_to_descriptor(self.name())
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for TypeDescriptor {
    type Error = DescriptorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeDescriptor::classify(&value)
    }
}

impl From<TypeDescriptor> for String {
    fn from(value: TypeDescriptor) -> Self {
        match value {
            TypeDescriptor::Reference(name) => name,
            other => other.name().to_string(),
        }
    }
}

/// Parameter and return types of a method, as in `(ILjava/lang/String;)Z`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// Parameter types in declaration order
    pub params: Vec<TypeDescriptor>,
    /// Return type
    pub ret: TypeDescriptor,
}

impl MethodDescriptor {
    /// Create a descriptor from already classified types
    pub fn new(params: Vec<TypeDescriptor>, ret: TypeDescriptor) -> Self {
        Self { params, ret }
    }

    /// Parse a JVM method descriptor
    pub fn parse(descriptor: &str) -> Result<Self, DescriptorError> {
        let bytes = descriptor.as_bytes();
        if bytes.first() != Some(&b'(') {
            return Err(malformed(descriptor, "expected '('"));
        }
        let mut pos = 1;
        let mut params = Vec::new();
        loop {
            match bytes.get(pos) {
                Some(b')') => {
                    pos += 1;
                    break;
                }
                Some(_) => {
                    let param = parse_field(descriptor, bytes, &mut pos)?;
                    if param.is_void() {
                        return Err(DescriptorError::VoidNotAllowed);
                    }
                    params.push(param);
                }
                None => return Err(malformed(descriptor, "unterminated parameter list")),
            }
        }
        let ret = parse_field(descriptor, bytes, &mut pos)?;
        if pos != bytes.len() {
            return Err(malformed(descriptor, "trailing characters"));
        }
        Ok(Self { params, ret })
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for param in &self.params {
            f.write_str(&param.to_descriptor())?;
        }
        write!(f, "){}", self.ret.to_descriptor())
    }
}

fn primitive_by_name(name: &str) -> Option<TypeDescriptor> {
    let ty = match name {
        "void" => TypeDescriptor::Void,
        "boolean" => TypeDescriptor::Boolean,
        "byte" => TypeDescriptor::Byte,
        "short" => TypeDescriptor::Short,
        "char" => TypeDescriptor::Char,
        "int" => TypeDescriptor::Int,
        "long" => TypeDescriptor::Long,
        "float" => TypeDescriptor::Float,
        "double" => TypeDescriptor::Double,
        _ => return None,
    };
    Some(ty)
}

fn validate_reference_name(name: &str) -> Result<(), DescriptorError> {
    let mut element = name;
    let mut dims = 0;
    while let Some(stripped) = element.strip_suffix("[]") {
        element = stripped.trim_end();
        dims += 1;
    }
    if dims > 0 {
        match primitive_by_name(element) {
            Some(TypeDescriptor::Void) => return Err(DescriptorError::VoidNotAllowed),
            Some(_) => return Ok(()),
            None => {}
        }
    }
    validate_class_name(element).map_err(|_| DescriptorError::InvalidTypeName(name.to_string()))
}

fn validate_class_name(name: &str) -> Result<(), ()> {
    if name.is_empty() {
        return Err(());
    }
    for segment in name.split('.') {
        let mut chars = segment.chars();
        match chars.next() {
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
            _ => return Err(()),
        }
        if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            return Err(());
        }
    }
    Ok(())
}

fn name_to_descriptor(name: &str) -> String {
    if let Some(element) = name.strip_suffix("[]") {
        return format!("[{}", name_to_descriptor(element));
    }
    let code = match name {
        "void" => "V",
        "boolean" => "Z",
        "byte" => "B",
        "short" => "S",
        "char" => "C",
        "int" => "I",
        "long" => "J",
        "float" => "F",
        "double" => "D",
        _ => return format!("L{};", name.replace('.', "/")),
    };
    code.to_string()
}

fn parse_field(
    descriptor: &str,
    bytes: &[u8],
    pos: &mut usize,
) -> Result<TypeDescriptor, DescriptorError> {
    let Some(&tag) = bytes.get(*pos) else {
        return Err(malformed(descriptor, "unexpected end"));
    };
    *pos += 1;
    let ty = match tag {
        b'V' => TypeDescriptor::Void,
        b'Z' => TypeDescriptor::Boolean,
        b'B' => TypeDescriptor::Byte,
        b'S' => TypeDescriptor::Short,
        b'C' => TypeDescriptor::Char,
        b'I' => TypeDescriptor::Int,
        b'J' => TypeDescriptor::Long,
        b'F' => TypeDescriptor::Float,
        b'D' => TypeDescriptor::Double,
        b'L' => {
            let start = *pos;
            let Some(len) = bytes[start..].iter().position(|&b| b == b';') else {
                return Err(malformed(descriptor, "unterminated class name"));
            };
            *pos = start + len + 1;
            let name = descriptor[start..start + len].replace('/', ".");
            validate_class_name(&name)
                .map_err(|_| malformed(descriptor, "invalid class name"))?;
            TypeDescriptor::Reference(name)
        }
        b'[' => {
            let element = parse_field(descriptor, bytes, pos)?;
            if element.is_void() {
                return Err(DescriptorError::VoidNotAllowed);
            }
            TypeDescriptor::Reference(format!("{}[]", element.name()))
        }
        other => {
            return Err(malformed(
                descriptor,
                &format!("unknown type tag '{}'", other as char),
            ))
        }
    };
    Ok(ty)
}

fn malformed(descriptor: &str, reason: &str) -> DescriptorError {
    DescriptorError::MalformedDescriptor {
        descriptor: descriptor.to_string(),
        reason: reason.to_string(),
    }
}
