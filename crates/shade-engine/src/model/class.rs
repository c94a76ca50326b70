//! Classes, methods and constructors
//!
//! Signatures are fixed at construction: weaving may change a member's body
//! and (for methods) its modifiers, never its name, parameter list or return
//! type. Only the engine gets mutable access to bodies and modifiers.

use super::modifiers::Modifiers;
use crate::ir::MethodBody;
use serde::{Deserialize, Serialize};
use shade_sdk::{MethodDescriptor, TypeDescriptor};

/// Name used for constructors wherever a member name is required
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// `java.lang.Object`
pub const OBJECT_CLASS: &str = "java.lang.Object";

/// `java.lang.Enum`
pub const ENUM_CLASS: &str = "java.lang.Enum";

static VOID: TypeDescriptor = TypeDescriptor::Void;

/// Anything with a callable signature: methods and constructors
pub trait Callable {
    /// Member name (`<init>` for constructors)
    fn name(&self) -> &str;

    /// Parameter types in declaration order
    fn params(&self) -> &[TypeDescriptor];

    /// Return type (`void` for constructors)
    fn return_type(&self) -> &TypeDescriptor;

    /// Modifier set
    fn modifiers(&self) -> Modifiers;

    /// Whether the member is static
    fn is_static(&self) -> bool {
        self.modifiers().is_static()
    }

    /// Qualified parameter type names
    fn param_type_names(&self) -> Vec<String> {
        self.params().iter().map(|p| p.name().to_string()).collect()
    }

    /// JVM descriptor of the signature
    fn descriptor(&self) -> MethodDescriptor {
        MethodDescriptor::new(self.params().to_vec(), self.return_type().clone())
    }
}

fn void_type() -> TypeDescriptor {
    TypeDescriptor::Void
}

/// A method of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodUnit {
    name: String,
    #[serde(default)]
    params: Vec<TypeDescriptor>,
    #[serde(default = "void_type", rename = "returns")]
    ret: TypeDescriptor,
    #[serde(default)]
    modifiers: Modifiers,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    declaring_class: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    exceptions: Vec<String>,
    #[serde(default)]
    body: MethodBody,
}

impl MethodUnit {
    /// Create a method with an absent body
    pub fn new(
        name: impl Into<String>,
        params: Vec<TypeDescriptor>,
        ret: TypeDescriptor,
        modifiers: Modifiers,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            ret,
            modifiers,
            declaring_class: String::new(),
            exceptions: Vec::new(),
            body: MethodBody::Absent,
        }
    }

    /// Set the body
    pub fn with_body(mut self, body: MethodBody) -> Self {
        self.body = body;
        self
    }

    /// Set the declared exception types
    pub fn with_exceptions(mut self, exceptions: Vec<String>) -> Self {
        self.exceptions = exceptions;
        self
    }

    /// Class that declares this method
    pub fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    /// Declared exception types
    pub fn exceptions(&self) -> &[String] {
        &self.exceptions
    }

    /// Current body
    pub fn body(&self) -> &MethodBody {
        &self.body
    }

    /// Whether the method has the given name and parameter list
    pub fn matches(&self, name: &str, params: &[TypeDescriptor]) -> bool {
        self.name == name && self.params == params
    }

    /// Long description: modifiers, return type, qualified name and parameters,
    /// e.g. `public native int com.example.Foo.compute(int)`.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let modifiers = self.modifiers.to_string();
        if !modifiers.is_empty() {
            out.push_str(&modifiers);
            out.push(' ');
        }
        out.push_str(self.ret.simple_name());
        out.push(' ');
        if !self.declaring_class.is_empty() {
            out.push_str(&self.declaring_class);
            out.push('.');
        }
        out.push_str(&self.name);
        out.push_str(&format!("({})", self.param_type_names().join(",")));
        out
    }

    pub(crate) fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub(crate) fn set_body(&mut self, body: MethodBody) {
        self.body = body;
    }

    pub(crate) fn take_body(&mut self) -> MethodBody {
        std::mem::take(&mut self.body)
    }

    pub(crate) fn set_declaring_class(&mut self, class: &str) {
        self.declaring_class = class.to_string();
    }
}

impl Callable for MethodUnit {
    fn name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> &[TypeDescriptor] {
        &self.params
    }

    fn return_type(&self) -> &TypeDescriptor {
        &self.ret
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

/// A constructor of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorUnit {
    #[serde(default)]
    params: Vec<TypeDescriptor>,
    #[serde(default)]
    modifiers: Modifiers,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    declaring_class: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    exceptions: Vec<String>,
    #[serde(default = "empty_body")]
    body: MethodBody,
}

fn empty_body() -> MethodBody {
    MethodBody::Original(Default::default())
}

impl ConstructorUnit {
    /// Create a constructor with an empty original body
    pub fn new(params: Vec<TypeDescriptor>, modifiers: Modifiers) -> Self {
        Self {
            params,
            modifiers,
            declaring_class: String::new(),
            exceptions: Vec::new(),
            body: empty_body(),
        }
    }

    /// Set the body
    pub fn with_body(mut self, body: MethodBody) -> Self {
        self.body = body;
        self
    }

    /// Class that declares this constructor
    pub fn declaring_class(&self) -> &str {
        &self.declaring_class
    }

    /// Declared exception types
    pub fn exceptions(&self) -> &[String] {
        &self.exceptions
    }

    /// Current body
    pub fn body(&self) -> &MethodBody {
        &self.body
    }

    /// Whether this is the zero-argument constructor
    pub fn is_default(&self) -> bool {
        self.params.is_empty()
    }

    /// e.g. `public com.example.Foo(int,java.lang.String)`
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let modifiers = self.modifiers.to_string();
        if !modifiers.is_empty() {
            out.push_str(&modifiers);
            out.push(' ');
        }
        out.push_str(&self.declaring_class);
        out.push_str(&format!("({})", self.param_type_names().join(",")));
        out
    }

    pub(crate) fn set_body(&mut self, body: MethodBody) {
        self.body = body;
    }

    pub(crate) fn set_declaring_class(&mut self, class: &str) {
        self.declaring_class = class.to_string();
    }
}

impl Callable for ConstructorUnit {
    fn name(&self) -> &str {
        CONSTRUCTOR_NAME
    }

    fn params(&self) -> &[TypeDescriptor] {
        &self.params
    }

    fn return_type(&self) -> &TypeDescriptor {
        &VOID
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

/// In-memory representation of one class.
///
/// Owned by whichever weaving pass is working on it; passes never share a
/// `ClassUnit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassUnit {
    name: String,
    #[serde(default)]
    modifiers: Modifiers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    superclass: Option<String>,
    #[serde(default, rename = "enum")]
    is_enum: bool,
    #[serde(default, rename = "interface")]
    is_interface: bool,
    #[serde(default)]
    constructors: Vec<ConstructorUnit>,
    #[serde(default)]
    methods: Vec<MethodUnit>,
}

impl ClassUnit {
    /// Create an empty class extending `java.lang.Object`
    pub fn new(name: impl Into<String>, modifiers: Modifiers) -> Self {
        let name = name.into();
        let superclass = (name != OBJECT_CLASS).then(|| OBJECT_CLASS.to_string());
        Self {
            name,
            modifiers,
            superclass,
            is_enum: false,
            is_interface: false,
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Create an enum class extending `java.lang.Enum`
    pub fn new_enum(name: impl Into<String>, modifiers: Modifiers) -> Self {
        let mut class = Self::new(name, modifiers.with(Modifiers::FINAL));
        class.is_enum = true;
        class.superclass = Some(ENUM_CLASS.to_string());
        class
    }

    /// Set the superclass
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Mark as an interface
    pub fn as_interface(mut self) -> Self {
        self.is_interface = true;
        self.superclass = None;
        self
    }

    /// Add a method (builder form of [`ClassUnit::add_method`], replacing a
    /// same-signature method)
    pub fn with_method(mut self, method: MethodUnit) -> Self {
        self.methods
            .retain(|m| !m.matches(method.name(), method.params()));
        self.add_method(method);
        self
    }

    /// Add a constructor (builder form, replacing a same-signature constructor)
    pub fn with_constructor(mut self, ctor: ConstructorUnit) -> Self {
        self.constructors.retain(|c| c.params() != ctor.params());
        self.add_constructor(ctor);
        self
    }

    /// Qualified name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without the package
    pub fn simple_name(&self) -> &str {
        match self.name.rfind('.') {
            Some(idx) => &self.name[idx + 1..],
            None => &self.name,
        }
    }

    /// Class modifiers
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Direct superclass
    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    /// Whether this is an enum class
    pub fn is_enum(&self) -> bool {
        self.is_enum
    }

    /// Whether this is an interface
    pub fn is_interface(&self) -> bool {
        self.is_interface
    }

    /// Declared methods, in declaration order
    pub fn methods(&self) -> &[MethodUnit] {
        &self.methods
    }

    /// Declared constructors, in declaration order
    pub fn constructors(&self) -> &[ConstructorUnit] {
        &self.constructors
    }

    /// Declared method with this name and parameter list
    pub fn find_method(&self, name: &str, params: &[TypeDescriptor]) -> Option<&MethodUnit> {
        self.methods.iter().find(|m| m.matches(name, params))
    }

    /// Declared constructor with this parameter list
    pub fn find_constructor(&self, params: &[TypeDescriptor]) -> Option<&ConstructorUnit> {
        self.constructors.iter().find(|c| c.params() == params)
    }

    /// Whether a zero-argument constructor is declared
    pub fn has_default_constructor(&self) -> bool {
        self.constructors.iter().any(ConstructorUnit::is_default)
    }

    /// Append a method, stamping this class as its declarer.
    ///
    /// Returns `false` (and adds nothing) if a method with the same name and
    /// parameter list is already declared.
    pub fn add_method(&mut self, mut method: MethodUnit) -> bool {
        if self.find_method(method.name(), method.params()).is_some() {
            return false;
        }
        method.set_declaring_class(&self.name);
        self.methods.push(method);
        true
    }

    /// Append a constructor; `false` if the parameter list is already declared
    pub fn add_constructor(&mut self, mut ctor: ConstructorUnit) -> bool {
        if self.find_constructor(ctor.params()).is_some() {
            return false;
        }
        ctor.set_declaring_class(&self.name);
        self.constructors.push(ctor);
        true
    }

    pub(crate) fn methods_mut(&mut self) -> &mut [MethodUnit] {
        &mut self.methods
    }

    pub(crate) fn constructors_mut(&mut self) -> &mut [ConstructorUnit] {
        &mut self.constructors
    }

    /// Fill in what documents may leave implicit: the superclass (`Object`, or
    /// `Enum` for enums) and each member's declaring class.
    pub(crate) fn normalize(&mut self) {
        if self.superclass.is_none() && !self.is_interface && self.name != OBJECT_CLASS {
            let default = if self.is_enum { ENUM_CLASS } else { OBJECT_CLASS };
            self.superclass = Some(default.to_string());
        }
        let name = self.name.clone();
        for method in &mut self.methods {
            method.set_declaring_class(&name);
        }
        for ctor in &mut self.constructors {
            ctor.set_declaring_class(&name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClassUnit {
        ClassUnit::new("com.example.Foo", Modifiers::PUBLIC)
            .with_constructor(ConstructorUnit::new(vec![TypeDescriptor::Int], Modifiers::PUBLIC))
            .with_method(MethodUnit::new(
                "compute",
                vec![TypeDescriptor::Int],
                TypeDescriptor::Int,
                Modifiers::PUBLIC | Modifiers::NATIVE,
            ))
    }

    #[test]
    fn test_members_are_stamped_with_declarer() {
        let class = sample();
        assert_eq!(class.methods()[0].declaring_class(), "com.example.Foo");
        assert_eq!(class.constructors()[0].declaring_class(), "com.example.Foo");
        assert_eq!(class.superclass(), Some(OBJECT_CLASS));
    }

    #[test]
    fn test_add_method_rejects_duplicate_signature() {
        let mut class = sample();
        let dup = MethodUnit::new("compute", vec![TypeDescriptor::Int], TypeDescriptor::Long, Modifiers::PUBLIC);
        assert!(!class.add_method(dup));
        let overload = MethodUnit::new("compute", vec![TypeDescriptor::Long], TypeDescriptor::Long, Modifiers::PUBLIC);
        assert!(class.add_method(overload));
        assert_eq!(class.methods().len(), 2);
    }

    #[test]
    fn test_describe() {
        let class = sample();
        assert_eq!(
            class.methods()[0].describe(),
            "public native int com.example.Foo.compute(int)"
        );
        assert_eq!(class.constructors()[0].describe(), "public com.example.Foo(int)");
    }

    #[test]
    fn test_enum_defaults() {
        let e = ClassUnit::new_enum("com.example.Color", Modifiers::PUBLIC);
        assert!(e.is_enum());
        assert_eq!(e.superclass(), Some(ENUM_CLASS));
        assert!(e.modifiers().is_final());
    }

    #[test]
    fn test_normalize_fills_superclass_for_documents() {
        let mut class: ClassUnit = serde_json::from_str(
            r#"{"name": "com.example.Bar", "methods": [{"name": "run"}]}"#,
        )
        .unwrap();
        assert_eq!(class.superclass(), None);
        class.normalize();
        assert_eq!(class.superclass(), Some(OBJECT_CLASS));
        assert_eq!(class.methods()[0].declaring_class(), "com.example.Bar");
        assert!(class.methods()[0].return_type().is_void());
    }
}
