//! Class pool
//!
//! Resolves classes by qualified name. Every pool starts from a bootstrap
//! `java.lang.Object` and `java.lang.Enum` so identity methods and enum
//! finality can be looked up like any other inherited member.

use super::class::{ClassUnit, ConstructorUnit, MethodUnit, ENUM_CLASS, OBJECT_CLASS};
use super::modifiers::Modifiers;
use crate::error::{WeaveError, WeaveResult};
use crate::ir::{Block, Expr, Intrinsic, MethodBody, Stmt};
use rustc_hash::{FxHashMap, FxHashSet};
use shade_sdk::TypeDescriptor;

/// Resolvable set of classes, iterated in insertion order
#[derive(Debug, Clone, Default)]
pub struct ClassPool {
    classes: FxHashMap<String, ClassUnit>,
    order: Vec<String>,
}

impl ClassPool {
    /// Empty pool (no bootstrap classes)
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool holding `java.lang.Object` and `java.lang.Enum`
    pub fn bootstrap() -> Self {
        let mut pool = Self::new();
        pool.insert(object_class());
        pool.insert(enum_class());
        pool
    }

    /// Add or replace a class; returns the class it replaced
    pub fn insert(&mut self, mut class: ClassUnit) -> Option<ClassUnit> {
        class.normalize();
        let name = class.name().to_string();
        let previous = self.classes.insert(name.clone(), class);
        if previous.is_none() {
            self.order.push(name);
        }
        previous
    }

    /// Look up a class
    pub fn get(&self, name: &str) -> Option<&ClassUnit> {
        self.classes.get(name)
    }

    /// Look up a class, failing with [`WeaveError::UnknownClass`]
    pub fn require(&self, name: &str) -> WeaveResult<&ClassUnit> {
        self.get(name).ok_or_else(|| WeaveError::UnknownClass {
            name: name.to_string(),
        })
    }

    /// Whether the pool holds this class
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Number of classes, bootstrap classes included
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Class names in insertion order
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Classes that are not bootstrap classes, in insertion order
    pub fn user_classes(&self) -> impl Iterator<Item = &ClassUnit> {
        self.order
            .iter()
            .filter(|name| !Self::is_bootstrap(name))
            .filter_map(|name| self.classes.get(name))
    }

    /// Whether `name` is one of the classes [`ClassPool::bootstrap`] provides
    pub fn is_bootstrap(name: &str) -> bool {
        name == OBJECT_CLASS || name == ENUM_CLASS
    }

    /// Superclasses of `name`, nearest first. The class itself is not included.
    pub fn superclass_chain(&self, name: &str) -> WeaveResult<Vec<&ClassUnit>> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(name.to_string());

        let mut current = self.require(name)?;
        while let Some(parent) = current.superclass() {
            if !seen.insert(parent.to_string()) {
                return Err(WeaveError::structural(
                    name,
                    format!("superclass cycle through {}", parent),
                ));
            }
            let parent = self.require(parent)?;
            chain.push(parent);
            current = parent;
        }
        Ok(chain)
    }

    /// Method visible in `class`: declared there or inherited
    pub fn resolve_method(
        &self,
        class: &str,
        name: &str,
        params: &[TypeDescriptor],
    ) -> WeaveResult<Option<&MethodUnit>> {
        if let Some(method) = self.require(class)?.find_method(name, params) {
            return Ok(Some(method));
        }
        self.resolve_inherited(class, name, params)
    }

    /// Method `class` inherits from its superclasses, ignoring its own
    /// declarations
    pub fn resolve_inherited(
        &self,
        class: &str,
        name: &str,
        params: &[TypeDescriptor],
    ) -> WeaveResult<Option<&MethodUnit>> {
        for parent in self.superclass_chain(class)? {
            if let Some(method) = parent.find_method(name, params) {
                return Ok(Some(method));
            }
        }
        Ok(None)
    }
}

fn object_class() -> ClassUnit {
    let returning = |expr: Expr| MethodBody::Original(Block::new(vec![Stmt::Return(Some(expr))]));

    ClassUnit::new(OBJECT_CLASS, Modifiers::PUBLIC)
        .with_constructor(ConstructorUnit::new(Vec::new(), Modifiers::PUBLIC))
        .with_method(
            MethodUnit::new(
                "equals",
                vec![TypeDescriptor::object()],
                TypeDescriptor::Boolean,
                Modifiers::PUBLIC,
            )
            .with_body(returning(Expr::Intrinsic(Intrinsic::IdentityEquals))),
        )
        .with_method(
            MethodUnit::new("hashCode", Vec::new(), TypeDescriptor::Int, Modifiers::PUBLIC)
                .with_body(returning(Expr::Intrinsic(Intrinsic::IdentityHashCode))),
        )
        .with_method(
            MethodUnit::new("toString", Vec::new(), TypeDescriptor::string(), Modifiers::PUBLIC)
                .with_body(returning(Expr::Intrinsic(Intrinsic::DefaultToString))),
        )
}

fn enum_class() -> ClassUnit {
    let returning = |expr: Expr| MethodBody::Original(Block::new(vec![Stmt::Return(Some(expr))]));
    let public_final = Modifiers::PUBLIC | Modifiers::FINAL;

    ClassUnit::new(ENUM_CLASS, Modifiers::PUBLIC | Modifiers::ABSTRACT)
        .with_constructor(ConstructorUnit::new(
            vec![TypeDescriptor::string(), TypeDescriptor::Int],
            Modifiers::PROTECTED,
        ))
        .with_method(
            MethodUnit::new(
                "equals",
                vec![TypeDescriptor::object()],
                TypeDescriptor::Boolean,
                public_final,
            )
            .with_body(returning(Expr::Intrinsic(Intrinsic::IdentityEquals))),
        )
        .with_method(
            MethodUnit::new("hashCode", Vec::new(), TypeDescriptor::Int, public_final)
                .with_body(returning(Expr::Intrinsic(Intrinsic::IdentityHashCode))),
        )
        .with_method(
            MethodUnit::new("toString", Vec::new(), TypeDescriptor::string(), Modifiers::PUBLIC)
                .with_body(returning(Expr::Intrinsic(Intrinsic::DefaultToString))),
        )
}
