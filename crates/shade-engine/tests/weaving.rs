//! Structural guarantees of woven classes
//!
//! Tests cover:
//! - Signatures survive weaving unchanged
//! - Exactly one zero-argument constructor afterwards
//! - Identity overrides fall back to the superclass with forwarded arguments
//! - Enum constructors and final enum methods stay untouched
//! - Structural failures

mod common;

use common::*;
use shade_engine::ir::{Expr, Stmt};
use shade_engine::weaver::{Action, CalleeKind, SkipReason};
use shade_engine::{
    Callable, ClassPool, ClassUnit, MethodBody, MethodUnit, Modifiers, WeaveConfig, WeaveError, Weaver,
};
use shade_sdk::TypeDescriptor;

fn weave(class: ClassUnit) -> (ClassUnit, shade_engine::WeaveReport) {
    let name = class.name().to_string();
    let pool = pool_of([class]);
    let config = WeaveConfig::default();
    Weaver::new(&pool, &config).weave_named(&name).unwrap()
}

fn signature(m: &MethodUnit) -> (String, Vec<TypeDescriptor>, TypeDescriptor) {
    (m.name().to_string(), m.params().to_vec(), m.return_type().clone())
}

#[test]
fn test_signatures_unchanged() {
    for original in [native_compute(), calculator(), abstract_shapes()] {
        let (woven, _) = weave(original.clone());
        for method in original.methods() {
            let after = woven
                .find_method(method.name(), method.params())
                .unwrap_or_else(|| panic!("{} disappeared", method.describe()));
            assert_eq!(signature(method), signature(after));
            assert_eq!(method.is_static(), after.is_static());
            assert!(after.body().is_woven(), "{} not woven", after.describe());
        }
    }
}

#[test]
fn test_woven_methods_lose_native_abstract_final() {
    let (woven, _) = weave(calculator());
    let twice = woven.find_method("twice", &[TypeDescriptor::Int]).unwrap();
    assert!(!twice.modifiers().is_final());

    let (woven, _) = weave(abstract_shapes());
    assert!(woven
        .methods()
        .iter()
        .all(|m| !m.modifiers().is_abstract() && !m.modifiers().is_native()));
}

#[test]
fn test_exactly_one_default_constructor() {
    for original in [native_compute(), calculator(), abstract_shapes()] {
        let (woven, _) = weave(original);
        let defaults = woven.constructors().iter().filter(|c| c.is_default()).count();
        assert_eq!(defaults, 1, "{}", woven.name());
        assert!(woven.constructors().iter().all(|c| c.body().is_woven()));
    }
}

#[test]
fn test_default_constructor_reported_once() {
    let (_, report) = weave(native_compute());
    assert!(report.default_constructor_added());
    assert_eq!(report.count(|a| matches!(a, Action::DefaultConstructor)), 1);

    let (_, report) = weave(calculator());
    assert!(!report.default_constructor_added());
    assert_eq!(report.constructors(), 1);
}

#[test]
fn test_identity_overrides_forward_to_super() {
    let (woven, report) = weave(native_compute());
    assert_eq!(report.synthesized(), 3);

    let equals = woven
        .find_method("equals", &[TypeDescriptor::object()])
        .unwrap();
    assert_eq!(equals.return_type(), &TypeDescriptor::Boolean);
    assert_eq!(equals.declaring_class(), "com.example.Foo");

    let MethodBody::Replaced(body) = equals.body() else {
        panic!("equals should be fully generated");
    };
    let mut super_calls = Vec::new();
    for stmt in body.stmts() {
        stmt.walk_exprs(&mut |expr| {
            if let Expr::SuperCall { name, params, args } = expr {
                super_calls.push((name.clone(), params.clone(), args.clone()));
            }
        });
    }
    // once inside the dispatch block, once on the direct path
    assert_eq!(super_calls.len(), 2);
    for (name, params, args) in super_calls {
        assert_eq!(name, "equals");
        assert_eq!(params, vec![TypeDescriptor::object()]);
        assert_eq!(args, vec![Expr::Param(0)]);
    }
}

#[test]
fn test_declared_identity_method_not_synthesized_again() {
    let class = calculator().with_method(
        MethodUnit::new("hashCode", vec![], TypeDescriptor::Int, Modifiers::PUBLIC)
            .with_body(returning(Expr::int(17))),
    );
    let (woven, report) = weave(class);
    assert_eq!(report.synthesized(), 2);
    let hashes = woven.methods().iter().filter(|m| m.name() == "hashCode").count();
    assert_eq!(hashes, 1);
    assert!(matches!(
        woven.find_method("hashCode", &[]).unwrap().body(),
        MethodBody::Guarded { .. }
    ));
}

#[test]
fn test_abstract_inherited_identity_uses_default_value() {
    let base = ClassUnit::new("com.example.Base", Modifiers::PUBLIC | Modifiers::ABSTRACT)
        .with_method(MethodUnit::new(
            "toString",
            vec![],
            TypeDescriptor::string(),
            Modifiers::PUBLIC | Modifiers::ABSTRACT,
        ));
    let child = ClassUnit::new("com.example.Child", Modifiers::PUBLIC).extends("com.example.Base");
    let pool = pool_of([base, child]);
    let config = WeaveConfig::default();
    let (_, report) = Weaver::new(&pool, &config)
        .weave_named("com.example.Child")
        .unwrap();

    let fallbacks: Vec<_> = report
        .entries
        .iter()
        .filter_map(|e| match e.action {
            Action::SynthesizedOverride { fallback } => Some((e.member.clone(), fallback)),
            _ => None,
        })
        .collect();
    assert_eq!(fallbacks.len(), 3);
    for (member, fallback) in fallbacks {
        let expected = if member.contains("toString") {
            CalleeKind::DefaultValue
        } else {
            CalleeKind::SuperCall
        };
        assert_eq!(fallback, expected, "{}", member);
    }
}

#[test]
fn test_enum_constructors_and_final_methods_untouched() {
    let original = color_enum();
    let (woven, report) = weave(original.clone());

    assert_eq!(woven.constructors(), original.constructors());
    let rgb = woven.find_method("rgb", &[]).unwrap();
    assert_eq!(rgb, original.find_method("rgb", &[]).unwrap());
    assert!(rgb.modifiers().is_final());
    assert!(!report.default_constructor_added());

    // plain enum methods are still woven
    assert!(woven.find_method("brightness", &[]).unwrap().body().is_woven());

    assert_eq!(
        report.count(|a| matches!(a, Action::Skipped(SkipReason::EnumConstructor))),
        1
    );
    // rgb, plus equals and hashCode which java.lang.Enum declares final
    assert_eq!(
        report.count(|a| matches!(a, Action::Skipped(SkipReason::EnumFinal))),
        3
    );
    assert!(woven.find_method("toString", &[]).is_some());
    assert!(woven.find_method("equals", &[TypeDescriptor::object()]).is_none());
}

#[test]
fn test_structural_failures() {
    let config = WeaveConfig::default();

    let iface = ClassUnit::new("com.example.Api", Modifiers::PUBLIC).as_interface();
    let pool = pool_of([iface]);
    let err = Weaver::new(&pool, &config)
        .weave_named("com.example.Api")
        .unwrap_err();
    assert!(matches!(err, WeaveError::StructuralPrecondition { .. }));

    let base = ClassUnit::new("com.example.Sealed", Modifiers::PUBLIC).with_method(
        MethodUnit::new(
            "hashCode",
            vec![],
            TypeDescriptor::Int,
            Modifiers::PUBLIC | Modifiers::FINAL,
        )
        .with_body(returning(Expr::int(1))),
    );
    let child = ClassUnit::new("com.example.Leaf", Modifiers::PUBLIC).extends("com.example.Sealed");
    let pool = pool_of([base, child]);
    let err = Weaver::new(&pool, &config)
        .weave_named("com.example.Leaf")
        .unwrap_err();
    assert!(err.to_string().contains("final"), "{}", err);

    let orphan = ClassUnit::new("com.example.Orphan", Modifiers::PUBLIC).extends("com.example.Missing");
    let pool = pool_of([orphan]);
    let err = Weaver::new(&pool, &config)
        .weave_named("com.example.Orphan")
        .unwrap_err();
    assert!(matches!(err.root_cause(), WeaveError::UnknownClass { .. }));
}

#[test]
fn test_weaving_twice_is_rejected() {
    let (woven, _) = weave(calculator());
    let pool = ClassPool::bootstrap();
    let config = WeaveConfig::default();
    let mut again = woven.clone();
    let err = Weaver::new(&pool, &config)
        .weave_class(&mut again)
        .unwrap_err();
    assert!(err.to_string().contains("already woven"), "{}", err);
}

#[test]
fn test_prefix_guard_keeps_original_statements() {
    let original = calculator();
    let (woven, _) = weave(original.clone());
    let before = original.find_method("twice", &[TypeDescriptor::Int]).unwrap();
    let after = woven.find_method("twice", &[TypeDescriptor::Int]).unwrap();

    let (MethodBody::Original(block), MethodBody::Guarded { guard, original }) =
        (before.body(), after.body())
    else {
        panic!("expected a guarded body");
    };
    assert_eq!(block, original);
    assert_eq!(guard.stmts().len(), 1);
    assert!(matches!(guard.stmts()[0], Stmt::If { .. }));
}
