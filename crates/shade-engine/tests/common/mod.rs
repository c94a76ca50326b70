//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use shade_engine::ir::{Block, Expr, Stmt};
use shade_engine::{ClassPool, ClassUnit, ConstructorUnit, MethodBody, MethodUnit, Modifiers};
use shade_sdk::{
    CallContext, DispatchProtocol, Invocation, ProtocolError, TypeDescriptor, Value,
};

/// One relayed call, copied out of its [`Invocation`]
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub class: String,
    pub method: String,
    pub receiver: Option<u64>,
    pub param_types: Vec<String>,
    pub args: Vec<(TypeDescriptor, Value)>,
    /// Woven-call nesting depth of the relaying context
    pub depth: u32,
}

/// Protocol that answers every relay with a fixed value and records the call.
///
/// The policy check follows the context, so tests pick direct or intercepted
/// behaviour through the [`CallContext`] they hand the interpreter.
pub struct RecordingProtocol {
    answer: Value,
    calls: Mutex<Vec<Recorded>>,
}

impl RecordingProtocol {
    pub fn returning(answer: Value) -> Self {
        Self {
            answer,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Relay always reports "no substitute"
    pub fn null_sentinel() -> Self {
        Self::returning(Value::Null)
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl DispatchProtocol for RecordingProtocol {
    fn method_invoked(
        &self,
        ctx: &CallContext,
        invocation: &Invocation<'_>,
    ) -> Result<Value, ProtocolError> {
        self.calls.lock().push(Recorded {
            class: invocation.declaring_class.to_string(),
            method: invocation.method_name.to_string(),
            receiver: invocation.receiver.map(|r| r.id()),
            param_types: invocation.param_types.to_vec(),
            args: invocation
                .args
                .iter()
                .map(|a| (a.ty.clone(), a.value.clone()))
                .collect(),
            depth: ctx.depth(),
        });
        Ok(self.answer.clone())
    }
}

pub fn returning(expr: Expr) -> MethodBody {
    MethodBody::Original(Block::new(vec![Stmt::Return(Some(expr))]))
}

/// `public class com.example.Foo { public Foo(int); public native int compute(int); }`
pub fn native_compute() -> ClassUnit {
    ClassUnit::new("com.example.Foo", Modifiers::PUBLIC)
        .with_constructor(ConstructorUnit::new(
            vec![TypeDescriptor::Int],
            Modifiers::PUBLIC,
        ))
        .with_method(MethodUnit::new(
            "compute",
            vec![TypeDescriptor::Int],
            TypeDescriptor::Int,
            Modifiers::PUBLIC | Modifiers::NATIVE,
        ))
}

/// Concrete class with an arithmetic method, a static method and a void method
pub fn calculator() -> ClassUnit {
    ClassUnit::new("com.example.Calc", Modifiers::PUBLIC)
        .with_constructor(ConstructorUnit::new(vec![], Modifiers::PUBLIC))
        .with_method(
            MethodUnit::new(
                "twice",
                vec![TypeDescriptor::Int],
                TypeDescriptor::Int,
                Modifiers::PUBLIC | Modifiers::FINAL,
            )
            .with_body(returning(Expr::binary(
                shade_engine::ir::BinaryOp::Mul,
                Expr::Param(0),
                Expr::int(2),
            ))),
        )
        .with_method(
            MethodUnit::new(
                "label",
                vec![TypeDescriptor::string(), TypeDescriptor::Long],
                TypeDescriptor::string(),
                Modifiers::PUBLIC | Modifiers::STATIC,
            )
            .with_body(returning(Expr::binary(
                shade_engine::ir::BinaryOp::Add,
                Expr::Param(0),
                Expr::Param(1),
            ))),
        )
        .with_method(
            MethodUnit::new("reset", vec![], TypeDescriptor::Void, Modifiers::PUBLIC)
                .with_body(MethodBody::Original(Block::new(vec![Stmt::Return(None)]))),
        )
}

/// Abstract class with one abstract method per return kind
pub fn abstract_shapes() -> ClassUnit {
    let abstract_method = |name: &str, ret: TypeDescriptor| {
        MethodUnit::new(name, vec![], ret, Modifiers::PUBLIC | Modifiers::ABSTRACT)
    };
    ClassUnit::new("com.example.Shape", Modifiers::PUBLIC | Modifiers::ABSTRACT)
        .with_method(abstract_method("sides", TypeDescriptor::Int))
        .with_method(abstract_method("area", TypeDescriptor::Long))
        .with_method(abstract_method("ratio", TypeDescriptor::Double))
        .with_method(abstract_method("closed", TypeDescriptor::Boolean))
        .with_method(abstract_method("initial", TypeDescriptor::Char))
        .with_method(abstract_method("name", TypeDescriptor::string()))
        .with_method(abstract_method("draw", TypeDescriptor::Void))
}

/// Enum with a final method, a plain method and its constructor
pub fn color_enum() -> ClassUnit {
    ClassUnit::new_enum("com.example.Color", Modifiers::PUBLIC)
        .with_constructor(
            ConstructorUnit::new(
                vec![TypeDescriptor::string(), TypeDescriptor::Int],
                Modifiers::PRIVATE,
            )
            .with_body(MethodBody::Original(Block::default())),
        )
        .with_method(
            MethodUnit::new(
                "rgb",
                vec![],
                TypeDescriptor::Int,
                Modifiers::PUBLIC | Modifiers::FINAL,
            )
            .with_body(returning(Expr::int(0xff0000))),
        )
        .with_method(
            MethodUnit::new("brightness", vec![], TypeDescriptor::Int, Modifiers::PUBLIC)
                .with_body(returning(Expr::int(7))),
        )
}

/// `com.example.Widget` declaring `toString`, and `com.example.Button` inheriting it
pub fn widget_hierarchy() -> Vec<ClassUnit> {
    let widget = ClassUnit::new("com.example.Widget", Modifiers::PUBLIC)
        .with_constructor(ConstructorUnit::new(vec![], Modifiers::PUBLIC))
        .with_method(
            MethodUnit::new("toString", vec![], TypeDescriptor::string(), Modifiers::PUBLIC)
                .with_body(returning(Expr::string("widget"))),
        );
    let button = ClassUnit::new("com.example.Button", Modifiers::PUBLIC)
        .extends("com.example.Widget")
        .with_constructor(ConstructorUnit::new(vec![], Modifiers::PUBLIC));
    vec![widget, button]
}

/// Bootstrap pool holding `classes`
pub fn pool_of(classes: impl IntoIterator<Item = ClassUnit>) -> ClassPool {
    let mut pool = ClassPool::bootstrap();
    for class in classes {
        pool.insert(class);
    }
    pool
}
