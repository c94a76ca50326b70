//! Tree-walking interpreter over member bodies

use super::convert::unbox;
use super::{VmError, MAX_CALL_DEPTH};
use crate::ir::{BinaryOp, Expr, Intrinsic, MethodBody, RelayCall, Stmt};
use crate::model::{Callable, ClassPool, CONSTRUCTOR_NAME};
use rustc_hash::FxHashMap;
use shade_sdk::{
    BoxedArg, CallContext, CallTarget, DispatchProtocol, Invocation, ObjectRef, TypeDescriptor,
    Value,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// Executes members of the classes in a pool.
///
/// Protocol calls made by the outermost member receive this interpreter's
/// [`CallContext`]. A member called from a woven body gets the caller's
/// context [nested](CallContext::nested) one level deeper.
pub struct Interpreter<'a> {
    pool: &'a ClassPool,
    protocol: &'a dyn DispatchProtocol,
    ctx: CallContext,
    next_id: AtomicU64,
}

enum Flow {
    Continue,
    Return(Value),
}

/// Activation of one member
struct Frame<'f> {
    /// Class declaring the executing member; `super` resolves from its superclass
    class: &'f str,
    this: Option<ObjectRef>,
    args: Vec<Value>,
    scopes: Vec<FxHashMap<String, Value>>,
    depth: usize,
    ctx: CallContext,
    woven: bool,
}

impl Frame<'_> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn receiver(&self) -> Result<&ObjectRef, VmError> {
        self.this.as_ref().ok_or(VmError::NullPointer)
    }

    /// Context for a member this frame calls
    fn callee_context(&self) -> CallContext {
        if self.woven {
            self.ctx.nested()
        } else {
            self.ctx.clone()
        }
    }
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter
    pub fn new(pool: &'a ClassPool, protocol: &'a dyn DispatchProtocol, ctx: CallContext) -> Self {
        Self {
            pool,
            protocol,
            ctx,
            next_id: AtomicU64::new(1),
        }
    }

    /// Context passed to protocol calls of the outermost member
    pub fn context(&self) -> &CallContext {
        &self.ctx
    }

    /// Allocate an instance of `class` and run the constructor with `params`
    pub fn construct(
        &self,
        class: &str,
        params: &[TypeDescriptor],
        args: Vec<Value>,
    ) -> Result<ObjectRef, VmError> {
        let unit = self
            .pool
            .get(class)
            .ok_or_else(|| VmError::UnknownClass(class.to_string()))?;
        let ctor = unit
            .find_constructor(params)
            .ok_or_else(|| no_such(class, CONSTRUCTOR_NAME, params))?;

        let object = ObjectRef::new(class, self.next_id.fetch_add(1, Ordering::Relaxed));
        self.run(
            unit.name(),
            ctor,
            ctor.body(),
            Some(object.clone()),
            args,
            (0, self.ctx.clone()),
        )?;
        Ok(object)
    }

    /// Call an instance method, dispatching on the receiver's class
    pub fn invoke_virtual(
        &self,
        receiver: &ObjectRef,
        name: &str,
        params: &[TypeDescriptor],
        args: Vec<Value>,
    ) -> Result<Value, VmError> {
        self.call_instance(
            receiver.class_name(),
            receiver,
            name,
            params,
            args,
            (0, self.ctx.clone()),
        )
    }

    /// Call a static method declared on (or inherited by) `class`
    pub fn invoke_static(
        &self,
        class: &str,
        name: &str,
        params: &[TypeDescriptor],
        args: Vec<Value>,
    ) -> Result<Value, VmError> {
        let method = self
            .pool
            .resolve_method(class, name, params)
            .map_err(|_| VmError::UnknownClass(class.to_string()))?
            .filter(|m| m.is_static())
            .ok_or_else(|| no_such(class, name, params))?;
        self.run(
            method.declaring_class(),
            method,
            method.body(),
            None,
            args,
            (0, self.ctx.clone()),
        )
    }

    fn call_instance(
        &self,
        class: &str,
        receiver: &ObjectRef,
        name: &str,
        params: &[TypeDescriptor],
        args: Vec<Value>,
        at: (usize, CallContext),
    ) -> Result<Value, VmError> {
        if name == CONSTRUCTOR_NAME {
            let unit = self
                .pool
                .get(class)
                .ok_or_else(|| VmError::UnknownClass(class.to_string()))?;
            let ctor = unit
                .find_constructor(params)
                .ok_or_else(|| no_such(class, name, params))?;
            return self.run(unit.name(), ctor, ctor.body(), Some(receiver.clone()), args, at);
        }

        let method = self
            .pool
            .resolve_method(class, name, params)
            .map_err(|_| VmError::UnknownClass(class.to_string()))?
            .filter(|m| !m.is_static())
            .ok_or_else(|| no_such(class, name, params))?;
        self.run(
            method.declaring_class(),
            method,
            method.body(),
            Some(receiver.clone()),
            args,
            at,
        )
    }

    fn run(
        &self,
        class: &str,
        member: &dyn Callable,
        body: &MethodBody,
        this: Option<ObjectRef>,
        args: Vec<Value>,
        (depth, ctx): (usize, CallContext),
    ) -> Result<Value, VmError> {
        if depth >= MAX_CALL_DEPTH {
            return Err(VmError::StackOverflow);
        }
        if args.len() != member.params().len() {
            return Err(VmError::ArityMismatch {
                expected: member.params().len(),
                got: args.len(),
            });
        }
        if body.is_absent() {
            return Err(VmError::NoBody {
                member: format!("{}.{}{}", class, member.name(), member.descriptor()),
            });
        }

        let mut frame = Frame {
            class,
            this,
            args,
            scopes: vec![FxHashMap::default()],
            depth,
            ctx,
            woven: body.is_woven(),
        };
        for segment in body.segments() {
            if let Flow::Return(value) = self.exec_block(&mut frame, segment)? {
                return Ok(value);
            }
        }

        if member.return_type().is_void() {
            Ok(Value::Null)
        } else {
            Err(VmError::RuntimeError(format!(
                "{}.{} finished without returning a value",
                class,
                member.name()
            )))
        }
    }

    fn exec_block(&self, frame: &mut Frame<'_>, stmts: &[Stmt]) -> Result<Flow, VmError> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec(frame, stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Continue)
    }

    fn exec(&self, frame: &mut Frame<'_>, stmt: &Stmt) -> Result<Flow, VmError> {
        match stmt {
            Stmt::Let { name, value } => {
                let value = self.eval(frame, value)?;
                if let Some(scope) = frame.scopes.last_mut() {
                    scope.insert(name.clone(), value);
                }
                Ok(Flow::Continue)
            }
            Stmt::Expr(expr) => {
                self.eval(frame, expr)?;
                Ok(Flow::Continue)
            }
            Stmt::If { cond, then } => {
                let taken = self.eval(frame, cond)?;
                if !expect_bool(&taken)? {
                    return Ok(Flow::Continue);
                }
                frame.scopes.push(FxHashMap::default());
                let flow = self.exec_block(frame, &then.stmts);
                frame.scopes.pop();
                flow
            }
            Stmt::Return(Some(expr)) => Ok(Flow::Return(self.eval(frame, expr)?)),
            Stmt::Return(None) => Ok(Flow::Return(Value::Null)),
            Stmt::Throw { class, message } => Err(VmError::Thrown {
                class: class.clone(),
                message: message.clone(),
            }),
        }
    }

    fn eval(&self, frame: &mut Frame<'_>, expr: &Expr) -> Result<Value, VmError> {
        match expr {
            Expr::Literal(lit) => Ok(lit.to_value()),
            Expr::DefaultValue(ty) => Value::default_for(ty).ok_or_else(|| VmError::TypeMismatch {
                expected: "a value type".to_string(),
                got: ty.name().to_string(),
            }),
            Expr::This => Ok(Value::Object(frame.receiver()?.clone())),
            Expr::ClassLiteral(name) => Ok(Value::string(name.as_str())),
            Expr::Param(idx) => frame.args.get(*idx).cloned().ok_or_else(|| {
                VmError::RuntimeError(format!("parameter ${} out of range", idx))
            }),
            Expr::Local(name) => frame
                .lookup(name)
                .cloned()
                .ok_or_else(|| VmError::RuntimeError(format!("unbound local '{}'", name))),
            Expr::ShouldCallDirectly(target) => {
                let direct = match target.as_ref() {
                    Expr::ClassLiteral(name) => {
                        self.protocol.should_call_directly(&frame.ctx, CallTarget::Class(name))
                    }
                    other => match self.eval(frame, other)? {
                        Value::Object(obj) => self
                            .protocol
                            .should_call_directly(&frame.ctx, CallTarget::Instance(&obj)),
                        Value::Null => return Err(VmError::NullPointer),
                        value => {
                            return Err(VmError::TypeMismatch {
                                expected: "an object or class".to_string(),
                                got: value.type_name().to_string(),
                            })
                        }
                    },
                };
                Ok(Value::Boolean(direct))
            }
            Expr::MethodInvoked(call) => self.relay(frame, call),
            Expr::Autobox { ty, value } => {
                let value = self.eval(frame, value)?;
                Ok(self.protocol.autobox(ty, value).value)
            }
            Expr::Unbox { ty, value } => {
                let value = self.eval(frame, value)?;
                unbox(ty, value)
            }
            Expr::SuperCall { name, params, args } => {
                let receiver = frame.receiver()?.clone();
                let parent = self
                    .pool
                    .get(frame.class)
                    .and_then(|unit| unit.superclass())
                    .ok_or_else(|| no_such(frame.class, &format!("super.{}", name), params))?
                    .to_string();
                let values = args
                    .iter()
                    .map(|arg| self.eval(frame, arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let at = (frame.depth + 1, frame.callee_context());
                self.call_instance(&parent, &receiver, name, params, values, at)
            }
            Expr::Not(inner) => {
                let value = self.eval(frame, inner)?;
                Ok(Value::Boolean(!expect_bool(&value)?))
            }
            Expr::IsNotNull(inner) => Ok(Value::Boolean(!self.eval(frame, inner)?.is_null())),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(frame, lhs)?;
                let rhs = self.eval(frame, rhs)?;
                binary(*op, lhs, rhs)
            }
            Expr::Intrinsic(intrinsic) => self.intrinsic(frame, *intrinsic),
        }
    }

    fn relay(&self, frame: &mut Frame<'_>, call: &RelayCall) -> Result<Value, VmError> {
        let receiver = match self.eval(frame, &call.receiver)? {
            Value::Null => None,
            Value::Object(obj) => Some(obj),
            value => {
                return Err(VmError::TypeMismatch {
                    expected: "an object or null".to_string(),
                    got: value.type_name().to_string(),
                })
            }
        };

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            let boxed = match arg {
                Expr::Autobox { ty, value } => {
                    let value = self.eval(frame, value)?;
                    self.protocol.autobox(ty, value)
                }
                other => BoxedArg::new(TypeDescriptor::object(), self.eval(frame, other)?),
            };
            args.push(boxed);
        }

        let invocation = Invocation {
            declaring_class: &call.declaring_class,
            method_name: &call.method_name,
            receiver: receiver.as_ref(),
            param_types: &call.param_types,
            args: &args,
        };
        Ok(self.protocol.method_invoked(&frame.ctx, &invocation)?)
    }

    fn intrinsic(&self, frame: &Frame<'_>, intrinsic: Intrinsic) -> Result<Value, VmError> {
        let this = frame.receiver()?;
        let value = match intrinsic {
            Intrinsic::IdentityEquals => {
                let same = matches!(frame.args.first(), Some(Value::Object(other)) if other == this);
                Value::Boolean(same)
            }
            Intrinsic::IdentityHashCode => Value::Int(identity_hash(this)),
            Intrinsic::DefaultToString => Value::string(format!(
                "{}@{:x}",
                this.class_name(),
                identity_hash(this)
            )),
        };
        Ok(value)
    }
}

fn identity_hash(obj: &ObjectRef) -> i32 {
    // Low 32 bits of the id
    obj.id() as u32 as i32
}

fn expect_bool(value: &Value) -> Result<bool, VmError> {
    value.as_bool().ok_or_else(|| VmError::TypeMismatch {
        expected: "boolean".to_string(),
        got: value.type_name().to_string(),
    })
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, VmError> {
    if op == BinaryOp::Add && (matches!(lhs, Value::Str(_)) || matches!(rhs, Value::Str(_))) {
        return Ok(Value::string(concat_text(&lhs) + &concat_text(&rhs)));
    }

    let mismatch = || VmError::TypeMismatch {
        expected: "numeric operands".to_string(),
        got: format!("{} {} {}", lhs.type_name(), op, rhs.type_name()),
    };

    let floating = matches!(lhs, Value::Float(_) | Value::Double(_))
        || matches!(rhs, Value::Float(_) | Value::Double(_));
    if floating {
        let (a, b) = (lhs.as_f64().ok_or_else(mismatch)?, rhs.as_f64().ok_or_else(mismatch)?);
        let result = match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
        };
        let double = matches!(lhs, Value::Double(_)) || matches!(rhs, Value::Double(_));
        return Ok(if double {
            Value::Double(result)
        } else {
            Value::Float(result as f32)
        });
    }

    let (a, b) = (lhs.as_i64().ok_or_else(mismatch)?, rhs.as_i64().ok_or_else(mismatch)?);
    if matches!(lhs, Value::Long(_)) || matches!(rhs, Value::Long(_)) {
        let result = match op {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
        };
        return Ok(Value::Long(result));
    }
    let (a, b) = (a as i32, b as i32);
    let result = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
    };
    Ok(Value::Int(result))
}

fn concat_text(value: &Value) -> String {
    match value {
        Value::Str(s) => s.to_string(),
        Value::Char(c) => char::from_u32(u32::from(*c)).map_or_else(String::new, String::from),
        Value::Long(v) => v.to_string(),
        Value::Float(v) => format!("{:?}", v),
        other => other.to_string(),
    }
}

fn no_such(class: &str, name: &str, params: &[TypeDescriptor]) -> VmError {
    let params: Vec<&str> = params.iter().map(|p| p.name()).collect();
    VmError::NoSuchMember {
        class: class.to_string(),
        name: name.to_string(),
        params: params.join(","),
    }
}
