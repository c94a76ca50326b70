//! Constructor weaver
//!
//! Constructor bodies are always fully replaced by the void dispatch block;
//! prefixing would run ahead of constructor chaining. Enum constructors are
//! left alone.

use super::dispatch::dispatch_block;
use super::plan::{Action, PlanEntry, SkipReason};
use crate::error::{WeaveError, WeaveResult};
use crate::ir::{validate_body, GeneratedBody, MethodBody, Stmt};
use crate::model::{ClassUnit, ConstructorUnit, Modifiers};
use tracing::{debug, warn};

/// Rewrites the constructors of one class
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstructorWeaver;

impl ConstructorWeaver {
    /// Create a constructor weaver
    pub fn new() -> Self {
        Self
    }

    /// What weaving would do to each constructor, including the synthetic
    /// default constructor when one is needed
    pub fn plan(&self, class: &ClassUnit) -> WeaveResult<Vec<PlanEntry>> {
        if class.is_enum() {
            return Ok(class
                .constructors()
                .iter()
                .map(|c| PlanEntry::new(c.describe(), Action::Skipped(SkipReason::EnumConstructor)))
                .collect());
        }

        let mut entries = Vec::with_capacity(class.constructors().len() + 1);
        for ctor in class.constructors() {
            if ctor.body().is_woven() {
                return Err(WeaveError::structural(
                    class.name(),
                    format!("{} is already woven", ctor.describe()),
                ));
            }
            entries.push(PlanEntry::new(ctor.describe(), Action::ConstructorReplacement));
        }
        if !class.has_default_constructor() {
            entries.push(PlanEntry::new(
                format!("public {}()", class.name()),
                Action::DefaultConstructor,
            ));
        }
        Ok(entries)
    }

    /// Weave every constructor of `class` in place, adding a zero-argument
    /// constructor if none is declared
    pub fn weave(&self, class: &mut ClassUnit) -> WeaveResult<Vec<PlanEntry>> {
        let entries = self.plan(class)?;
        if class.is_enum() {
            if !entries.is_empty() {
                warn!(class = %class.name(), count = entries.len(), "enum constructors left unmodified");
            }
            return Ok(entries);
        }

        let class_name = class.name().to_string();
        for ctor in class.constructors_mut() {
            let member = ctor.describe();
            let body = replacement_body(&class_name, ctor)
                .map_err(|e| WeaveError::in_member(member.as_str(), e))?;
            ctor.set_body(body);
            debug!(class = %class_name, member = %member, "constructor replaced");
        }

        if !class.has_default_constructor() {
            let mut ctor = ConstructorUnit::new(Vec::new(), Modifiers::PUBLIC);
            let member = format!("public {}()", class_name);
            let body = replacement_body(&class_name, &ctor)
                .map_err(|e| WeaveError::in_member(member.as_str(), e))?;
            ctor.set_body(body);
            class.add_constructor(ctor);
            debug!(class = %class_name, "default constructor synthesized");
        }
        Ok(entries)
    }
}

fn replacement_body(class_name: &str, ctor: &ConstructorUnit) -> WeaveResult<MethodBody> {
    let stmts: Vec<Stmt> = vec![dispatch_block(class_name, ctor, Vec::new())];
    validate_body(ctor, &stmts, false)?;
    Ok(MethodBody::Replaced(GeneratedBody::new(stmts)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Block, Expr};
    use crate::model::Callable;
    use shade_sdk::TypeDescriptor;

    fn with_ctor(params: Vec<TypeDescriptor>) -> ClassUnit {
        ClassUnit::new("com.example.Foo", Modifiers::PUBLIC).with_constructor(
            ConstructorUnit::new(params, Modifiers::PUBLIC)
                .with_body(MethodBody::Original(Block::new(vec![Stmt::Expr(Expr::This)]))),
        )
    }

    #[test]
    fn test_declared_constructor_replaced_and_default_added() {
        let mut class = with_ctor(vec![TypeDescriptor::Int]);
        let entries = ConstructorWeaver::new().weave(&mut class).unwrap();

        assert_eq!(class.constructors().len(), 2);
        assert!(class.constructors().iter().all(|c| c.body().is_woven()));
        let default = class.find_constructor(&[]).unwrap();
        assert_eq!(default.modifiers(), Modifiers::PUBLIC);
        assert_eq!(entries[1].action, Action::DefaultConstructor);
        assert_eq!(entries[1].member, "public com.example.Foo()");
    }

    #[test]
    fn test_existing_default_constructor_not_duplicated() {
        let mut class = with_ctor(Vec::new());
        ConstructorWeaver::new().weave(&mut class).unwrap();
        assert_eq!(class.constructors().len(), 1);
        assert_eq!(class.constructors()[0].param_type_names(), Vec::<String>::new());
    }

    #[test]
    fn test_body_relays_init() {
        let mut class = with_ctor(vec![TypeDescriptor::string()]);
        ConstructorWeaver::new().weave(&mut class).unwrap();
        let MethodBody::Replaced(body) = class.constructors()[0].body() else {
            panic!("expected replaced body");
        };
        let Stmt::If { then, .. } = &body.stmts()[0] else {
            panic!("expected dispatch block");
        };
        let Stmt::Expr(Expr::MethodInvoked(call)) = &then.stmts[0] else {
            panic!("expected relay");
        };
        assert_eq!(call.method_name, "<init>");
        assert_eq!(call.param_types, vec!["java.lang.String".to_string()]);
        assert_eq!(call.receiver, Expr::This);
    }

    #[test]
    fn test_enum_constructors_untouched() {
        let mut class = ClassUnit::new_enum("com.example.Color", Modifiers::PUBLIC).with_constructor(
            ConstructorUnit::new(vec![TypeDescriptor::string(), TypeDescriptor::Int], Modifiers::PRIVATE),
        );
        let before = class.clone();
        let entries = ConstructorWeaver::new().weave(&mut class).unwrap();
        assert_eq!(class, before);
        assert_eq!(entries[0].action, Action::Skipped(SkipReason::EnumConstructor));
    }
}
