//! Weaving
//!
//! [`Weaver`] drives one class through the constructor weaver and then the
//! method weaver. [`weave_batch`] does the same for many classes on worker
//! threads.
//!
//! # Pipeline
//!
//! ```text
//! ClassUnit ──▶ ConstructorWeaver ──▶ MethodWeaver ──▶ woven ClassUnit
//!                      │                    │
//!                      └──── dispatch ◀─────┤
//!                            call_through ◀─┘
//! ```

pub mod batch;
pub mod call_through;
pub mod classify;
pub mod constructor;
pub mod dispatch;
pub mod method;
pub mod plan;

pub use batch::{weave_batch, BatchOutcome};
pub use call_through::{emit_fallback, CalleeKind};
pub use classify::{classify, Classify};
pub use constructor::ConstructorWeaver;
pub use dispatch::{dispatch_block, RESULT_LOCAL};
pub use method::{MethodWeaver, SynthesisMode};
pub use plan::{Action, PlanEntry, SkipReason, WeavePlan, WeaveReport};

use crate::config::WeaveConfig;
use crate::error::{WeaveError, WeaveResult};
use crate::model::{ClassPool, ClassUnit};
use tracing::info;

/// Weaves classes resolved against a pool
pub struct Weaver<'a> {
    pool: &'a ClassPool,
    config: &'a WeaveConfig,
}

impl<'a> Weaver<'a> {
    /// Create a weaver
    pub fn new(pool: &'a ClassPool, config: &'a WeaveConfig) -> Self {
        Self { pool, config }
    }

    /// Weave `class` in place: constructors first, then methods.
    ///
    /// On error the class may be partially modified and should be discarded.
    pub fn weave_class(&self, class: &mut ClassUnit) -> WeaveResult<WeaveReport> {
        check_weavable(class)?;

        let mut report = WeaveReport::new(class.name());
        report
            .entries
            .extend(ConstructorWeaver::new().weave(class)?);
        report
            .entries
            .extend(MethodWeaver::new(self.pool, self.config).weave(class)?);

        info!(class = %class.name(), summary = %report, "class woven");
        Ok(report)
    }

    /// Clone `name` out of the pool and weave the copy
    pub fn weave_named(&self, name: &str) -> WeaveResult<(ClassUnit, WeaveReport)> {
        let mut class = self.pool.require(name)?.clone();
        let report = self.weave_class(&mut class)?;
        Ok((class, report))
    }

    /// What [`Weaver::weave_class`] would do, without modifying anything
    pub fn plan(&self, class: &ClassUnit) -> WeaveResult<WeavePlan> {
        check_weavable(class)?;

        let mut plan = WeavePlan::new(class.name());
        plan.entries.extend(ConstructorWeaver::new().plan(class)?);
        plan.entries.extend(
            MethodWeaver::new(self.pool, self.config)
                .plan(class)?
                .iter()
                .map(|step| step.entry()),
        );
        Ok(plan)
    }
}

fn check_weavable(class: &ClassUnit) -> WeaveResult<()> {
    if class.is_interface() {
        return Err(WeaveError::structural(
            class.name(),
            "interfaces have no bodies to weave",
        ));
    }
    if ClassPool::is_bootstrap(class.name()) {
        return Err(WeaveError::structural(
            class.name(),
            "bootstrap classes cannot be woven",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConstructorUnit, MethodUnit, Modifiers};
    use shade_sdk::TypeDescriptor;

    fn native_class() -> ClassUnit {
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
    fn test_plan_matches_report() {
        let pool = ClassPool::bootstrap();
        let config = WeaveConfig::default();
        let weaver = Weaver::new(&pool, &config);
        let mut class = native_class();

        let plan = weaver.plan(&class).unwrap();
        let report = weaver.weave_class(&mut class).unwrap();
        assert_eq!(plan, report);
        assert_eq!(report.constructors(), 2);
        assert_eq!(report.replaced(), 1);
        assert_eq!(report.synthesized(), 3);
        assert!(report.default_constructor_added());
    }

    #[test]
    fn test_plan_does_not_modify() {
        let pool = ClassPool::bootstrap();
        let config = WeaveConfig::default();
        let class = native_class();
        let before = class.clone();
        Weaver::new(&pool, &config).plan(&class).unwrap();
        assert_eq!(class, before);
    }

    #[test]
    fn test_rejects_interface() {
        let pool = ClassPool::bootstrap();
        let config = WeaveConfig::default();
        let mut iface = ClassUnit::new("com.example.Api", Modifiers::PUBLIC).as_interface();
        assert!(matches!(
            Weaver::new(&pool, &config).weave_class(&mut iface),
            Err(WeaveError::StructuralPrecondition { .. })
        ));
    }

    #[test]
    fn test_weave_named_leaves_pool_untouched() {
        let mut pool = ClassPool::bootstrap();
        pool.insert(native_class());
        let config = WeaveConfig::default();
        let (woven, _) = Weaver::new(&pool, &config).weave_named("com.example.Foo").unwrap();
        assert_eq!(woven.methods().len(), 4);
        assert_eq!(pool.require("com.example.Foo").unwrap().methods().len(), 1);
    }
}
