//! Method weaver
//!
//! Every declared method gets a dispatch block; the configured identity
//! methods get one even when only inherited, through a synthesized override.
//!
//! | declared in class | abstract or native | mode |
//! |---|---|---|
//! | yes | no | prefix guard |
//! | yes | yes | full replacement |
//! | no | any | synthesized override |

use super::call_through::{emit_fallback, CalleeKind};
use super::dispatch::dispatch_block;
use super::plan::{Action, PlanEntry, SkipReason};
use crate::config::{PrefixGuardFallback, WeaveConfig};
use crate::error::{WeaveError, WeaveResult};
use crate::ir::{validate_body, GeneratedBody, MethodBody, Stmt};
use crate::model::{Callable, ClassPool, ClassUnit, MethodUnit, Modifiers};
use tracing::{debug, warn};

/// How a method body is synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynthesisMode {
    /// Dispatch block runs before the retained original statements
    PrefixGuard,
    /// Body replaced by dispatch block and default-value fallback
    FullReplacement,
    /// New method added with dispatch block and call-through fallback
    SynthesizedOverride,
}

impl SynthesisMode {
    /// Mode for a method, from where it is declared and whether it has code
    pub fn select(was_declared_in_class: bool, was_abstract_or_native: bool) -> Self {
        match (was_declared_in_class, was_abstract_or_native) {
            (true, false) => SynthesisMode::PrefixGuard,
            (true, true) => SynthesisMode::FullReplacement,
            (false, _) => SynthesisMode::SynthesizedOverride,
        }
    }
}

/// Flags removed from any method that receives a body
const STRIPPED: Modifiers = Modifiers::NATIVE
    .with(Modifiers::FINAL)
    .with(Modifiers::ABSTRACT);

/// Decision for one method
#[derive(Debug, Clone)]
pub(crate) enum MethodStep {
    /// Declared method at `index`
    Declared {
        index: usize,
        member: String,
        mode: Option<SynthesisMode>,
    },
    /// Override to add; `unit` has its final signature and modifiers
    Synthesize {
        unit: MethodUnit,
        fallback: CalleeKind,
        /// Description of the inherited method being shadowed
        inherited: String,
    },
    /// Inherited method that cannot be overridden
    SkipInherited { member: String },
}

impl MethodStep {
    pub(crate) fn entry(&self) -> PlanEntry {
        match self {
            MethodStep::Declared { member, mode, .. } => {
                let action = match mode {
                    Some(SynthesisMode::PrefixGuard) => Action::PrefixGuard,
                    Some(SynthesisMode::FullReplacement) => Action::FullReplacement,
                    Some(SynthesisMode::SynthesizedOverride) => Action::SynthesizedOverride {
                        fallback: CalleeKind::SuperCall,
                    },
                    None => Action::Skipped(SkipReason::EnumFinal),
                };
                PlanEntry::new(member.clone(), action)
            }
            MethodStep::Synthesize { unit, fallback, .. } => PlanEntry::new(
                unit.describe(),
                Action::SynthesizedOverride {
                    fallback: *fallback,
                },
            ),
            MethodStep::SkipInherited { member } => {
                PlanEntry::new(member.clone(), Action::Skipped(SkipReason::EnumFinal))
            }
        }
    }
}

/// Rewrites the methods of one class
pub struct MethodWeaver<'a> {
    pool: &'a ClassPool,
    config: &'a WeaveConfig,
}

impl<'a> MethodWeaver<'a> {
    /// Create a method weaver resolving inherited methods in `pool`
    pub fn new(pool: &'a ClassPool, config: &'a WeaveConfig) -> Self {
        Self { pool, config }
    }

    /// Decide the step for every declared method, then for every identity
    /// method the class does not declare
    pub(crate) fn plan(&self, class: &ClassUnit) -> WeaveResult<Vec<MethodStep>> {
        let mut steps = Vec::with_capacity(class.methods().len() + 3);

        for (index, method) in class.methods().iter().enumerate() {
            let member = method.describe();
            if class.is_enum() && method.modifiers().is_final() {
                steps.push(MethodStep::Declared {
                    index,
                    member,
                    mode: None,
                });
                continue;
            }
            if method.body().is_woven() {
                return Err(WeaveError::structural(
                    class.name(),
                    format!("{} is already woven", member),
                ));
            }
            let has_no_code = method.modifiers().is_abstract() || method.modifiers().is_native();
            if !has_no_code && method.body().is_absent() {
                return Err(WeaveError::structural(
                    class.name(),
                    format!("concrete method {} has no body", member),
                ));
            }
            steps.push(MethodStep::Declared {
                index,
                member,
                mode: Some(SynthesisMode::select(true, has_no_code)),
            });
        }

        for (name, signature) in self.config.identity_signatures()? {
            if class.find_method(name, &signature.params).is_some() {
                continue;
            }
            let inherited = match class.superclass() {
                Some(parent) => self.pool.resolve_method(parent, name, &signature.params)?,
                None => None,
            };
            let Some(inherited) = inherited else {
                return Err(WeaveError::structural(
                    class.name(),
                    format!("{}{} is not in the inheritance chain", name, signature),
                ));
            };
            if inherited.return_type() != &signature.ret {
                return Err(WeaveError::structural(
                    class.name(),
                    format!("{} does not match {}{}", inherited.describe(), name, signature),
                ));
            }

            let modifiers = inherited.modifiers();
            if modifiers.is_final() {
                if class.is_enum() {
                    steps.push(MethodStep::SkipInherited {
                        member: inherited.describe(),
                    });
                    continue;
                }
                return Err(WeaveError::structural(
                    class.name(),
                    format!("cannot override final {}", inherited.describe()),
                ));
            }
            if modifiers.is_static() {
                return Err(WeaveError::structural(
                    class.name(),
                    format!("cannot override static {}", inherited.describe()),
                ));
            }

            let fallback = if modifiers.is_abstract() {
                CalleeKind::DefaultValue
            } else {
                CalleeKind::SuperCall
            };
            let mut unit = MethodUnit::new(
                name,
                inherited.params().to_vec(),
                inherited.return_type().clone(),
                modifiers.without(STRIPPED),
            )
            .with_exceptions(inherited.exceptions().to_vec());
            unit.set_declaring_class(class.name());

            steps.push(MethodStep::Synthesize {
                unit,
                fallback,
                inherited: inherited.describe(),
            });
        }

        Ok(steps)
    }

    /// Weave every method of `class` in place
    pub fn weave(&self, class: &mut ClassUnit) -> WeaveResult<Vec<PlanEntry>> {
        let steps = self.plan(class)?;
        let class_name = class.name().to_string();
        let mut entries = Vec::with_capacity(steps.len());

        for step in steps {
            entries.push(step.entry());
            match step {
                MethodStep::Declared {
                    index,
                    member,
                    mode: Some(mode),
                } => {
                    let method = &mut class.methods_mut()[index];
                    self.weave_declared(&class_name, method, mode)
                        .map_err(|e| WeaveError::in_member(member.as_str(), e))?;
                    debug!(class = %class_name, member = %member, ?mode, "woven");
                }
                MethodStep::Declared { member, mode: None, .. } => {
                    warn!(class = %class_name, member = %member, "final enum method left unmodified");
                }
                MethodStep::Synthesize {
                    mut unit,
                    fallback,
                    inherited,
                } => {
                    let stmts = with_fallback(&class_name, &unit, fallback);
                    validate_body(&unit, &stmts, true)
                        .map_err(|e| WeaveError::in_member(inherited.as_str(), e.into()))?;
                    unit.set_body(MethodBody::Replaced(GeneratedBody::new(stmts)));
                    debug!(class = %class_name, member = %unit.describe(), %fallback, "override synthesized");
                    class.add_method(unit);
                }
                MethodStep::SkipInherited { member } => {
                    warn!(class = %class_name, member = %member, "final inherited method left unmodified");
                }
            }
        }
        Ok(entries)
    }

    fn weave_declared(
        &self,
        class_name: &str,
        method: &mut MethodUnit,
        mode: SynthesisMode,
    ) -> WeaveResult<()> {
        let body = match mode {
            SynthesisMode::PrefixGuard => {
                let inner = match self.config.prefix_guard_fallback {
                    PrefixGuardFallback::FallThrough => Vec::new(),
                    PrefixGuardFallback::DefaultValue => {
                        emit_fallback(&*method, CalleeKind::DefaultValue)
                    }
                };
                let guard = vec![dispatch_block(class_name, &*method, inner)];
                validate_body(&*method, &guard, false)?;
                let original = match method.take_body() {
                    MethodBody::Original(block) => block,
                    _ => Default::default(),
                };
                MethodBody::Guarded {
                    guard: GeneratedBody::new(guard),
                    original,
                }
            }
            SynthesisMode::FullReplacement => {
                let stmts = with_fallback(class_name, &*method, CalleeKind::DefaultValue);
                validate_body(&*method, &stmts, true)?;
                MethodBody::Replaced(GeneratedBody::new(stmts))
            }
            SynthesisMode::SynthesizedOverride => {
                let stmts = with_fallback(class_name, &*method, CalleeKind::SuperCall);
                validate_body(&*method, &stmts, true)?;
                MethodBody::Replaced(GeneratedBody::new(stmts))
            }
        };
        method.set_modifiers(method.modifiers().without(STRIPPED));
        method.set_body(body);
        Ok(())
    }
}

/// Dispatch block with `kind` as its null-sentinel branch, then `kind` again
/// for the direct-call path
fn with_fallback(class_name: &str, member: &dyn Callable, kind: CalleeKind) -> Vec<Stmt> {
    let fallback = emit_fallback(member, kind);
    let mut stmts = vec![dispatch_block(class_name, member, fallback.clone())];
    stmts.extend(fallback);
    stmts
}
