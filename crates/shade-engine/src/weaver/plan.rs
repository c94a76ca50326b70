//! Weave plans and reports

use super::call_through::CalleeKind;
use std::fmt;

/// Why a member is left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Enum constructors are never rewritten
    EnumConstructor,
    /// `final` methods of enums stay as they are
    EnumFinal,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EnumConstructor => f.write_str("enum constructor"),
            SkipReason::EnumFinal => f.write_str("final enum method"),
        }
    }
}

/// What weaving does to one member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Dispatch block inserted before the retained original body
    PrefixGuard,
    /// Absent body replaced by dispatch block and default-value fallback
    FullReplacement,
    /// New override added with dispatch block and fallback
    SynthesizedOverride {
        /// Fallback used when no substitute answers
        fallback: CalleeKind,
    },
    /// Constructor body replaced by the dispatch block
    ConstructorReplacement,
    /// Zero-argument constructor added
    DefaultConstructor,
    /// Left unmodified
    Skipped(SkipReason),
}

impl Action {
    /// Whether the member's code is changed or added
    pub fn is_woven(&self) -> bool {
        !matches!(self, Action::Skipped(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::PrefixGuard => f.write_str("prefix-guard"),
            Action::FullReplacement => f.write_str("full-replacement"),
            Action::SynthesizedOverride { fallback } => {
                write!(f, "synthesized-override ({})", fallback)
            }
            Action::ConstructorReplacement => f.write_str("constructor-replacement"),
            Action::DefaultConstructor => f.write_str("default-constructor"),
            Action::Skipped(reason) => write!(f, "skipped ({})", reason),
        }
    }
}

/// One member and its action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    /// Member description (modifiers, return type, qualified name, parameters)
    pub member: String,
    /// What weaving does to it
    pub action: Action,
}

impl PlanEntry {
    /// Create an entry
    pub fn new(member: impl Into<String>, action: Action) -> Self {
        Self {
            member: member.into(),
            action,
        }
    }
}

/// Per-member actions for one class, constructors first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeavePlan {
    /// Qualified class name
    pub class: String,
    /// Entries in weaving order
    pub entries: Vec<PlanEntry>,
}

/// The plan as carried out by [`crate::Weaver::weave_class`]
pub type WeaveReport = WeavePlan;

impl WeavePlan {
    /// Empty plan for `class`
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            entries: Vec::new(),
        }
    }

    /// Number of entries whose action satisfies `pred`
    pub fn count(&self, pred: impl Fn(&Action) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.action)).count()
    }

    /// Members given a prefix guard
    pub fn prefix_guarded(&self) -> usize {
        self.count(|a| matches!(a, Action::PrefixGuard))
    }

    /// Methods fully replaced
    pub fn replaced(&self) -> usize {
        self.count(|a| matches!(a, Action::FullReplacement))
    }

    /// Overrides added
    pub fn synthesized(&self) -> usize {
        self.count(|a| matches!(a, Action::SynthesizedOverride { .. }))
    }

    /// Constructors rewritten, the synthesized default included
    pub fn constructors(&self) -> usize {
        self.count(|a| matches!(a, Action::ConstructorReplacement | Action::DefaultConstructor))
    }

    /// Members left untouched
    pub fn skipped(&self) -> usize {
        self.count(|a| !a.is_woven())
    }

    /// Whether a zero-argument constructor was added
    pub fn default_constructor_added(&self) -> bool {
        self.count(|a| matches!(a, Action::DefaultConstructor)) > 0
    }
}

impl fmt::Display for WeavePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} guarded, {} replaced, {} synthesized, {} constructors, {} skipped",
            self.class,
            self.prefix_guarded(),
            self.replaced(),
            self.synthesized(),
            self.constructors(),
            self.skipped()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_summary() {
        let mut plan = WeavePlan::new("com.example.Foo");
        plan.entries.push(PlanEntry::new("public com.example.Foo(int)", Action::ConstructorReplacement));
        plan.entries.push(PlanEntry::new("public com.example.Foo()", Action::DefaultConstructor));
        plan.entries.push(PlanEntry::new("public int com.example.Foo.compute(int)", Action::FullReplacement));
        plan.entries.push(PlanEntry::new(
            "public boolean com.example.Foo.equals(java.lang.Object)",
            Action::SynthesizedOverride {
                fallback: CalleeKind::SuperCall,
            },
        ));

        assert!(plan.default_constructor_added());
        assert_eq!(plan.constructors(), 2);
        assert_eq!(plan.skipped(), 0);
        assert_eq!(
            plan.to_string(),
            "com.example.Foo: 0 guarded, 1 replaced, 1 synthesized, 2 constructors, 0 skipped"
        );
    }

    #[test]
    fn test_action_display() {
        assert_eq!(
            Action::SynthesizedOverride {
                fallback: CalleeKind::DefaultValue
            }
            .to_string(),
            "synthesized-override (default value)"
        );
        assert_eq!(Action::Skipped(SkipReason::EnumFinal).to_string(), "skipped (final enum method)");
    }
}
