//! Compiled rule specs
//!
//! A rule spec such as `required,dive,keys,min=2,endkeys,dive` is compiled
//! once into a [`FieldPlan`]: the checks for the field itself plus an
//! optional [`DivePlan`] for its elements. Alias names are expanded and
//! every rule name is bound to its registry entry during compilation, so a
//! plan never looks anything up while a value is being validated.

mod compile;
pub mod parse;

use std::sync::Arc;

use crate::error::Result;
use crate::foundation::FieldContext;
use crate::registry::RuleEntry;

pub use compile::compile;
pub use parse::{RuleCall, Token, tokenize};

/// A concrete rule bound to its registry entry.
#[derive(Debug, Clone)]
pub struct RuleRef {
    /// Rule name
    pub name: String,
    /// Parameter from the rule spec
    pub param: Option<String>,
    /// The registered evaluator
    pub entry: Arc<RuleEntry>,
}

/// One comma-separated check. It passes when any alternative passes.
#[derive(Debug, Clone)]
pub struct Check {
    /// Tag reported on failure: the alias, rule or alternation as written.
    pub tag: String,
    /// Concrete rule (or `|`-joined rules) behind the tag.
    pub actual_tag: String,
    /// Rules tried left to right.
    pub alternatives: Vec<RuleRef>,
}

impl Check {
    pub(crate) fn new(tag: String, alternatives: Vec<RuleRef>) -> Self {
        let actual_tag = alternatives
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join("|");
        Self {
            tag,
            actual_tag,
            alternatives,
        }
    }

    /// Parameter to report on failure. Alternations report none.
    pub fn param(&self) -> Option<&str> {
        match self.alternatives.as_slice() {
            [single] => single.param.as_deref(),
            _ => None,
        }
    }

    /// Runs the alternatives against `base`, stopping at the first pass.
    pub fn evaluate(&self, base: &FieldContext<'_>) -> Result<bool> {
        for rule in &self.alternatives {
            let ctx = base.with_rule(&rule.name).with_param(rule.param.as_deref());
            if rule.entry.check(&ctx)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Checks for one level of a value, plus what to do with its elements.
#[derive(Debug, Clone, Default)]
pub struct FieldPlan {
    /// Skip everything at this level when the value is empty.
    pub omit_empty: bool,
    /// Checks in spec order.
    pub checks: Vec<Check>,
    /// Element traversal, present when the spec contains `dive`.
    pub dive: Option<Box<DivePlan>>,
}

impl FieldPlan {
    /// Returns `true` if the plan neither checks nor dives.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty() && self.dive.is_none()
    }
}

/// Rules for the elements of a collection or the entries of a mapping.
#[derive(Debug, Clone, Default)]
pub struct DivePlan {
    /// Checks on mapping keys, from a `keys ... endkeys` block.
    pub keys: Option<FieldPlan>,
    /// Checks on each element or mapping value.
    pub elements: FieldPlan,
}

/// Something that turns rule-spec text into plans.
pub trait PlanSource {
    /// Returns the compiled plan for `spec`.
    fn plan(&self, spec: &str) -> Result<Arc<FieldPlan>>;
}
