//! Rule registry
//!
//! Maps rule names to evaluators and alias names to rule-spec expansions.
//! Rules and aliases share one namespace. Aliases are validated when they
//! are registered: every name in the expansion must resolve and transitive
//! expansion must terminate within `max_alias_depth` steps.
//!
//! ```rust
//! use structval::{Arity, RuleRegistry};
//!
//! let mut registry = RuleRegistry::new();
//! registry.register_fn("username", |ctx| {
//!     ctx.as_str()
//!         .is_some_and(|s| s.chars().count() >= 5 && !s.chars().any(char::is_uppercase))
//! })?;
//! registry.register_alias("varchar", "required,min=5,max=25")?;
//!
//! assert!(registry.is_alias("varchar"));
//! assert_eq!(registry.resolve("varchar")?.len(), 3);
//! # Ok::<(), structval::Error>(())
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{DEFAULT_MAX_ALIAS_DEPTH, DuplicatePolicy, ValidatorConfig};
use crate::error::{Error, Result};
use crate::foundation::FieldContext;
use crate::plan::parse::{DIRECTIVES, RuleCall, Token, tokenize};
use crate::plan::RuleRef;
use crate::rules;

// ==================== Rule entries ====================

/// Signature of a rule evaluator.
///
/// `Ok(true)` passes, `Ok(false)` is a validation failure, `Err` is a
/// configuration error that aborts the whole call.
pub type RuleFn = dyn Fn(&FieldContext<'_>) -> Result<bool> + Send + Sync;

/// Whether a rule accepts a `=param` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// `name` only
    None,
    /// `name` or `name=param`
    Optional,
    /// `name=param` only
    Required,
}

/// A registered rule.
pub struct RuleEntry {
    name: String,
    arity: Arity,
    func: Box<RuleFn>,
}

impl RuleEntry {
    /// Rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter arity.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Runs the evaluator.
    pub fn check(&self, ctx: &FieldContext<'_>) -> Result<bool> {
        (self.func)(ctx)
    }
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEntry")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct AliasEntry {
    expansion: String,
    tokens: Vec<Token>,
}

#[derive(Debug, Clone)]
enum Entry {
    Rule(Arc<RuleEntry>),
    Alias(Arc<AliasEntry>),
}

// ==================== Registry ====================

/// Name → rule/alias table.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    entries: HashMap<String, Entry>,
    on_duplicate: DuplicatePolicy,
    max_alias_depth: usize,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    /// A registry with every built-in rule and the default policy.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        rules::register_builtins(&mut registry);
        registry
    }

    /// A registry without any rules.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            on_duplicate: DuplicatePolicy::default(),
            max_alias_depth: DEFAULT_MAX_ALIAS_DEPTH,
        }
    }

    /// A registry with built-ins and the policy from `config`.
    pub fn with_config(config: &ValidatorConfig) -> Self {
        let mut registry = Self::new();
        registry.apply(config);
        registry
    }

    /// Applies the duplicate policy and alias depth from `config`.
    ///
    /// Registered aliases are checked again under the new depth. If one no
    /// longer terminates, the previous settings are kept and the
    /// [`Error::CyclicAlias`] is returned.
    pub fn configure(&mut self, config: &ValidatorConfig) -> Result<()> {
        let previous = (self.on_duplicate, self.max_alias_depth);
        self.apply(config);
        if let Err(err) = self.check_aliases() {
            (self.on_duplicate, self.max_alias_depth) = previous;
            return Err(err);
        }
        Ok(())
    }

    fn apply(&mut self, config: &ValidatorConfig) {
        self.on_duplicate = config.on_duplicate;
        self.max_alias_depth = config.max_alias_depth;
    }

    /// Registers a rule whose evaluator may fail with a configuration error.
    pub fn register<F>(&mut self, name: &str, arity: Arity, func: F) -> Result<()>
    where
        F: Fn(&FieldContext<'_>) -> Result<bool> + Send + Sync + 'static,
    {
        let replacing = self.admit(name)?;
        self.entries
            .insert(name.to_owned(), Entry::Rule(Arc::new(entry(name, arity, func))));
        if replacing {
            warn!(rule = name, "replaced an existing rule");
        } else {
            debug!(rule = name, ?arity, "registered rule");
        }
        Ok(())
    }

    /// Registers a plain predicate. The rule accepts an optional parameter,
    /// which the predicate reads through [`FieldContext::param`].
    pub fn register_fn<F>(&mut self, name: &str, predicate: F) -> Result<()>
    where
        F: Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.register(name, Arity::Optional, move |ctx| Ok(predicate(ctx)))
    }

    /// Registers `name` as shorthand for `expansion`.
    ///
    /// The expansion may contain rules, alternations and other aliases but
    /// no traversal directives.
    pub fn register_alias(&mut self, name: &str, expansion: &str) -> Result<()> {
        let replacing = self.admit(name)?;
        let tokens = tokenize(expansion)?;
        if tokens.is_empty() {
            return Err(Error::malformed(expansion, "alias expansion is empty"));
        }
        if let Some(token) = tokens.iter().find(|t| !matches!(t, Token::Group { .. })) {
            return Err(Error::malformed(
                expansion,
                format!("{token:?} directive is not allowed in an alias"),
            ));
        }

        let alias = AliasEntry {
            expansion: expansion.to_owned(),
            tokens,
        };
        let previous = self
            .entries
            .insert(name.to_owned(), Entry::Alias(Arc::new(alias)));

        if let Err(err) = self.check_alias(name, expansion) {
            match previous {
                Some(entry) => self.entries.insert(name.to_owned(), entry),
                None => self.entries.remove(name),
            };
            return Err(err);
        }

        if replacing {
            warn!(alias = name, expansion, "replaced an existing rule or alias");
        } else {
            debug!(alias = name, expansion, "registered alias");
        }
        Ok(())
    }

    /// Returns the evaluators behind `name`, expanding aliases in declared order.
    pub fn resolve(&self, name: &str) -> Result<Vec<Arc<RuleEntry>>> {
        let mut out = Vec::new();
        self.collect(name, 0, &mut out)?;
        Ok(out)
    }

    fn collect(&self, name: &str, depth: usize, out: &mut Vec<Arc<RuleEntry>>) -> Result<()> {
        match self.entries.get(name) {
            None => Err(Error::unknown_rule(name)),
            Some(Entry::Rule(rule)) => {
                out.push(Arc::clone(rule));
                Ok(())
            }
            Some(Entry::Alias(alias)) => {
                if depth >= self.max_alias_depth {
                    return Err(self.cyclic(name));
                }
                for call in alias.calls() {
                    self.collect(&call.name, depth + 1, out)?;
                }
                Ok(())
            }
        }
    }

    /// Returns `true` if `name` is a rule or an alias.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns `true` if `name` is an alias.
    pub fn is_alias(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Entry::Alias(_)))
    }

    /// The expansion text of an alias.
    pub fn alias_expansion(&self, name: &str) -> Option<&str> {
        match self.entries.get(name) {
            Some(Entry::Alias(alias)) => Some(&alias.expansion),
            _ => None,
        }
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of rules and aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a built-in without policy checks or logging.
    pub(crate) fn insert_builtin<F>(&mut self, name: &str, arity: Arity, func: F)
    where
        F: Fn(&FieldContext<'_>) -> Result<bool> + Send + Sync + 'static,
    {
        self.entries
            .insert(name.to_owned(), Entry::Rule(Arc::new(entry(name, arity, func))));
    }

    /// Validates `name` and applies the duplicate policy. Returns whether an
    /// existing entry will be replaced.
    fn admit(&self, name: &str) -> Result<bool> {
        check_name(name)?;
        if !self.entries.contains_key(name) {
            return Ok(false);
        }
        match self.on_duplicate {
            DuplicatePolicy::Replace => Ok(true),
            DuplicatePolicy::Reject => Err(Error::DuplicateRule {
                name: name.to_owned(),
            }),
        }
    }

    /// Expands alias `name` fully. A cycle is reported against `name`.
    fn check_alias(&self, name: &str, expansion: &str) -> Result<()> {
        let call = RuleCall {
            name: name.to_owned(),
            param: None,
        };
        match self.expand(expansion, &call, 0) {
            Ok(_) => Ok(()),
            Err(Error::CyclicAlias { depth, .. }) => Err(Error::CyclicAlias {
                name: name.to_owned(),
                depth,
            }),
            Err(other) => Err(other),
        }
    }

    fn check_aliases(&self) -> Result<()> {
        let mut aliases: Vec<(&str, &str)> = self
            .entries
            .iter()
            .filter_map(|(name, entry)| match entry {
                Entry::Alias(alias) => Some((name.as_str(), alias.expansion.as_str())),
                Entry::Rule(_) => None,
            })
            .collect();
        aliases.sort_unstable();
        aliases
            .into_iter()
            .try_for_each(|(name, expansion)| self.check_alias(name, expansion))
    }

    fn cyclic(&self, name: &str) -> Error {
        Error::CyclicAlias {
            name: name.to_owned(),
            depth: self.max_alias_depth,
        }
    }

    // ==================== Expansion ====================

    /// Expands one comma-separated group into checks. Each returned vector
    /// is one check's alternatives.
    pub(crate) fn expand_group(
        &self,
        spec: &str,
        calls: &[RuleCall],
        depth: usize,
    ) -> Result<Vec<Vec<RuleRef>>> {
        if let [single] = calls {
            return self.expand(spec, single, depth);
        }

        let mut alternatives = Vec::with_capacity(calls.len());
        for call in calls {
            let mut groups = self.expand(spec, call, depth)?;
            match groups.pop() {
                Some(group) if groups.is_empty() => alternatives.extend(group),
                _ => {
                    return Err(Error::malformed(
                        spec,
                        format!("alias '{}' expands to several rules and cannot be used in an alternation", call.name),
                    ));
                }
            }
        }
        Ok(vec![alternatives])
    }

    fn expand(&self, spec: &str, call: &RuleCall, depth: usize) -> Result<Vec<Vec<RuleRef>>> {
        match self.entries.get(&call.name) {
            None => Err(Error::unknown_rule(&call.name)),
            Some(Entry::Rule(rule)) => {
                check_arity(spec, rule, call)?;
                Ok(vec![vec![RuleRef {
                    name: call.name.clone(),
                    param: call.param.clone(),
                    entry: Arc::clone(rule),
                }]])
            }
            Some(Entry::Alias(alias)) => {
                if call.param.is_some() {
                    return Err(Error::malformed(
                        spec,
                        format!("alias '{}' does not take a parameter", call.name),
                    ));
                }
                if depth >= self.max_alias_depth {
                    return Err(self.cyclic(&call.name));
                }
                let mut groups = Vec::new();
                for token in &alias.tokens {
                    if let Token::Group { calls, .. } = token {
                        groups.extend(self.expand_group(&alias.expansion, calls, depth + 1)?);
                    }
                }
                Ok(groups)
            }
        }
    }
}

impl AliasEntry {
    fn calls(&self) -> impl Iterator<Item = &RuleCall> {
        self.tokens.iter().flat_map(|token| match token {
            Token::Group { calls, .. } => calls.as_slice(),
            _ => &[][..],
        })
    }
}

fn entry<F>(name: &str, arity: Arity, func: F) -> RuleEntry
where
    F: Fn(&FieldContext<'_>) -> Result<bool> + Send + Sync + 'static,
{
    RuleEntry {
        name: name.to_owned(),
        arity,
        func: Box::new(func),
    }
}

fn check_name(name: &str) -> Result<()> {
    let reserved = name.is_empty()
        || DIRECTIVES.contains(&name)
        || name
            .chars()
            .any(|c| matches!(c, ',' | '|' | '=') || c.is_whitespace());
    if reserved {
        return Err(Error::ReservedName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

fn check_arity(spec: &str, rule: &RuleEntry, call: &RuleCall) -> Result<()> {
    match (rule.arity, &call.param) {
        (Arity::None, Some(_)) => Err(Error::malformed(
            spec,
            format!("rule '{}' does not take a parameter", rule.name),
        )),
        (Arity::Required, None) => Err(Error::malformed(
            spec,
            format!("rule '{}' requires a parameter", rule.name),
        )),
        _ => Ok(()),
    }
}
