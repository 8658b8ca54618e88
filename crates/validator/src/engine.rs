//! Validation engine
//!
//! [`Validator`] ties the pieces together: it compiles rule specs against
//! its [`RuleRegistry`] (caching the plans), lets the [`Walker`] enumerate
//! fields, evaluates each field's checks and collects [`FieldError`]s.
//!
//! A pass holds a read lock on the registry for its whole duration, so it
//! sees one consistent registry snapshot. Registration takes the write lock
//! and clears the plan cache.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::{RwLock, RwLockReadGuard};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::{FieldMode, ValidatorConfig};
use crate::error::Result;
use crate::foundation::{FieldContext, FieldError, Validatable, ValidationErrors};
use crate::plan::{FieldPlan, PlanSource, compile};
use crate::registry::{Arity, RuleRegistry};
use crate::rules::is_zero;
use crate::schema::Schema;
use crate::walker::{FieldDescriptor, Walker};

/// Struct and variable validator.
///
/// ```rust
/// use structval::Validator;
///
/// let validator = Validator::new();
/// validator.register_fn("pin", |ctx| {
///     let Ok(len) = ctx.param_as::<usize>() else { return false };
///     ctx.as_str()
///         .is_some_and(|s| s.len() == len && s.chars().all(|c| c.is_ascii_digit()))
/// })?;
///
/// assert!(validator.validate_var("123456", "required,pin=6")?.is_empty());
/// assert_eq!(validator.validate_var("12a456", "required,pin=6")?.len(), 1);
/// # Ok::<(), structval::Error>(())
/// ```
pub struct Validator {
    registry: RwLock<RuleRegistry>,
    plans: RwLock<HashMap<String, Arc<FieldPlan>>>,
    config: ValidatorConfig,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.registry.read().len())
            .field("cached_plans", &self.plans.read().len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Built-in rules, default configuration.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Built-in rules, custom configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self::from_parts(RuleRegistry::with_config(&config), config)
    }

    /// A prepared registry. The registry adopts the duplicate policy and
    /// alias depth from `config`; its aliases are checked again under that
    /// depth, see [`RuleRegistry::configure`].
    pub fn with_registry(mut registry: RuleRegistry, config: ValidatorConfig) -> Result<Self> {
        registry.configure(&config)?;
        Ok(Self::from_parts(registry, config))
    }

    fn from_parts(registry: RuleRegistry, config: ValidatorConfig) -> Self {
        Self {
            registry: RwLock::new(registry),
            plans: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Read access to the registry.
    pub fn registry(&self) -> RwLockReadGuard<'_, RuleRegistry> {
        self.registry.read()
    }

    // ==================== Registration ====================

    /// See [`RuleRegistry::register`].
    pub fn register_rule<F>(&self, name: &str, arity: Arity, func: F) -> Result<()>
    where
        F: Fn(&FieldContext<'_>) -> Result<bool> + Send + Sync + 'static,
    {
        self.mutate(|registry| registry.register(name, arity, func))
    }

    /// See [`RuleRegistry::register_fn`].
    pub fn register_fn<F>(&self, name: &str, predicate: F) -> Result<()>
    where
        F: Fn(&FieldContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.mutate(|registry| registry.register_fn(name, predicate))
    }

    /// See [`RuleRegistry::register_alias`].
    pub fn register_alias(&self, name: &str, expansion: &str) -> Result<()> {
        self.mutate(|registry| registry.register_alias(name, expansion))
    }

    fn mutate(&self, change: impl FnOnce(&mut RuleRegistry) -> Result<()>) -> Result<()> {
        let mut registry = self.registry.write();
        change(&mut registry)?;
        self.plans.write().clear();
        Ok(())
    }

    /// Compiles `rules` ahead of time, surfacing configuration errors
    /// without validating anything.
    pub fn prepare(&self, rules: &str) -> Result<Arc<FieldPlan>> {
        let registry = self.registry.read_recursive();
        self.plans(&registry).plan(rules)
    }

    /// Number of compiled plans currently cached.
    pub fn cached_plans(&self) -> usize {
        self.plans.read().len()
    }

    fn plans<'a>(&'a self, registry: &'a RuleRegistry) -> CachedPlans<'a> {
        CachedPlans {
            registry,
            cache: &self.plans,
            capacity: self.config.max_cached_plans,
        }
    }

    // ==================== Validation ====================

    /// Validates a JSON object against `schema`.
    ///
    /// Configuration errors abort the call. Validation failures are returned
    /// in walk order; an empty result means the value is valid.
    pub fn validate(&self, value: &Value, schema: &Schema) -> Result<ValidationErrors> {
        let registry = self.registry.read_recursive();
        let plans = self.plans(&registry);
        let walker = Walker::new(&plans, self.config.max_depth);

        let root = schema.name();
        let mut pass = Pass::new(self.config.field_mode, root, None);
        walker.walk_struct(value, schema, &mut |field| pass.evaluate(field))?;

        debug!(
            schema = root.unwrap_or("<anonymous>"),
            fields = pass.fields,
            errors = pass.errors.len(),
            "validated struct"
        );
        Ok(pass.errors)
    }

    /// Serializes `value` and validates it against `T::schema()`.
    pub fn validate_struct<T>(&self, value: &T) -> Result<ValidationErrors>
    where
        T: Validatable + Serialize + ?Sized,
    {
        let json = serde_json::to_value(value)?;
        self.validate(&json, &T::schema())
    }

    /// Validates a single value against `rules`.
    ///
    /// Errors carry an empty namespace and field name.
    pub fn validate_var<T>(&self, value: &T, rules: &str) -> Result<ValidationErrors>
    where
        T: Serialize + ?Sized,
    {
        let json = serde_json::to_value(value)?;
        self.run_var(&json, None, rules)
    }

    /// Validates `value` against `rules`, with `other` as the comparison
    /// target of parameterless cross-field rules such as `eqfield`.
    pub fn validate_var_with_value<T, U>(
        &self,
        value: &T,
        other: &U,
        rules: &str,
    ) -> Result<ValidationErrors>
    where
        T: Serialize + ?Sized,
        U: Serialize + ?Sized,
    {
        let json = serde_json::to_value(value)?;
        let other = serde_json::to_value(other)?;
        self.run_var(&json, Some(&other), rules)
    }

    fn run_var(&self, value: &Value, other: Option<&Value>, rules: &str) -> Result<ValidationErrors> {
        let registry = self.registry.read_recursive();
        let plans = self.plans(&registry);
        let walker = Walker::new(&plans, self.config.max_depth);

        let mut pass = Pass::new(self.config.field_mode, None, other);
        walker.walk_value(value, rules, None, &mut |field| pass.evaluate(field))?;

        debug!(rules, fields = pass.fields, errors = pass.errors.len(), "validated value");
        Ok(pass.errors)
    }
}

// ==================== Plan cache ====================

/// Plans are cached per spec text until `capacity` distinct specs are held;
/// specs seen after that are compiled on every use.
struct CachedPlans<'a> {
    registry: &'a RuleRegistry,
    cache: &'a RwLock<HashMap<String, Arc<FieldPlan>>>,
    capacity: usize,
}

impl PlanSource for CachedPlans<'_> {
    fn plan(&self, spec: &str) -> Result<Arc<FieldPlan>> {
        if let Some(plan) = self.cache.read().get(spec) {
            return Ok(Arc::clone(plan));
        }
        trace!(spec, "compiling rule spec");
        let plan = Arc::new(compile(spec, self.registry)?);
        let mut cache = self.cache.write();
        if cache.len() < self.capacity {
            cache.insert(spec.to_owned(), Arc::clone(&plan));
        } else {
            trace!(spec, capacity = self.capacity, "plan cache full");
        }
        Ok(plan)
    }
}

// ==================== Evaluation ====================

/// State of one validation pass.
struct Pass<'a> {
    mode: FieldMode,
    root: Option<&'a str>,
    other: Option<&'a Value>,
    fields: usize,
    errors: ValidationErrors,
}

impl<'a> Pass<'a> {
    fn new(mode: FieldMode, root: Option<&'a str>, other: Option<&'a Value>) -> Self {
        Self {
            mode,
            root,
            other,
            fields: 0,
            errors: ValidationErrors::new(),
        }
    }

    /// Runs the checks of one field. Returns whether the walker may descend.
    fn evaluate(&mut self, field: &FieldDescriptor<'_>) -> Result<bool> {
        self.fields += 1;
        let plan = field.plan;
        if plan.omit_empty && is_zero(field.value) {
            return Ok(false);
        }

        let base = FieldContext::new(field.value, "", &field.path)
            .with_parent(field.parent)
            .with_other(self.other);

        let mut passed = true;
        for check in &plan.checks {
            if check.evaluate(&base)? {
                continue;
            }
            passed = false;

            let mut error = FieldError::new(self.root, &field.path, check.tag.as_str())
                .with_actual_tag(check.actual_tag.as_str())
                .with_value(field.value.clone())
                .on_key(field.on_key);
            if let Some(param) = check.param() {
                error = error.with_param(param);
            }
            self.errors.add(error);

            if self.mode == FieldMode::FirstFailure {
                break;
            }
        }
        Ok(passed)
    }
}

// ==================== Shared instance ====================

static DEFAULT: LazyLock<Validator> = LazyLock::new(Validator::new);

/// A process-wide validator with built-in rules and default configuration.
///
/// Used by [`Validatable::validate`]. Tests and applications that register
/// custom rules should prefer their own [`Validator`].
pub fn default_validator() -> &'static Validator {
    &DEFAULT
}
