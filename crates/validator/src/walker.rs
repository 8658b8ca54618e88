//! Path walker
//!
//! Enumerates the fields of a value in a stable order and hands each one,
//! with its compiled plan, to a visitor:
//!
//! - a struct field produces one descriptor, then (if the visitor lets it)
//!   the walker descends into a nested struct or, under `dive`, into the
//!   elements of a collection or the entries of a mapping;
//! - a mapping entry produces a key descriptor (only with a `keys` block)
//!   followed by a value descriptor.
//!
//! The visitor returns `Ok(false)` to stop the walker from descending below
//! the current field.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::foundation::FieldPath;
use crate::plan::{DivePlan, FieldPlan, PlanSource};
use crate::rules::kind_name;
use crate::schema::{NestedSchema, Schema};

static NULL: Value = Value::Null;

/// One field scheduled for evaluation.
#[derive(Debug)]
pub struct FieldDescriptor<'a> {
    /// Location relative to the root.
    pub path: FieldPath,
    /// The value to check. `null` when a declared field is absent.
    pub value: &'a Value,
    /// Checks that apply at this level.
    pub plan: &'a FieldPlan,
    /// The struct that declares the field.
    pub parent: Option<&'a Map<String, Value>>,
    /// Set for mapping keys.
    pub on_key: bool,
}

/// Where a field sits: its declaring struct, the schema of struct values
/// below it, and how deep it is.
#[derive(Clone, Copy)]
struct Scope<'a> {
    parent: Option<&'a Map<String, Value>>,
    nested: Option<&'a NestedSchema>,
    depth: usize,
}

impl Scope<'_> {
    fn deeper(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }
}

/// Depth-bounded traversal driven by a [`PlanSource`].
pub struct Walker<'p> {
    plans: &'p dyn PlanSource,
    max_depth: usize,
}

impl<'p> Walker<'p> {
    /// Creates a walker that compiles specs through `plans`.
    pub fn new(plans: &'p dyn PlanSource, max_depth: usize) -> Self {
        Self { plans, max_depth }
    }

    /// Walks every field declared by `schema`. `value` must be an object.
    pub fn walk_struct<F>(&self, value: &Value, schema: &Schema, visit: &mut F) -> Result<()>
    where
        F: FnMut(&FieldDescriptor<'_>) -> Result<bool>,
    {
        let Value::Object(map) = value else {
            return Err(Error::UnsupportedType {
                rule: schema.name().unwrap_or("struct").to_owned(),
                kind: kind_name(value),
            });
        };
        self.fields(map, schema, &FieldPath::root(), 0, visit)
    }

    /// Walks a bare value under a single rule spec.
    pub fn walk_value<F>(
        &self,
        value: &Value,
        rules: &str,
        nested: Option<&NestedSchema>,
        visit: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&FieldDescriptor<'_>) -> Result<bool>,
    {
        let plan = self.plans.plan(rules)?;
        let scope = Scope {
            parent: None,
            nested,
            depth: 0,
        };
        self.field(FieldPath::root(), value, &plan, scope, visit)
    }

    fn fields<F>(
        &self,
        map: &Map<String, Value>,
        schema: &Schema,
        path: &FieldPath,
        depth: usize,
        visit: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&FieldDescriptor<'_>) -> Result<bool>,
    {
        self.check_depth(path, depth)?;
        for spec in schema.fields() {
            let value = map.get(&spec.name).unwrap_or(&NULL);
            let plan = self.plans.plan(&spec.rules)?;
            let scope = Scope {
                parent: Some(map),
                nested: spec.nested.as_ref(),
                depth,
            };
            self.field(path.child(spec.name.as_str()), value, &plan, scope, visit)?;
        }
        Ok(())
    }

    fn field<F>(
        &self,
        path: FieldPath,
        value: &Value,
        plan: &FieldPlan,
        scope: Scope<'_>,
        visit: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&FieldDescriptor<'_>) -> Result<bool>,
    {
        let descriptor = FieldDescriptor {
            path,
            value,
            plan,
            parent: scope.parent,
            on_key: false,
        };
        if !visit(&descriptor)? {
            return Ok(());
        }
        let path = descriptor.path;

        if let Some(dive) = &plan.dive {
            return self.dive(&path, value, dive, scope.deeper(), visit);
        }
        match (scope.nested, value) {
            (Some(nested), Value::Object(map)) => {
                let schema = nested.resolve();
                self.fields(map, &schema, &path, scope.depth + 1, visit)
            }
            _ => Ok(()),
        }
    }

    fn dive<F>(
        &self,
        path: &FieldPath,
        value: &Value,
        dive: &DivePlan,
        scope: Scope<'_>,
        visit: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&FieldDescriptor<'_>) -> Result<bool>,
    {
        self.check_depth(path, scope.depth)?;
        match value {
            Value::Null => Ok(()),
            Value::Array(items) => {
                if dive.keys.is_some() {
                    return Err(Error::UnsupportedType {
                        rule: "keys".to_owned(),
                        kind: kind_name(value),
                    });
                }
                for (index, item) in items.iter().enumerate() {
                    self.field(path.index(index), item, &dive.elements, scope, visit)?;
                }
                Ok(())
            }
            Value::Object(entries) => {
                for (key, item) in entries {
                    if let Some(keys) = &dive.keys {
                        let key_value = Value::String(key.clone());
                        let descriptor = FieldDescriptor {
                            path: path.key(key.as_str()),
                            value: &key_value,
                            plan: keys,
                            parent: scope.parent,
                            on_key: true,
                        };
                        visit(&descriptor)?;
                    }
                    self.field(path.key(key.as_str()), item, &dive.elements, scope, visit)?;
                }
                Ok(())
            }
            other => Err(Error::UnsupportedType {
                rule: "dive".to_owned(),
                kind: kind_name(other),
            }),
        }
    }

    fn check_depth(&self, path: &FieldPath, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            return Err(Error::DepthLimitExceeded {
                path: path.to_string(),
                limit: self.max_depth,
            });
        }
        Ok(())
    }
}
