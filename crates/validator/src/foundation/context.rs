//! Evaluation context handed to every rule

use std::fmt::Display;
use std::str::FromStr;

use serde_json::{Map, Value};

use super::path::FieldPath;
use crate::error::{Error, Result};

/// Everything a rule may look at while judging one value.
///
/// Rules receive the value under test, the raw parameter from the rule spec,
/// the enclosing struct (for cross-field rules) and, for
/// [`Validator::validate_var_with_value`](crate::Validator::validate_var_with_value),
/// the second value.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    value: &'a Value,
    rule: &'a str,
    param: Option<&'a str>,
    parent: Option<&'a Map<String, Value>>,
    other: Option<&'a Value>,
    path: &'a FieldPath,
}

impl<'a> FieldContext<'a> {
    /// Creates a context for `value` at `path` being checked by `rule`.
    pub fn new(value: &'a Value, rule: &'a str, path: &'a FieldPath) -> Self {
        Self {
            value,
            rule,
            param: None,
            parent: None,
            other: None,
            path,
        }
    }

    /// Re-targets the context at another rule.
    #[must_use]
    pub fn with_rule(mut self, rule: &'a str) -> Self {
        self.rule = rule;
        self
    }

    /// Attaches the rule parameter.
    #[must_use]
    pub fn with_param(mut self, param: Option<&'a str>) -> Self {
        self.param = param;
        self
    }

    /// Attaches the enclosing struct.
    #[must_use]
    pub fn with_parent(mut self, parent: Option<&'a Map<String, Value>>) -> Self {
        self.parent = parent;
        self
    }

    /// Attaches the comparison value of a two-value call.
    #[must_use]
    pub fn with_other(mut self, other: Option<&'a Value>) -> Self {
        self.other = other;
        self
    }

    /// The value under test.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Name of the rule being evaluated.
    pub fn rule(&self) -> &'a str {
        self.rule
    }

    /// Raw parameter text, if the rule spec supplied one.
    pub fn param(&self) -> Option<&'a str> {
        self.param
    }

    /// Location of the value.
    pub fn path(&self) -> &'a FieldPath {
        self.path
    }

    /// The struct that owns the value, if any.
    pub fn parent(&self) -> Option<&'a Map<String, Value>> {
        self.parent
    }

    /// The second value of a two-value call.
    pub fn other(&self) -> Option<&'a Value> {
        self.other
    }

    /// The value as a string slice, if it is a JSON string.
    pub fn as_str(&self) -> Option<&'a str> {
        self.value.as_str()
    }

    /// The parameter, or [`Error::InvalidParameter`] when it is absent.
    pub fn require_param(&self) -> Result<&'a str> {
        self.param
            .ok_or_else(|| Error::invalid_param(self.rule, "", "parameter is required"))
    }

    /// Parses the parameter into `T`.
    ///
    /// ```rust
    /// use structval::{FieldContext, FieldPath};
    ///
    /// let path = FieldPath::root();
    /// let value = serde_json::json!("123456");
    /// let ctx = FieldContext::new(&value, "pin", &path).with_param(Some("6"));
    /// assert_eq!(ctx.param_as::<usize>().unwrap(), 6);
    /// ```
    pub fn param_as<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.require_param()?;
        raw.trim()
            .parse()
            .map_err(|e: T::Err| Error::invalid_param(self.rule, raw, e.to_string()))
    }

    /// Looks up a field of the enclosing struct by dot-separated path.
    ///
    /// `sibling("Address.City")` descends into the `Address` object.
    pub fn sibling(&self, path: &str) -> Option<&'a Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.parent?.get(first)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Target of a cross-field rule: the named sibling when a parameter is
    /// given, otherwise the second value of a two-value call.
    pub fn cross_target(&self) -> Option<&'a Value> {
        match self.param {
            Some(name) => self.sibling(name),
            None => self.other,
        }
    }
}
