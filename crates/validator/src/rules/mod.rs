//! Built-in rules
//!
//! | Group | Rules |
//! |---|---|
//! | presence | `required` |
//! | comparison | `min`, `max`, `len`, `eq`, `ne`, `gt`, `gte`, `lt`, `lte` |
//! | cross-field | `eqfield`, `nefield`, `gtfield`, `gtefield`, `ltfield`, `ltefield` |
//! | format | `email`, `numeric`, `alpha`, `alphanum`, `lowercase`, `uppercase`, `oneof` |
//!
//! Size rules measure strings in characters, arrays and objects by element
//! count and numbers by value; integers compare exactly. `null` fails every
//! value-based rule except `eqfield` against another `null`.

mod compare;
mod cross_field;
mod format;
mod presence;

use std::cmp::Ordering;
use std::num::ParseFloatError;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::error::{Error, Result};
use crate::foundation::FieldContext;
use crate::registry::RuleRegistry;

pub(crate) use presence::is_zero;

pub(crate) fn register_builtins(registry: &mut RuleRegistry) {
    presence::register(registry);
    compare::register(registry);
    cross_field::register(registry);
    format::register(registry);
}

/// JSON kind of a value, for error messages.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A measured size or numeric value.
///
/// Integers stay exact; a comparison falls back to `f64` only when one side
/// is a float.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Measure {
    Int(i128),
    Float(f64),
}

impl Measure {
    fn of_number(n: &Number) -> Option<Self> {
        if let Some(i) = n.as_i64() {
            Some(Self::Int(i.into()))
        } else if let Some(u) = n.as_u64() {
            Some(Self::Int(u.into()))
        } else {
            n.as_f64().map(Self::Float)
        }
    }

    fn count(len: usize) -> Self {
        Self::Int(len as i128)
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

impl PartialEq for Measure {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Measure {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl FromStr for Measure {
    type Err = ParseFloatError;

    fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
        match text.parse::<i128>() {
            Ok(i) => Ok(Self::Int(i)),
            Err(_) => text.parse::<f64>().map(Self::Float),
        }
    }
}

/// Numeric equality, exact for integers, so `1` equals `1.0`.
pub(crate) fn numbers_equal(a: &Number, b: &Number) -> bool {
    match (Measure::of_number(a), Measure::of_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Size of `value` for size rules. `None` for null.
pub(crate) fn measure_value(rule: &str, value: &Value) -> Result<Option<Measure>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(Measure::of_number(n)),
        Value::String(s) => Ok(Some(Measure::count(s.chars().count()))),
        Value::Array(items) => Ok(Some(Measure::count(items.len()))),
        Value::Object(entries) => Ok(Some(Measure::count(entries.len()))),
        Value::Bool(_) => Err(Error::UnsupportedType {
            rule: rule.to_owned(),
            kind: kind_name(value),
        }),
    }
}

pub(crate) fn measure(ctx: &FieldContext<'_>) -> Result<Option<Measure>> {
    measure_value(ctx.rule(), ctx.value())
}
