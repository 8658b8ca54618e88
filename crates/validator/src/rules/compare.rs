//! Size and value comparisons against a literal parameter

use serde_json::Value;

use super::{Measure, measure};
use crate::error::{Error, Result};
use crate::foundation::FieldContext;
use crate::registry::{Arity, RuleRegistry};

type Op = fn(Measure, Measure) -> bool;

const BOUNDS: [(&str, Op); 7] = [
    ("min", |m, p| m >= p),
    ("max", |m, p| m <= p),
    ("len", |m, p| m == p),
    ("gt", |m, p| m > p),
    ("gte", |m, p| m >= p),
    ("lt", |m, p| m < p),
    ("lte", |m, p| m <= p),
];

pub(super) fn register(registry: &mut RuleRegistry) {
    for (name, op) in BOUNDS {
        registry.insert_builtin(name, Arity::Required, move |ctx| bound(ctx, op));
    }
    registry.insert_builtin("eq", Arity::Required, |ctx| {
        Ok(equals(ctx)?.unwrap_or(false))
    });
    registry.insert_builtin("ne", Arity::Required, |ctx| {
        Ok(equals(ctx)?.is_some_and(|eq| !eq))
    });
}

fn bound(ctx: &FieldContext<'_>, op: Op) -> Result<bool> {
    let limit: Measure = ctx.param_as()?;
    Ok(measure(ctx)?.is_some_and(|m| op(m, limit)))
}

/// Compares the value with the parameter. `None` for null.
fn equals(ctx: &FieldContext<'_>) -> Result<Option<bool>> {
    let param = ctx.require_param()?;
    let eq = match ctx.value() {
        Value::Null => return Ok(None),
        Value::String(s) => s == param,
        Value::Bool(b) => {
            let expected: bool = param
                .parse()
                .map_err(|_| Error::invalid_param(ctx.rule(), param, "expected true or false"))?;
            *b == expected
        }
        Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            let expected: Measure = ctx.param_as()?;
            measure(ctx)?.is_some_and(|m| m == expected)
        }
    };
    Ok(Some(eq))
}
