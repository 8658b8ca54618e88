//! Comparisons against another field of the enclosing struct
//!
//! The parameter names the sibling by dot-path (`eqfield=Password`,
//! `gtfield=Range.Start`). Without a parameter the rule compares against the
//! second value of a two-value call. A missing target fails every rule
//! except `nefield`.

use serde_json::Value;

use super::{Measure, measure_value, numbers_equal};
use crate::error::Result;
use crate::foundation::FieldContext;
use crate::registry::{Arity, RuleRegistry};

type Op = fn(Measure, Measure) -> bool;

const ORDERINGS: [(&str, Op); 4] = [
    ("gtfield", |a, b| a > b),
    ("gtefield", |a, b| a >= b),
    ("ltfield", |a, b| a < b),
    ("ltefield", |a, b| a <= b),
];

pub(super) fn register(registry: &mut RuleRegistry) {
    registry.insert_builtin("eqfield", Arity::Optional, |ctx| {
        Ok(ctx
            .cross_target()
            .is_some_and(|target| same(ctx.value(), target)))
    });
    registry.insert_builtin("nefield", Arity::Optional, |ctx| {
        Ok(ctx
            .cross_target()
            .is_none_or(|target| !same(ctx.value(), target)))
    });
    for (name, op) in ORDERINGS {
        registry.insert_builtin(name, Arity::Optional, move |ctx| ordered(ctx, op));
    }
}

/// Equality where numbers compare by value, so `1` equals `1.0`.
fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        _ => a == b,
    }
}

fn ordered(ctx: &FieldContext<'_>, op: Op) -> Result<bool> {
    let Some(target) = ctx.cross_target() else {
        return Ok(false);
    };
    let lhs = measure_value(ctx.rule(), ctx.value())?;
    let rhs = measure_value(ctx.rule(), target)?;
    Ok(matches!((lhs, rhs), (Some(a), Some(b)) if op(a, b)))
}
