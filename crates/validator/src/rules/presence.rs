use serde_json::Value;

use crate::registry::{Arity, RuleRegistry};

/// Returns `true` for the zero value of each JSON kind.
pub(crate) fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
    }
}

pub(super) fn register(registry: &mut RuleRegistry) {
    registry.insert_builtin("required", Arity::None, |ctx| Ok(!is_zero(ctx.value())));
}
