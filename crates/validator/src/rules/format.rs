//! String format rules
//!
//! Non-string values fail, except that `numeric` accepts JSON numbers and
//! `oneof` compares numbers by their text.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::registry::{Arity, RuleRegistry};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

static NUMERIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").expect("numeric pattern is valid"));

type Predicate = fn(&str) -> bool;

const STRING_RULES: [(&str, Predicate); 6] = [
    ("email", |s| EMAIL_REGEX.is_match(s)),
    ("alpha", |s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())),
    ("alphanum", |s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())),
    ("lowercase", |s| !s.chars().any(char::is_uppercase)),
    ("uppercase", |s| !s.chars().any(char::is_lowercase)),
    ("numeric", |s| NUMERIC_REGEX.is_match(s)),
];

pub(super) fn register(registry: &mut RuleRegistry) {
    for (name, predicate) in STRING_RULES {
        let numbers_pass = name == "numeric";
        registry.insert_builtin(name, Arity::None, move |ctx| {
            Ok(match ctx.value() {
                Value::String(s) => predicate(s),
                Value::Number(_) => numbers_pass,
                _ => false,
            })
        });
    }

    registry.insert_builtin("oneof", Arity::Required, |ctx| {
        let choices = ctx.require_param()?;
        let text = match ctx.value() {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return Ok(false),
        };
        Ok(choices.split_whitespace().any(|choice| choice == text))
    });
}

#[cfg(test)]
mod tests {
    use crate::rules::testing::run;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case::email("email", json!("daka@example.com"), true)]
    #[case::email_plus("email", json!("daka+test@mail.co.id"), true)]
    #[case::email_missing_at("email", json!("not-an-email"), false)]
    #[case::email_empty("email", json!(""), false)]
    #[case::email_number("email", json!(8123), false)]
    #[case::numeric_digits("numeric", json!("08123456789"), true)]
    #[case::numeric_signed_decimal("numeric", json!("-12.5"), true)]
    #[case::numeric_letters("numeric", json!("12a456"), false)]
    #[case::numeric_trailing_dot("numeric", json!("12."), false)]
    #[case::numeric_json_number("numeric", json!(42), true)]
    #[case::alpha("alpha", json!("dakasakti"), true)]
    #[case::alpha_digits("alpha", json!("dakasakti99"), false)]
    #[case::alpha_empty("alpha", json!(""), false)]
    #[case::alphanum("alphanum", json!("dakasakti99"), true)]
    #[case::lowercase("lowercase", json!("daka"), true)]
    #[case::lowercase_upper("lowercase", json!("Daka"), false)]
    #[case::lowercase_digits("lowercase", json!("daka99"), true)]
    #[case::uppercase("uppercase", json!("DAKA"), true)]
    #[case::uppercase_mixed("uppercase", json!("DAKa"), false)]
    #[case::null("lowercase", json!(null), false)]
    fn test_string_rules(#[case] rule: &str, #[case] value: Value, #[case] expected: bool) {
        assert_eq!(run(rule, None, value).unwrap(), expected);
    }

    #[rstest]
    #[case(json!("red"), true)]
    #[case(json!("purple"), false)]
    #[case(json!(2), true)]
    #[case(json!(true), false)]
    fn test_oneof(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(run("oneof", Some("red green 2"), value).unwrap(), expected);
    }
}
