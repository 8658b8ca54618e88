//! Property-based tests for structval.

use proptest::prelude::*;
use serde_json::{Map, Value, json};
use structval::prelude::*;

fn pin_validator() -> Validator {
    let validator = Validator::new();
    validator
        .register_rule("pin", Arity::Required, |ctx| {
            let length: usize = ctx.param_as()?;
            Ok(ctx
                .as_str()
                .is_some_and(|s| s.len() == length && s.bytes().all(|b| b.is_ascii_digit())))
        })
        .unwrap();
    validator
}

// ============================================================================
// PRESENCE: one error per empty required field
// ============================================================================

proptest! {
    #[test]
    fn every_empty_required_field_fails_once(
        names in prop::collection::btree_set("[A-Z][a-z]{0,6}", 1..8),
        absent in any::<bool>(),
    ) {
        let mut schema = Schema::new("Form");
        let mut value = Map::new();
        for name in &names {
            schema = schema.field(name.as_str(), "required");
            if !absent {
                value.insert(name.clone(), json!(""));
            }
        }

        let errors = Validator::new().validate(&Value::Object(value), &schema).unwrap();
        let fields: Vec<String> = errors.iter().map(|e| e.field.clone()).collect();
        let expected: Vec<String> = names.iter().cloned().collect();
        prop_assert_eq!(fields, expected);
        prop_assert!(errors.iter().all(|e| e.tag == "required"));
    }
}

// ============================================================================
// CROSS-FIELD: eqfield passes iff values are equal
// ============================================================================

proptest! {
    #[test]
    fn eqfield_passes_iff_equal(a in "[a-z]{0,6}", b in "[a-z]{0,6}") {
        let errors = Validator::new()
            .validate_var_with_value(&a, &b, "eqfield")
            .unwrap();
        prop_assert_eq!(errors.is_empty(), a == b);
    }

    #[test]
    fn eqfield_between_struct_fields(a in 0i64..20, b in 0i64..20) {
        let schema = Schema::new("Pair").field("A", "").field("B", "eqfield=A");
        let errors = Validator::new()
            .validate(&json!({ "A": a, "B": b }), &schema)
            .unwrap();
        prop_assert_eq!(errors.is_empty(), a == b);
    }

    #[test]
    fn eqfield_is_exact_for_large_integers(a in any::<i64>(), delta in 0i64..3) {
        let b = a.saturating_add(delta);
        let schema = Schema::new("Pair").field("A", "").field("B", "eqfield=A");
        let errors = Validator::new()
            .validate(&json!({ "A": a, "B": b }), &schema)
            .unwrap();
        prop_assert_eq!(errors.is_empty(), a == b);
    }

    #[test]
    fn max_is_exact_for_large_integers(value in any::<u64>(), limit in any::<u64>()) {
        let errors = Validator::new()
            .validate_var(&value, &format!("max={limit}"))
            .unwrap();
        prop_assert_eq!(errors.is_empty(), value <= limit);
    }
}

// ============================================================================
// BOUNDS: required,min=5,max=25 on character counts
// ============================================================================

proptest! {
    #[test]
    fn length_bounds(s in "[a-zA-Zé]{0,40}") {
        let count = s.chars().count();
        let errors = Validator::new()
            .validate_var(&s, "required,min=5,max=25")
            .unwrap();
        prop_assert_eq!(errors.is_empty(), (5..=25).contains(&count));
        prop_assert!(errors.len() <= 1);

        let expected_tag = match count {
            0 => Some("required"),
            1..=4 => Some("min"),
            26.. => Some("max"),
            _ => None,
        };
        prop_assert_eq!(errors.first().map(|e| e.tag.as_str()), expected_tag);
    }
}

// ============================================================================
// ALTERNATION: email|numeric
// ============================================================================

proptest! {
    #[test]
    fn digits_satisfy_alternation(s in "[0-9]{1,14}") {
        let errors = Validator::new().validate_var(&s, "required,email|numeric").unwrap();
        prop_assert!(errors.is_empty());
    }

    #[test]
    fn emails_satisfy_alternation(user in "[a-z]{1,8}", domain in "[a-z]{1,8}") {
        let email = format!("{user}@{domain}.com");
        let errors = Validator::new().validate_var(&email, "required,email|numeric").unwrap();
        prop_assert!(errors.is_empty());
    }

    #[test]
    fn plain_words_fail_alternation(s in "[a-z]{1,14}") {
        let errors = Validator::new().validate_var(&s, "required,email|numeric").unwrap();
        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors.errors()[0].tag.as_str(), "email|numeric");
    }
}

// ============================================================================
// DIVE: element failures add up
// ============================================================================

proptest! {
    #[test]
    fn dive_reports_each_empty_element(items in prop::collection::vec("[a-z]{0,3}", 0..12)) {
        let schema = Schema::new("List").field("Items", "dive,required");
        let errors = Validator::new()
            .validate(&json!({ "Items": items }), &schema)
            .unwrap();

        let expected: Vec<String> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_empty())
            .map(|(index, _)| format!("List.Items[{index}]"))
            .collect();
        let namespaces: Vec<String> = errors.iter().map(|e| e.namespace.clone()).collect();
        prop_assert_eq!(namespaces, expected);
    }

    #[test]
    fn map_keys_and_values_are_checked_separately(
        wallet in prop::collection::btree_map("[A-Z]{1,4}", 0i64..2000, 0..8),
    ) {
        let schema = Schema::new("Account").field("Wallet", "dive,keys,min=2,endkeys,gt=1000");
        let errors = Validator::new()
            .validate(&json!({ "Wallet": wallet }), &schema)
            .unwrap();

        let mut expected = Vec::new();
        for (key, amount) in &wallet {
            if key.chars().count() < 2 {
                expected.push((format!("Account.Wallet[{key}]"), true));
            }
            if *amount <= 1000 {
                expected.push((format!("Account.Wallet[{key}]"), false));
            }
        }
        let actual: Vec<(String, bool)> = errors
            .iter()
            .map(|e| (e.namespace.clone(), e.on_key))
            .collect();
        prop_assert_eq!(actual, expected);
    }
}

// ============================================================================
// CUSTOM RULES: pin=6
// ============================================================================

proptest! {
    #[test]
    fn pin_accepts_exactly_six_digits(s in "[0-9a]{0,8}") {
        let validator = pin_validator();
        let errors = validator.validate_var(&s, "pin=6").unwrap();
        let valid = s.len() == 6 && s.bytes().all(|b| b.is_ascii_digit());
        prop_assert_eq!(errors.is_empty(), valid);
    }
}

// ============================================================================
// IDEMPOTENCY: validate(x) == validate(x)
// ============================================================================

proptest! {
    #[test]
    fn validation_is_idempotent(
        name in "[a-z]{0,8}",
        tags in prop::collection::vec("[a-z]{0,6}", 0..5),
        scores in prop::collection::btree_map("[a-z]{1,3}", -5i64..5, 0..4),
    ) {
        let schema = Schema::new("Record")
            .field("Name", "required,min=3")
            .field("Tags", "omitempty,dive,required,alpha")
            .field("Scores", "dive,keys,min=2,endkeys,gte=0");
        let value = json!({ "Name": name, "Tags": tags, "Scores": scores });

        let validator = Validator::new();
        let first = serde_json::to_value(validator.validate(&value, &schema).unwrap()).unwrap();
        let second = serde_json::to_value(validator.validate(&value, &schema).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn struct_and_value_paths_agree(
        addresses in prop::collection::vec(("[a-z]{0,3}", "[a-z]{0,3}"), 0..5),
    ) {
        let address = Schema::new("Address")
            .field("Street", "required")
            .field("City", "required");
        let schema = Schema::new("Customer").nested("Addresses", "dive", address);
        let items: Vec<Value> = addresses
            .iter()
            .map(|(street, city)| json!({ "Street": street, "City": city }))
            .collect();

        let errors = Validator::new()
            .validate(&json!({ "Addresses": items }), &schema)
            .unwrap();

        let expected: usize = addresses
            .iter()
            .map(|(street, city)| usize::from(street.is_empty()) + usize::from(city.is_empty()))
            .sum();
        prop_assert_eq!(errors.len(), expected);
        let all_namespaced = errors.iter().all(|e| e.namespace == format!("Customer.{}", e.path));
        prop_assert!(all_namespaced);
    }
}
