//! Property tests for engine invariants.

use fieldcheck::prelude::*;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn isolated() -> Validator {
    Validator::with_registry(Arc::new(RuleRegistry::default()))
}

fn single(field: &str, value: Value, rules: &str) -> Validator {
    let mut data = Record::new();
    data.insert(field.to_string(), value);
    let mut v = isolated();
    v.set_data(data).set_rules([(field, rules)]);
    v.validate();
    v
}

fn empty_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        "[ \t\n]{0,5}".prop_map(Value::String),
        Just(json!([])),
        Just(json!({})),
    ]
}

const FORMAT_RULES: [&str; 8] = [
    "email",
    "url|ip",
    "int|between:1,2",
    "alpha|min:10",
    "date",
    "json|regex:/^x$/",
    "same:other",
    "boolean|size:3",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_optional_empty_fields_pass_unchanged(
        value in empty_value(),
        rule_index in 0usize..FORMAT_RULES.len(),
    ) {
        let v = single("field", value.clone(), FORMAT_RULES[rule_index]);
        prop_assert!(v.errors().is_empty());

        let expected = match value {
            Value::String(_) => json!(""),
            other => other,
        };
        prop_assert_eq!(v.validated_data().get("field"), Some(&expected));
    }

    #[test]
    fn prop_required_empty_yields_one_error(
        value in empty_value(),
        rule_index in 0usize..FORMAT_RULES.len(),
    ) {
        let rules = format!("required|{}", FORMAT_RULES[rule_index]);
        let v = single("field", value, &rules);
        prop_assert_eq!(v.errors().get("field"), ["The field field is required."]);
        prop_assert!(!v.validated_data().contains_key("field"));
    }

    #[test]
    fn prop_between_is_inclusive(n in -1000i64..1000, lo in -500i64..0, hi in 0i64..500) {
        let v = single("n", json!(n), &format!("between:{lo},{hi}"));
        prop_assert_eq!(v.errors().is_empty(), lo <= n && n <= hi);
    }

    #[test]
    fn prop_same_and_different_are_complementary_when_other_present(
        a in "[a-z0-9]{0,6}",
        b in "[a-z0-9]{0,6}",
    ) {
        prop_assume!(!a.is_empty() && !b.is_empty());
        let data: Record = serde_json::from_value(json!({ "a": a, "b": b })).unwrap();

        let mut same = isolated();
        same.set_data(data.clone()).set_rules([("b", "same:a")]);
        let mut different = isolated();
        different.set_data(data).set_rules([("b", "different:a")]);

        prop_assert_ne!(same.validate(), different.validate());
    }

    #[test]
    fn prop_output_admission_matches_errors(
        values in proptest::collection::vec(prop_oneof![
            Just(Value::Null),
            "[a-z]{0,8}".prop_map(Value::String),
            (-50i64..50).prop_map(Value::from),
        ], 1..6),
    ) {
        let mut data = Record::new();
        let mut rules = Vec::new();
        for (i, value) in values.into_iter().enumerate() {
            let field = format!("f{i}");
            data.insert(field.clone(), value);
            let spec = if i % 2 == 0 { "required|alpha|min:3" } else { "int|between:0,10" };
            rules.push((field, spec));
        }

        let mut v = isolated();
        v.set_data(data).set_rules(rules.clone());
        let passed = v.validate();

        prop_assert_eq!(passed, v.errors().is_empty());
        for (field, _) in &rules {
            prop_assert_ne!(v.errors().has(field), v.validated_data().contains_key(field));
        }
    }

    #[test]
    fn prop_error_bag_preserves_insertion_order(
        entries in proptest::collection::vec(("[a-c]", "[a-z]{1,4}"), 0..20),
    ) {
        let mut errors = ErrorBag::new();
        for (field, message) in &entries {
            errors.add(field.as_str(), message.as_str());
        }

        prop_assert_eq!(errors.len(), entries.len());
        prop_assert_eq!(errors.is_empty(), entries.is_empty());

        for field in ["a", "b", "c"] {
            let expected: Vec<&str> = entries
                .iter()
                .filter(|(f, _)| f == field)
                .map(|(_, m)| m.as_str())
                .collect();
            prop_assert_eq!(errors.get(field), expected.as_slice());
        }

        let round_trip: ErrorBag = serde_json::from_str(&errors.to_json()).unwrap();
        prop_assert_eq!(round_trip, errors);
    }
}
