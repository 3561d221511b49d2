//! Type rules. The `int`, `float` and `boolean` names double as cast
//! directives for the validated output.

use super::{parameterless, ValidationRule};
use crate::value::{is_numeric, parse_int, Record};
use serde_json::Value;

/// Boolean words accepted by the `boolean` rule, compared case-insensitively.
const BOOLEAN_WORDS: [&str; 6] = ["true", "false", "1", "0", "yes", "no"];

/// The value must be a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringRule;

/// The value must be an integer or an integer literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntRule;

/// The value must be a number or a numeric string.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatRule;

/// The value must be a boolean, a boolean word, or the integer `0` or `1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanRule;

/// The value must be a sequence or a mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayRule;

parameterless!(StringRule, IntRule, FloatRule, BooleanRule, ArrayRule);

impl ValidationRule for StringRule {
    fn rule_name(&self) -> &'static str {
        "string"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        value.is_string()
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must be a string.")
    }
}

impl ValidationRule for IntRule {
    fn rule_name(&self) -> &'static str {
        "int"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        match value {
            Value::String(s) => parse_int(s).is_some(),
            Value::Number(n) => n.is_i64() || n.is_u64(),
            _ => false,
        }
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must be an integer.")
    }
}

impl ValidationRule for FloatRule {
    fn rule_name(&self) -> &'static str {
        "float"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        is_numeric(value)
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must be a number.")
    }
}

impl ValidationRule for BooleanRule {
    fn rule_name(&self) -> &'static str {
        "boolean"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        match value {
            Value::Bool(_) => true,
            Value::String(s) => {
                let lowered = s.to_lowercase();
                BOOLEAN_WORDS.contains(&lowered.as_str())
            }
            // Floats never report an i64 view, so `1.0` is rejected.
            Value::Number(n) => matches!(n.as_i64(), Some(0 | 1)),
            _ => false,
        }
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must be a boolean (true/false, 1/0).")
    }
}

impl ValidationRule for ArrayRule {
    fn rule_name(&self) -> &'static str {
        "array"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        value.is_array() || value.is_object()
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must be an array.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn passes(rule: &dyn ValidationRule, value: Value) -> bool {
        rule.validate("field", &value, &Record::new())
    }

    #[test]
    fn string_rule() {
        assert!(passes(&StringRule, json!("hello")));
        assert!(passes(&StringRule, json!("")));
        assert!(!passes(&StringRule, json!(123)));
        assert!(!passes(&StringRule, json!(true)));
        assert!(!passes(&StringRule, json!([])));
        assert!(!passes(&StringRule, Value::Null));
        assert_eq!(StringRule.default_message("name"), "The name field must be a string.");
    }

    #[test]
    fn int_rule() {
        for value in [json!(123), json!(0), json!(-45), json!("123"), json!("0"), json!("-45")] {
            assert!(passes(&IntRule, value.clone()), "{value} should pass");
        }
        for value in [json!("abc"), json!(12.34), json!("12.34"), json!(true), json!([]), Value::Null, json!("")] {
            assert!(!passes(&IntRule, value.clone()), "{value} should fail");
        }
        assert_eq!(IntRule.default_message("age"), "The age field must be an integer.");
    }

    #[test]
    fn float_rule() {
        assert!(passes(&FloatRule, json!(1.5)));
        assert!(passes(&FloatRule, json!(3)));
        assert!(passes(&FloatRule, json!("2.75")));
        assert!(!passes(&FloatRule, json!("2.7.5")));
        assert!(!passes(&FloatRule, json!("1e999")));
        assert!(!passes(&FloatRule, json!(false)));
    }

    #[test]
    fn boolean_rule() {
        for value in [
            json!(true),
            json!(false),
            json!("true"),
            json!("FALSE"),
            json!("1"),
            json!("0"),
            json!("Yes"),
            json!("no"),
            json!(1),
            json!(0),
        ] {
            assert!(passes(&BooleanRule, value.clone()), "{value} should pass");
        }
        for value in [json!("on"), json!("maybe"), json!(2), json!(1.0), json!([]), Value::Null] {
            assert!(!passes(&BooleanRule, value.clone()), "{value} should fail");
        }
    }

    #[test]
    fn array_rule() {
        assert!(passes(&ArrayRule, json!([])));
        assert!(passes(&ArrayRule, json!([1, 2])));
        assert!(passes(&ArrayRule, json!({ "a": 1 })));
        assert!(!passes(&ArrayRule, json!("[]")));
        assert!(!passes(&ArrayRule, Value::Null));
        assert_eq!(ArrayRule.default_message("tags"), "The tags field must be an array.");
    }
}
