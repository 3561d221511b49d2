//! Type coercion of validated output.
//!
//! The `int`, `boolean` and `float` rule names double as cast directives.
//! Each directive is computed from the original input value, so with
//! several directives on one field the last one declared decides the output.

use crate::spec::ParsedRules;
use crate::value::{as_number, is_empty, Record};
use serde_json::Value;

/// A type directive recognised by the caster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    Int,
    Boolean,
    Float,
}

impl CastKind {
    /// The directive a rule name stands for, if any.
    pub fn from_rule_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(CastKind::Int),
            "boolean" => Some(CastKind::Boolean),
            "float" => Some(CastKind::Float),
            _ => None,
        }
    }

    /// Coerce a value to this kind. Integer numbers keep their exact value.
    pub fn apply(self, value: &Value) -> Value {
        match self {
            CastKind::Int => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => value.clone(),
                other => Value::from(to_int(other)),
            },
            CastKind::Boolean => Value::Bool(to_bool(value)),
            CastKind::Float => Value::from(to_float(value)),
        }
    }
}

/// Strings read as `true` by the boolean cast, case-insensitively.
const TRUTHY: [&str; 4] = ["1", "true", "on", "yes"];

/// Strings read as `false` by the boolean cast, case-insensitively.
const FALSY: [&str; 5] = ["0", "false", "off", "no", ""];

/// Apply a field's cast directives to its output value in place.
///
/// Empty values are left alone so an omitted optional field stays `null`
/// rather than becoming `0` or `false`.
pub fn cast_field(rules: &ParsedRules, output: &mut Value) {
    if is_empty(output) {
        return;
    }
    let original = output.clone();
    for kind in rules.names().filter_map(CastKind::from_rule_name) {
        *output = kind.apply(&original);
    }
}

/// Apply [`cast_field`] to every field of an output record that has rules.
pub fn cast_record<'a>(
    output: &mut Record,
    rules: impl IntoIterator<Item = (&'a str, &'a ParsedRules)>,
) {
    for (field, parsed) in rules {
        if let Some(value) = output.get_mut(field) {
            cast_field(parsed, value);
        }
    }
}

fn to_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => as_number(value)
            .map(|f| f.trunc() as i64)
            .unwrap_or_else(|| leading_int(s)),
        Value::Array(items) => i64::from(!items.is_empty()),
        Value::Object(map) => i64::from(!map.is_empty()),
        Value::Null => 0,
    }
}

/// The integer formed by a string's leading sign and digits, `0` if none.
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

fn to_bool(value: &Value) -> bool {
    if let Value::String(s) = value {
        let lowered = s.trim().to_lowercase();
        if TRUTHY.contains(&lowered.as_str()) {
            return true;
        }
        if FALSY.contains(&lowered.as_str()) {
            return false;
        }
    }
    truthy(value)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn to_float(value: &Value) -> f64 {
    match value {
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => as_number(value).unwrap_or_else(|| leading_int(s) as f64),
        other => as_number(other).unwrap_or_else(|| to_int(other) as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::parse;
    use serde_json::json;

    fn cast(spec: &str, value: Value) -> Value {
        let mut output = value;
        cast_field(&parse(&spec.into()), &mut output);
        output
    }

    #[test]
    fn int_directive() {
        assert_eq!(cast("int", json!("42")), json!(42));
        assert_eq!(cast("int", json!("-7")), json!(-7));
        assert_eq!(cast("int", json!("12.9")), json!(12));
        assert_eq!(cast("int", json!("12abc")), json!(12));
        assert_eq!(cast("int", json!("abc")), json!(0));
        assert_eq!(cast("int", json!(3.7)), json!(3));
        assert_eq!(cast("int", json!(true)), json!(1));
        assert_eq!(cast("required|int|between:18,60", json!("19")), json!(19));
    }

    #[test]
    fn int_directive_keeps_integers_beyond_i64() {
        assert_eq!(cast("int", json!(u64::MAX)), json!(u64::MAX));
        assert_eq!(cast("int", json!(i64::MIN)), json!(i64::MIN));
    }

    #[test]
    fn boolean_directive_uses_token_table() {
        assert_eq!(cast("boolean", json!("yes")), json!(true));
        assert_eq!(cast("boolean", json!("ON")), json!(true));
        assert_eq!(cast("boolean", json!("1")), json!(true));
        assert_eq!(cast("boolean", json!("no")), json!(false));
        assert_eq!(cast("boolean", json!("False")), json!(false));
        assert_eq!(cast("boolean", json!("0")), json!(false));
        assert_eq!(cast("boolean", json!(1)), json!(true));
        assert_eq!(cast("boolean", json!(0)), json!(false));
        assert_eq!(cast("boolean", json!("anything")), json!(true));
    }

    #[test]
    fn float_directive() {
        assert_eq!(cast("float", json!("2.5")), json!(2.5));
        assert_eq!(cast("float", json!(3)), json!(3.0));
        assert_eq!(cast("float", json!("abc")), json!(0.0));
    }

    #[test]
    fn string_and_array_rules_never_cast() {
        assert_eq!(cast("string|min:1", json!("42")), json!("42"));
        assert_eq!(cast("array", json!(["1"])), json!(["1"]));
    }

    #[test]
    fn later_directive_wins() {
        assert_eq!(cast("int|boolean", json!("5")), json!(true));
        assert_eq!(cast("boolean|int", json!("5")), json!(5));
        assert_eq!(cast("float|int", json!("2.75")), json!(2));
    }

    #[test]
    fn empty_values_are_not_cast() {
        assert_eq!(cast("int", Value::Null), Value::Null);
        assert_eq!(cast("boolean", json!("")), json!(""));
    }

    #[test]
    fn cast_record_only_touches_present_fields() {
        let username = parse(&"required|string".into());
        let age = parse(&"int".into());
        let missing = parse(&"int".into());
        let mut output = Record::new();
        output.insert("username".to_string(), json!("ab"));
        output.insert("age".to_string(), json!("19"));

        cast_record(
            &mut output,
            [("username", &username), ("age", &age), ("missing", &missing)],
        );
        assert_eq!(output.get("username"), Some(&json!("ab")));
        assert_eq!(output.get("age"), Some(&json!(19)));
        assert!(!output.contains_key("missing"));
    }
}
