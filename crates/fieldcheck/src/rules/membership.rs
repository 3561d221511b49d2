//! Membership and comparison rules: `in`, `not_in`, `same`, `different`.
//!
//! `in` and `not_in` compare numeric values loosely and everything else
//! strictly. `same` and `different` always compare strictly.

use super::{required_parameter, FromParameter, ValidationRule};
use crate::error::DefinitionError;
use crate::value::{is_numeric_str, loose_or_strict_equals, Comparison, Record};
use serde_json::Value;

/// Parse a comma-separated list, turning numeric entries into numbers.
fn parse_options(parameter: &str) -> Vec<Value> {
    parameter
        .split(',')
        .map(|option| {
            if is_numeric_str(option) {
                let parsed = if option.contains('.') {
                    option.trim().parse::<f64>().ok().map(Value::from)
                } else {
                    option.trim().parse::<i64>().ok().map(Value::from)
                };
                parsed.unwrap_or_else(|| Value::from(option))
            } else {
                Value::from(option)
            }
        })
        .collect()
}

fn is_listed(options: &[Value], value: &Value) -> bool {
    options
        .iter()
        .any(|option| loose_or_strict_equals(value, option, Comparison::Loose))
}

/// The value must be one of the listed options.
#[derive(Debug, Clone, PartialEq)]
pub struct InRule {
    options: Vec<Value>,
}

impl InRule {
    pub fn new(options: Vec<Value>) -> Self {
        Self { options }
    }
}

impl FromParameter for InRule {
    fn from_parameter(parameter: Option<&str>) -> Result<Self, DefinitionError> {
        Ok(Self::new(parse_options(required_parameter("in", parameter)?)))
    }
}

impl ValidationRule for InRule {
    fn rule_name(&self) -> &'static str {
        "in"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        is_listed(&self.options, value)
    }

    fn default_message(&self, field: &str) -> String {
        format!("The selected {field} is invalid.")
    }
}

/// The value must not be one of the listed options.
#[derive(Debug, Clone, PartialEq)]
pub struct NotInRule {
    options: Vec<Value>,
}

impl NotInRule {
    pub fn new(options: Vec<Value>) -> Self {
        Self { options }
    }
}

impl FromParameter for NotInRule {
    fn from_parameter(parameter: Option<&str>) -> Result<Self, DefinitionError> {
        Ok(Self::new(parse_options(required_parameter(
            "not_in", parameter,
        )?)))
    }
}

impl ValidationRule for NotInRule {
    fn rule_name(&self) -> &'static str {
        "not_in"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        !is_listed(&self.options, value)
    }

    fn default_message(&self, field: &str) -> String {
        format!("The selected {field} is invalid.")
    }
}

/// The value must equal another field's value exactly.
///
/// Fails when the other field is absent from the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SameRule {
    other_field: String,
}

impl SameRule {
    pub fn new(other_field: impl Into<String>) -> Self {
        Self {
            other_field: other_field.into(),
        }
    }
}

impl FromParameter for SameRule {
    fn from_parameter(parameter: Option<&str>) -> Result<Self, DefinitionError> {
        Ok(Self::new(required_parameter("same", parameter)?))
    }
}

impl ValidationRule for SameRule {
    fn rule_name(&self) -> &'static str {
        "same"
    }

    fn validate(&self, _field: &str, value: &Value, data: &Record) -> bool {
        data.get(&self.other_field)
            .is_some_and(|other| loose_or_strict_equals(value, other, Comparison::Strict))
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must match {}.", self.other_field)
    }
}

/// The value must differ from another field's value.
///
/// Passes when the other field is absent from the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferentRule {
    other_field: String,
}

impl DifferentRule {
    pub fn new(other_field: impl Into<String>) -> Self {
        Self {
            other_field: other_field.into(),
        }
    }
}

impl FromParameter for DifferentRule {
    fn from_parameter(parameter: Option<&str>) -> Result<Self, DefinitionError> {
        Ok(Self::new(required_parameter("different", parameter)?))
    }
}

impl ValidationRule for DifferentRule {
    fn rule_name(&self) -> &'static str {
        "different"
    }

    fn validate(&self, _field: &str, value: &Value, data: &Record) -> bool {
        match data.get(&self.other_field) {
            Some(other) => !loose_or_strict_equals(value, other, Comparison::Strict),
            None => true,
        }
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must be different from {}.", self.other_field)
    }
}
