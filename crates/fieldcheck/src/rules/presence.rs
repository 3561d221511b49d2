//! Presence rules: `required` and `required_if`.

use super::{parameterless, required_parameter, FromParameter, ValidationRule};
use crate::error::DefinitionError;
use crate::value::{stringify, trim_padding, Record};
use serde_json::Value;

/// The field must be present and non-blank.
///
/// Strings must have non-whitespace content, sequences and mappings must be
/// non-empty, anything else must be non-null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequiredRule;

parameterless!(RequiredRule);

impl RequiredRule {
    /// The required check on its own.
    pub fn check(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::String(s) => !trim_padding(s).is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            _ => true,
        }
    }
}

impl ValidationRule for RequiredRule {
    fn rule_name(&self) -> &'static str {
        "required"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        Self::check(value)
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field is required.")
    }
}

/// The field is required when another field has a given value.
///
/// Parameter: `other_field,expected_value`. The other field's value is
/// compared by its string form; a missing or null other field never
/// triggers the requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredIfRule {
    other_field: String,
    expected: String,
}

impl RequiredIfRule {
    /// Create a rule requiring the field when `other_field` equals `expected`.
    pub fn new(other_field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            other_field: other_field.into(),
            expected: expected.into(),
        }
    }

    /// The field this rule looks at.
    pub fn other_field(&self) -> &str {
        &self.other_field
    }

    /// Whether the condition holds for this record, making the field required.
    pub fn applies(&self, data: &Record) -> bool {
        data.get(&self.other_field)
            .and_then(stringify)
            .is_some_and(|actual| actual == self.expected)
    }
}

impl FromParameter for RequiredIfRule {
    fn from_parameter(parameter: Option<&str>) -> Result<Self, DefinitionError> {
        let parameter = required_parameter("required_if", parameter)?;
        match parameter.split_once(',') {
            Some((other, expected)) if !other.is_empty() => Ok(Self::new(other, expected)),
            _ => Err(DefinitionError::invalid(
                "required_if",
                parameter,
                "`other_field,value`",
            )),
        }
    }
}

impl ValidationRule for RequiredIfRule {
    fn rule_name(&self) -> &'static str {
        "required_if"
    }

    fn validate(&self, _field: &str, value: &Value, data: &Record) -> bool {
        !self.applies(data) || RequiredRule::check(value)
    }

    fn default_message(&self, field: &str) -> String {
        format!(
            "The {field} field is required when {} is {}.",
            self.other_field, self.expected
        )
    }
}
