//! Size rules: `min`, `max`, `size`, `between`.
//!
//! Numbers and numeric strings are measured by value, other strings by
//! character count, sequences and mappings by element count.

use super::{number_parameter, required_parameter, FromParameter, ValidationRule};
use crate::error::DefinitionError;
use crate::value::{as_number, format_number, Record};
use serde_json::Value;

/// Tolerance for comparing numeric values against `size`.
const SIZE_EPSILON: f64 = 0.00001;

/// How a value is measured.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Measure {
    Number(f64),
    Length(usize),
}

fn measure(value: &Value) -> Option<Measure> {
    if let Some(n) = as_number(value) {
        return Some(Measure::Number(n));
    }
    match value {
        Value::String(s) => Some(Measure::Length(s.chars().count())),
        Value::Array(items) => Some(Measure::Length(items.len())),
        Value::Object(map) => Some(Measure::Length(map.len())),
        _ => None,
    }
}

impl Measure {
    fn as_f64(self) -> f64 {
        match self {
            Measure::Number(n) => n,
            Measure::Length(len) => len as f64,
        }
    }
}

/// Lower bound on value, length or count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinRule {
    min: f64,
}

impl MinRule {
    pub fn new(min: f64) -> Self {
        Self { min }
    }
}

impl FromParameter for MinRule {
    fn from_parameter(parameter: Option<&str>) -> Result<Self, DefinitionError> {
        let parameter = required_parameter("min", parameter)?;
        Ok(Self::new(number_parameter("min", parameter)?))
    }
}

impl ValidationRule for MinRule {
    fn rule_name(&self) -> &'static str {
        "min"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        measure(value).is_some_and(|m| m.as_f64() >= self.min)
    }

    fn default_message(&self, field: &str) -> String {
        format!(
            "The {field} must be at least {} characters, items, or value.",
            format_number(self.min)
        )
    }
}

/// Upper bound on value, length or count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxRule {
    max: f64,
}

impl MaxRule {
    pub fn new(max: f64) -> Self {
        Self { max }
    }
}

impl FromParameter for MaxRule {
    fn from_parameter(parameter: Option<&str>) -> Result<Self, DefinitionError> {
        let parameter = required_parameter("max", parameter)?;
        Ok(Self::new(number_parameter("max", parameter)?))
    }
}

impl ValidationRule for MaxRule {
    fn rule_name(&self) -> &'static str {
        "max"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        measure(value).is_some_and(|m| m.as_f64() <= self.max)
    }

    fn default_message(&self, field: &str) -> String {
        format!(
            "The {field} may not be greater than {} characters or value.",
            format_number(self.max)
        )
    }
}

/// Exact value, length or count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRule {
    size: f64,
}

impl SizeRule {
    pub fn new(size: f64) -> Self {
        Self { size }
    }
}

impl FromParameter for SizeRule {
    fn from_parameter(parameter: Option<&str>) -> Result<Self, DefinitionError> {
        let parameter = required_parameter("size", parameter)?;
        Ok(Self::new(number_parameter("size", parameter)?))
    }
}

impl ValidationRule for SizeRule {
    fn rule_name(&self) -> &'static str {
        "size"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        match measure(value) {
            Some(Measure::Number(n)) => (n - self.size).abs() < SIZE_EPSILON,
            Some(Measure::Length(len)) => len as i64 == self.size.trunc() as i64,
            None => false,
        }
    }

    fn default_message(&self, field: &str) -> String {
        format!(
            "The {field} field must be {} characters, items, or value.",
            format_number(self.size)
        )
    }
}

/// Inclusive numeric range. Only numbers and numeric strings can pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetweenRule {
    min: f64,
    max: f64,
}

impl BetweenRule {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

impl FromParameter for BetweenRule {
    fn from_parameter(parameter: Option<&str>) -> Result<Self, DefinitionError> {
        let parameter = required_parameter("between", parameter)?;
        let (min, max) = parameter
            .split_once(',')
            .ok_or_else(|| DefinitionError::invalid("between", parameter, "`min,max`"))?;
        Ok(Self::new(
            number_parameter("between", min)?,
            number_parameter("between", max)?,
        ))
    }
}

impl ValidationRule for BetweenRule {
    fn rule_name(&self) -> &'static str {
        "between"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        as_number(value).is_some_and(|n| n >= self.min && n <= self.max)
    }

    fn default_message(&self, field: &str) -> String {
        format!(
            "The {field} field must be between {} and {}.",
            format_number(self.min),
            format_number(self.max)
        )
    }
}
