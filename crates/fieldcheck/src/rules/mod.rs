//! Validation rules.
//!
//! A rule is a named predicate over `(field, value, full record)`. Rules are
//! built from their raw parameter string right before they run, so an
//! instance carries nothing but its parsed parameter.

mod format;
mod membership;
mod presence;
mod size;
mod types;

pub use format::{AlphaNumRule, AlphaRule, DateRule, EmailRule, IpRule, JsonRule, RegexRule, UrlRule};
pub use membership::{DifferentRule, InRule, NotInRule, SameRule};
pub use presence::{RequiredIfRule, RequiredRule};
pub use size::{BetweenRule, MaxRule, MinRule, SizeRule};
pub use types::{ArrayRule, BooleanRule, FloatRule, IntRule, StringRule};

use crate::error::DefinitionError;
use crate::value::Record;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// A single named check.
///
/// ## Example
///
/// ```
/// use fieldcheck::rules::{FromParameter, ValidationRule};
/// use fieldcheck::{DefinitionError, Record};
/// use serde_json::Value;
///
/// #[derive(Debug)]
/// struct EvenRule;
///
/// impl ValidationRule for EvenRule {
///     fn rule_name(&self) -> &'static str {
///         "even"
///     }
///
///     fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
///         fieldcheck::value::as_number(value).is_some_and(|n| n % 2.0 == 0.0)
///     }
///
///     fn default_message(&self, field: &str) -> String {
///         format!("The {field} must be an even number.")
///     }
/// }
///
/// impl FromParameter for EvenRule {
///     fn from_parameter(_parameter: Option<&str>) -> Result<Self, DefinitionError> {
///         Ok(EvenRule)
///     }
/// }
/// ```
pub trait ValidationRule: Debug + Send + Sync {
    /// The name the rule is registered under.
    fn rule_name(&self) -> &'static str;

    /// Check the value. `data` is the whole (trimmed) input record.
    fn validate(&self, field: &str, value: &Value, data: &Record) -> bool;

    /// Message used when the check fails and no custom message applies.
    fn default_message(&self, field: &str) -> String;
}

/// Construction of a rule from its raw `rule:parameter` text.
pub trait FromParameter: Sized {
    /// Build the rule. `None` when the token had no `:parameter` part.
    fn from_parameter(parameter: Option<&str>) -> Result<Self, DefinitionError>;
}

/// Result of an inline predicate or a field closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The value is acceptable.
    Pass,
    /// The value is rejected; a generic message is used.
    Fail,
    /// The value is rejected with this message.
    Message(String),
}

impl Outcome {
    /// Whether the value was accepted.
    pub fn passed(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

impl From<bool> for Outcome {
    fn from(ok: bool) -> Self {
        if ok {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }
}

impl From<String> for Outcome {
    fn from(message: String) -> Self {
        Outcome::Message(message)
    }
}

impl From<&str> for Outcome {
    fn from(message: &str) -> Self {
        Outcome::Message(message.to_string())
    }
}

impl<E: Into<String>> From<Result<(), E>> for Outcome {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Outcome::Pass,
            Err(message) => Outcome::Message(message.into()),
        }
    }
}

/// A plain callable check: `(field, value, record, parameter)`.
pub type Predicate = Arc<dyn Fn(&str, &Value, &Record, Option<&str>) -> Outcome + Send + Sync>;

/// Wrap a closure returning anything convertible to [`Outcome`].
pub fn predicate<F, O>(f: F) -> Predicate
where
    F: Fn(&str, &Value, &Record, Option<&str>) -> O + Send + Sync + 'static,
    O: Into<Outcome>,
{
    Arc::new(
        move |field: &str, value: &Value, data: &Record, parameter: Option<&str>| {
            f(field, value, data, parameter).into()
        },
    )
}

/// Generic failure message for predicates that return `false`.
pub fn invalid_message(field: &str) -> String {
    format!("The {field} field is invalid.")
}

pub(crate) fn required_parameter<'a>(
    rule: &str,
    parameter: Option<&'a str>,
) -> Result<&'a str, DefinitionError> {
    match parameter {
        Some(p) if !p.is_empty() => Ok(p),
        _ => Err(DefinitionError::missing(rule)),
    }
}

pub(crate) fn number_parameter(rule: &str, parameter: &str) -> Result<f64, DefinitionError> {
    parameter
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| DefinitionError::invalid(rule, parameter, "a number"))
}

/// Rules that take no parameter ignore any that is given.
macro_rules! parameterless {
    ($($rule:ident),+ $(,)?) => {
        $(
            impl $crate::rules::FromParameter for $rule {
                fn from_parameter(
                    _parameter: Option<&str>,
                ) -> Result<Self, $crate::error::DefinitionError> {
                    Ok($rule)
                }
            }
        )+
    };
}

pub(crate) use parameterless;
