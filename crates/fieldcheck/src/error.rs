//! Error types: the per-run error bag and configuration errors.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Field-keyed collection of validation failure messages.
///
/// Fields keep the order in which their first error was recorded, and each
/// field's messages keep the order they were added. Duplicates are kept.
///
/// ## Example
///
/// ```
/// use fieldcheck::ErrorBag;
///
/// let mut errors = ErrorBag::new();
/// errors.add("email", "The email field is required.");
///
/// assert!(errors.has("email"));
/// assert_eq!(errors.first("email"), Some("The email field is required."));
/// assert_eq!(errors.to_json(), r#"{"email":["The email field is required."]}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorBag {
    fields: IndexMap<String, Vec<String>>,
}

impl ErrorBag {
    /// Create an empty error bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    /// Whether the field has at least one error.
    pub fn has(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|messages| !messages.is_empty())
    }

    /// Whether any field has an error.
    pub fn any(&self) -> bool {
        self.fields.values().any(|messages| !messages.is_empty())
    }

    /// Whether the bag holds no errors at all.
    pub fn is_empty(&self) -> bool {
        !self.any()
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// Messages for one field. Empty if the field has none.
    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The full field to messages map.
    pub fn all(&self) -> &IndexMap<String, Vec<String>> {
        &self.fields
    }

    /// First message recorded for a field.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Every message, field by field.
    pub fn flatten(&self) -> Vec<&str> {
        self.fields
            .values()
            .flat_map(|messages| messages.iter().map(String::as_str))
            .collect()
    }

    /// Names of fields with errors, in discovery order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Append every message from another bag.
    pub fn merge(&mut self, other: ErrorBag) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    /// Remove every message.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Serialize as a JSON object of field to message list.
    ///
    /// An empty bag is `{}`, never `[]`.
    pub fn to_json(&self) -> String {
        // A map of strings to string lists cannot fail to serialize.
        serde_json::to_string(&self.fields).unwrap_or_else(|_| "{}".to_string())
    }

    /// Serialize as a `serde_json::Value` object.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(field, messages)| (field.clone(), serde_json::json!(messages)))
                .collect(),
        )
    }
}

impl fmt::Display for ErrorBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {} error(s)", self.len())
    }
}

impl std::error::Error for ErrorBag {}

impl<'a> IntoIterator for &'a ErrorBag {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// A rule could not be built from its parameter.
///
/// The engine records these as field errors instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The rule needs a parameter and none was given.
    #[error("rule `{rule}` requires a parameter")]
    MissingParameter { rule: String },

    /// The parameter does not have the shape the rule expects.
    #[error("rule `{rule}` has an invalid parameter `{parameter}`: expected {expected}")]
    InvalidParameter {
        rule: String,
        parameter: String,
        expected: &'static str,
    },

    /// The `regex` rule was given a pattern that does not compile.
    #[error("invalid regex pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl DefinitionError {
    /// A required parameter was absent.
    pub fn missing(rule: impl Into<String>) -> Self {
        Self::MissingParameter { rule: rule.into() }
    }

    /// A parameter was present but malformed.
    pub fn invalid(
        rule: impl Into<String>,
        parameter: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            rule: rule.into(),
            parameter: parameter.into(),
            expected,
        }
    }
}

/// A rule set could not be loaded or checked.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rule set is not valid JSON or has the wrong shape.
    #[error("invalid rule set: {0}")]
    Json(#[from] serde_json::Error),

    /// A field names a rule the registry does not know.
    #[error("field `{field}` uses unknown rule `{rule}`")]
    UnknownRule { field: String, rule: String },

    /// A rule's parameter is malformed.
    #[error("field `{field}`: {source}")]
    Definition {
        field: String,
        #[source]
        source: DefinitionError,
    },
}
