//! Per-field rule specs and their parser.
//!
//! A field is described either declaratively, as a pipe-delimited string
//! (`"required|min:5|max:20"`) or a list of tokens with optional custom
//! messages, or by a single closure that replaces the whole pipeline.

use crate::rules::{predicate, Outcome, Predicate};
use crate::value::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Declarative rules for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// `"required|int|between:18,60"`
    Pipe(String),
    /// `["required", {"rule": "min:5", "message": "Too short"}]`
    List(Vec<RuleEntry>),
}

/// One entry of a list-form [`RuleSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleEntry {
    /// A bare `rule` or `rule:parameter` token.
    Token(String),
    /// A token with a custom failure message for that rule on this field.
    WithMessage { rule: String, message: String },
}

impl RuleEntry {
    /// A token with its own failure message.
    pub fn with_message(rule: impl Into<String>, message: impl Into<String>) -> Self {
        RuleEntry::WithMessage {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

impl From<&str> for RuleEntry {
    fn from(token: &str) -> Self {
        RuleEntry::Token(token.to_string())
    }
}

impl From<String> for RuleEntry {
    fn from(token: String) -> Self {
        RuleEntry::Token(token)
    }
}

impl From<&str> for RuleSpec {
    fn from(spec: &str) -> Self {
        RuleSpec::Pipe(spec.to_string())
    }
}

impl From<String> for RuleSpec {
    fn from(spec: String) -> Self {
        RuleSpec::Pipe(spec)
    }
}

impl<E: Into<RuleEntry>> From<Vec<E>> for RuleSpec {
    fn from(entries: Vec<E>) -> Self {
        RuleSpec::List(entries.into_iter().map(Into::into).collect())
    }
}

/// Everything a field can be validated with.
#[derive(Clone)]
pub enum FieldRules {
    /// Declarative rules run through the rule pipeline.
    Spec(RuleSpec),
    /// A closure called as `(field, value, record, None)`. No other rule runs
    /// for the field and its value is never cast.
    Closure(Predicate),
}

impl FieldRules {
    /// Validate a field with a single closure.
    pub fn closure<F, O>(f: F) -> Self
    where
        F: Fn(&str, &Value, &Record, Option<&str>) -> O + Send + Sync + 'static,
        O: Into<Outcome>,
    {
        FieldRules::Closure(predicate(f))
    }

    /// The declarative spec, if any.
    pub fn as_spec(&self) -> Option<&RuleSpec> {
        match self {
            FieldRules::Spec(spec) => Some(spec),
            FieldRules::Closure(_) => None,
        }
    }
}

impl fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRules::Spec(spec) => f.debug_tuple("Spec").field(spec).finish(),
            FieldRules::Closure(_) => f.write_str("Closure"),
        }
    }
}

impl From<RuleSpec> for FieldRules {
    fn from(spec: RuleSpec) -> Self {
        FieldRules::Spec(spec)
    }
}

impl From<&str> for FieldRules {
    fn from(spec: &str) -> Self {
        FieldRules::Spec(spec.into())
    }
}

impl From<String> for FieldRules {
    fn from(spec: String) -> Self {
        FieldRules::Spec(spec.into())
    }
}

impl<E: Into<RuleEntry>> From<Vec<E>> for FieldRules {
    fn from(entries: Vec<E>) -> Self {
        FieldRules::Spec(entries.into())
    }
}

/// One parsed rule of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    /// Rule name, the part before the first `:`
    pub name: String,
    /// Everything after the first `:`, if there was one
    pub parameter: Option<String>,
    /// Custom message attached in list form
    pub message: Option<String>,
}

impl ParsedRule {
    fn from_token(token: &str, message: Option<String>) -> Self {
        let (name, parameter) = match token.split_once(':') {
            Some((name, parameter)) => (name, Some(parameter.to_string())),
            None => (token, None),
        };
        Self {
            name: name.to_string(),
            parameter,
            message,
        }
    }
}

/// Rules of one field keyed by name, in declaration order.
///
/// A name declared twice keeps its first position but takes the later
/// parameter and message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRules {
    rules: IndexMap<String, ParsedRule>,
}

impl ParsedRules {
    /// Rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParsedRule> {
        self.rules.values()
    }

    pub fn get(&self, name: &str) -> Option<&ParsedRule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Rule names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn insert(&mut self, rule: ParsedRule) {
        self.rules.insert(rule.name.clone(), rule);
    }
}

/// Parse a spec into its ordered rules.
///
/// Tokens are trimmed; blank tokens (as in `"required||int"`) are skipped.
pub fn parse(spec: &RuleSpec) -> ParsedRules {
    let mut parsed = ParsedRules::default();
    match spec {
        RuleSpec::Pipe(text) => {
            for token in text.split('|') {
                push_token(&mut parsed, token, None);
            }
        }
        RuleSpec::List(entries) => {
            for entry in entries {
                match entry {
                    RuleEntry::Token(token) => push_token(&mut parsed, token, None),
                    RuleEntry::WithMessage { rule, message } => {
                        push_token(&mut parsed, rule, Some(message.clone()))
                    }
                }
            }
        }
    }
    parsed
}

fn push_token(parsed: &mut ParsedRules, token: &str, message: Option<String>) {
    let token = token.trim();
    if token.is_empty() {
        return;
    }
    parsed.insert(ParsedRule::from_token(token, message));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(parsed: &ParsedRules) -> Vec<(&str, Option<&str>)> {
        parsed
            .iter()
            .map(|rule| (rule.name.as_str(), rule.parameter.as_deref()))
            .collect()
    }

    #[test]
    fn pipe_string_keeps_order() {
        let parsed = parse(&"required|min:5|max:20".into());
        assert_eq!(
            summary(&parsed),
            vec![("required", None), ("min", Some("5")), ("max", Some("20"))]
        );
    }

    #[test]
    fn parameter_is_everything_after_first_colon() {
        let parsed = parse(&r"regex:/^\d{2}:\d{2}$/|between:18,60".into());
        assert_eq!(parsed.get("regex").unwrap().parameter.as_deref(), Some(r"/^\d{2}:\d{2}$/"));
        assert_eq!(parsed.get("between").unwrap().parameter.as_deref(), Some("18,60"));
    }

    #[test]
    fn list_form_with_messages() {
        let spec = RuleSpec::List(vec![
            RuleEntry::from("required"),
            RuleEntry::with_message("min:5", "Too short"),
        ]);
        let parsed = parse(&spec);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("required").unwrap().message, None);
        let min = parsed.get("min").unwrap();
        assert_eq!(min.parameter.as_deref(), Some("5"));
        assert_eq!(min.message.as_deref(), Some("Too short"));
    }

    #[test]
    fn repeated_rule_takes_last_parameter_at_first_position() {
        let parsed = parse(&"min:3|string|min:8".into());
        assert_eq!(summary(&parsed), vec![("min", Some("8")), ("string", None)]);
    }

    #[test]
    fn blank_tokens_are_skipped() {
        let parsed = parse(&" required || int |".into());
        assert_eq!(parsed.names().collect::<Vec<_>>(), vec!["required", "int"]);
        assert!(parse(&"".into()).is_empty());
    }

    #[test]
    fn deserializes_both_shapes() {
        let pipe: RuleSpec = serde_json::from_str(r#""required|email""#).unwrap();
        assert_eq!(pipe, RuleSpec::from("required|email"));

        let list: RuleSpec =
            serde_json::from_str(r#"["required", {"rule": "min:5", "message": "Too short"}]"#)
                .unwrap();
        assert_eq!(
            list,
            RuleSpec::List(vec![
                RuleEntry::Token("required".to_string()),
                RuleEntry::with_message("min:5", "Too short"),
            ])
        );
    }

    #[test]
    fn field_rules_conversions() {
        assert!(FieldRules::from("required").as_spec().is_some());
        assert!(FieldRules::from(vec!["required", "int"]).as_spec().is_some());
        assert!(FieldRules::closure(|_, _, _, _| true).as_spec().is_none());
    }
}
