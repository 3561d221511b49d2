//! The validation engine.

use crate::cast::cast_record;
use crate::config::RuleSet;
use crate::error::ErrorBag;
use crate::registry::{global_snapshot, RuleDefinition, RuleRegistry};
use crate::rules::{
    invalid_message, FromParameter, Outcome, Predicate, RequiredIfRule, RequiredRule,
    ValidationRule,
};
use crate::spec::{parse, FieldRules, ParsedRule, ParsedRules};
use crate::value::{is_empty, trim_record, Record};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Modifier that stops a field's rule loop at its first failure.
const BAIL: &str = "bail";

/// Rule names the engine handles before the rule loop.
const PRESENCE_RULES: [&str; 3] = [BAIL, "required", "required_if"];

/// Validates one input record against per-field rules.
///
/// A validator owns the input, the rules, the error bag and the validated
/// output of its latest run. Calling [`validate`](Self::validate) again
/// starts from a clean error bag.
///
/// ## Example
///
/// ```
/// use fieldcheck::{Record, Validator};
/// use serde_json::json;
///
/// let data: Record = serde_json::from_value(json!({ "username": "ab", "age": "19" })).unwrap();
///
/// let mut validator = Validator::new();
/// validator
///     .set_data(data)
///     .set_rules([("username", "required|min:5"), ("age", "required|int|between:18,60")]);
///
/// assert!(!validator.validate());
/// assert!(validator.errors().has("username"));
/// assert_eq!(validator.validated_data().get("age"), Some(&json!(19)));
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<RuleRegistry>,
    data: Record,
    rules: IndexMap<String, FieldRules>,
    messages: HashMap<String, String>,
    errors: ErrorBag,
    validated: Record,
}

impl Validator {
    /// Create a validator using a snapshot of the process-wide registry.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(global_snapshot()))
    }

    /// Create a validator using the given registry.
    pub fn with_registry(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            data: Record::new(),
            rules: IndexMap::new(),
            messages: HashMap::new(),
            errors: ErrorBag::new(),
            validated: Record::new(),
        }
    }

    /// Install the rules and messages of a rule set.
    pub fn with_rule_set(mut self, rule_set: RuleSet) -> Self {
        self.set_rules(rule_set.rules);
        self.set_messages(rule_set.messages);
        self
    }

    /// The registry rule names resolve against.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Register a rule on this validator only.
    pub fn extend(&mut self, name: impl Into<String>, definition: RuleDefinition) -> &mut Self {
        Arc::make_mut(&mut self.registry).register(name, definition);
        self
    }

    /// Install the input record. Every string is trimmed, at any depth.
    pub fn set_data(&mut self, data: Record) -> &mut Self {
        self.data = trim_record(data);
        self
    }

    /// Replace the per-field rules. Fields are validated in this order.
    pub fn set_rules<I, K, R>(&mut self, rules: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: Into<FieldRules>,
    {
        self.rules = rules
            .into_iter()
            .map(|(field, spec)| (field.into(), spec.into()))
            .collect();
        self
    }

    /// Replace the custom messages, keyed by `"field.rule"` or `"rule"`.
    pub fn set_messages<I, K, M>(&mut self, messages: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, M)>,
        K: Into<String>,
        M: Into<String>,
    {
        self.messages = messages
            .into_iter()
            .map(|(key, message)| (key.into(), message.into()))
            .collect();
        self
    }

    /// The trimmed input record.
    pub fn data(&self) -> &Record {
        &self.data
    }

    /// Fields that passed in the latest run, with casts applied.
    pub fn validated_data(&self) -> &Record {
        &self.validated
    }

    /// Errors of the latest run.
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    /// Run every field's rules. Returns `true` when no field failed.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        self.validated.clear();
        tracing::debug!(fields = self.rules.len(), "Starting validation");

        let mut run = FieldRun {
            registry: &self.registry,
            data: &self.data,
            messages: &self.messages,
            errors: &mut self.errors,
        };
        let mut casts: Vec<(&str, ParsedRules)> = Vec::new();

        for (field, field_rules) in &self.rules {
            let value = self.data.get(field).cloned().unwrap_or(Value::Null);
            match field_rules {
                FieldRules::Closure(check) => run.closure(field, &value, check),
                FieldRules::Spec(spec) => {
                    let parsed = parse(spec);
                    run.declarative(field, &value, &parsed);
                    casts.push((field.as_str(), parsed));
                }
            }
            if !run.errors.has(field) {
                self.validated.insert(field.clone(), value);
            }
        }

        cast_record(
            &mut self.validated,
            casts.iter().map(|(field, parsed)| (*field, parsed)),
        );

        tracing::debug!(
            errors = self.errors.len(),
            valid_fields = self.validated.len(),
            "Validation finished"
        );
        self.errors.is_empty()
    }

    /// Validate `data` and return the validated output, or `None` on failure.
    ///
    /// The error bag stays readable through [`errors`](Self::errors).
    pub fn validate_data<RI, RK, R, MI, MK, M>(
        &mut self,
        data: Record,
        rules: RI,
        messages: MI,
    ) -> Option<Record>
    where
        RI: IntoIterator<Item = (RK, R)>,
        RK: Into<String>,
        R: Into<FieldRules>,
        MI: IntoIterator<Item = (MK, M)>,
        MK: Into<String>,
        M: Into<String>,
    {
        self.set_data(data).set_rules(rules).set_messages(messages);
        self.validate().then(|| self.validated.clone())
    }

    /// Validate `data`, handing the error bag to `on_error` on failure.
    pub fn validate_or_else<RI, RK, R, MI, MK, M, E, F>(
        &mut self,
        data: Record,
        rules: RI,
        messages: MI,
        on_error: F,
    ) -> Result<Record, E>
    where
        RI: IntoIterator<Item = (RK, R)>,
        RK: Into<String>,
        R: Into<FieldRules>,
        MI: IntoIterator<Item = (MK, M)>,
        MK: Into<String>,
        M: Into<String>,
        F: FnOnce(&ErrorBag) -> E,
    {
        match self.validate_data(data, rules, messages) {
            Some(validated) => Ok(validated),
            None => Err(on_error(&self.errors)),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of the presence checks for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    Optional,
    Satisfied,
    /// `required` failed or `required_if` is malformed; no rule runs.
    Failed,
    /// `required_if` triggered on an empty value; rules still run unless
    /// the field bails.
    Missing,
}

/// Borrowed state for evaluating fields during one run.
struct FieldRun<'a> {
    registry: &'a RuleRegistry,
    data: &'a Record,
    messages: &'a HashMap<String, String>,
    errors: &'a mut ErrorBag,
}

impl<'a> FieldRun<'a> {
    fn closure(&mut self, field: &str, value: &Value, check: &Predicate) {
        match check(field, value, self.data, None) {
            Outcome::Pass => {}
            Outcome::Fail => self.errors.add(field, invalid_message(field)),
            Outcome::Message(message) => self.errors.add(field, message),
        }
    }

    fn declarative(&mut self, field: &str, value: &Value, parsed: &ParsedRules) {
        let bail = parsed.contains(BAIL);

        match self.requirement(field, value, parsed) {
            Requirement::Failed => return,
            Requirement::Missing if bail => return,
            Requirement::Missing => {}
            Requirement::Optional if is_empty(value) => {
                tracing::trace!(field, "Optional field is empty, skipping rules");
                return;
            }
            Requirement::Optional | Requirement::Satisfied => {}
        }

        for rule in parsed
            .iter()
            .filter(|rule| !PRESENCE_RULES.contains(&rule.name.as_str()))
        {
            if !self.run_rule(field, value, rule) && bail {
                tracing::trace!(field, rule = %rule.name, "Bailing after first failure");
                break;
            }
        }
    }

    /// `required` takes priority; `required_if` is only looked at without it.
    fn requirement(&mut self, field: &str, value: &Value, parsed: &ParsedRules) -> Requirement {
        if let Some(rule) = parsed.get("required") {
            return self.check_required(field, value, rule, &RequiredRule);
        }

        let Some(rule) = parsed.get("required_if") else {
            return Requirement::Optional;
        };
        match RequiredIfRule::from_parameter(rule.parameter.as_deref()) {
            Ok(condition) if condition.applies(self.data) => {
                match self.check_required(field, value, rule, &condition) {
                    Requirement::Failed => Requirement::Missing,
                    other => other,
                }
            }
            Ok(_) => Requirement::Optional,
            Err(error) => {
                tracing::warn!(field, rule = %rule.name, error = %error, "Invalid rule definition");
                self.errors.add(field, definition_message(&rule.name));
                Requirement::Failed
            }
        }
    }

    fn check_required(
        &mut self,
        field: &str,
        value: &Value,
        rule: &ParsedRule,
        definition: &dyn ValidationRule,
    ) -> Requirement {
        if RequiredRule::check(value) {
            return Requirement::Satisfied;
        }
        let message = self.message_for(field, rule, definition.default_message(field));
        self.errors.add(field, message);
        Requirement::Failed
    }

    /// Evaluate one rule, recording any failure. Returns whether it passed.
    fn run_rule(&mut self, field: &str, value: &Value, rule: &ParsedRule) -> bool {
        let registry = self.registry;
        let data = self.data;

        let Some(definition) = registry.resolve(&rule.name) else {
            tracing::warn!(field, rule = %rule.name, "Unknown validation rule");
            self.errors
                .add(field, format!("Unknown validation rule: {}", rule.name));
            return false;
        };

        let parameter = rule.parameter.as_deref();
        let failure = match definition {
            RuleDefinition::Rule(factory) => match factory(parameter) {
                Ok(instance) => (!instance.validate(field, value, data))
                    .then(|| instance.default_message(field)),
                Err(error) => {
                    tracing::warn!(field, rule = %rule.name, error = %error, "Invalid rule definition");
                    self.errors.add(field, definition_message(&rule.name));
                    return false;
                }
            },
            RuleDefinition::Inline(check) => match check(field, value, data, parameter) {
                Outcome::Pass => None,
                Outcome::Fail => Some(invalid_message(field)),
                Outcome::Message(message) => Some(message),
            },
        };

        tracing::trace!(field, rule = %rule.name, passed = failure.is_none(), "Evaluated rule");
        match failure {
            None => true,
            Some(default) => {
                let message = self.message_for(field, rule, default);
                self.errors.add(field, message);
                false
            }
        }
    }

    /// `"field.rule"` override, then the entry's own message, then the
    /// `"rule"` override, then the rule's default.
    fn message_for(&self, field: &str, rule: &ParsedRule, default: String) -> String {
        self.messages
            .get(&format!("{field}.{}", rule.name))
            .or(rule.message.as_ref())
            .or_else(|| self.messages.get(&rule.name))
            .cloned()
            .unwrap_or(default)
    }
}

fn definition_message(rule: &str) -> String {
    format!("Invalid rule definition for {rule}.")
}
