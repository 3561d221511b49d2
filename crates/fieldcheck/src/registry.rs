//! Rule registry: maps rule names to rule constructors or inline predicates.
//!
//! Every [`Validator`](crate::Validator) owns an `Arc<RuleRegistry>`. The
//! process-wide registry behind [`extend`] is only consulted when a
//! validator is created with [`Validator::new`](crate::Validator::new), which
//! takes a snapshot of it.

use crate::error::DefinitionError;
use crate::rules::{
    predicate, AlphaNumRule, AlphaRule, ArrayRule, BetweenRule, BooleanRule, DateRule,
    DifferentRule, EmailRule, FloatRule, FromParameter, InRule, IntRule, IpRule, JsonRule,
    MaxRule, MinRule, NotInRule, Outcome, Predicate, RegexRule, RequiredIfRule, RequiredRule,
    SameRule, SizeRule, StringRule, UrlRule, ValidationRule,
};
use crate::value::Record;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Builds a rule from its raw parameter.
pub type RuleFactory =
    Arc<dyn Fn(Option<&str>) -> Result<Box<dyn ValidationRule>, DefinitionError> + Send + Sync>;

/// What a rule name resolves to.
#[derive(Clone)]
pub enum RuleDefinition {
    /// A rule type, constructed from the parameter on every evaluation.
    Rule(RuleFactory),
    /// A plain callable receiving the parameter at call time.
    Inline(Predicate),
}

impl RuleDefinition {
    /// Definition for a rule type.
    pub fn rule<R>() -> Self
    where
        R: ValidationRule + FromParameter + 'static,
    {
        RuleDefinition::Rule(Arc::new(|parameter: Option<&str>| {
            R::from_parameter(parameter).map(|rule| Box::new(rule) as Box<dyn ValidationRule>)
        }))
    }

    /// Definition for an inline callable.
    pub fn inline<F, O>(f: F) -> Self
    where
        F: Fn(&str, &Value, &Record, Option<&str>) -> O + Send + Sync + 'static,
        O: Into<Outcome>,
    {
        RuleDefinition::Inline(predicate(f))
    }
}

impl fmt::Debug for RuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleDefinition::Rule(_) => f.write_str("RuleDefinition::Rule"),
            RuleDefinition::Inline(_) => f.write_str("RuleDefinition::Inline"),
        }
    }
}

/// A name to [`RuleDefinition`] table.
///
/// Registering a name that already exists replaces the earlier binding,
/// built-ins included.
///
/// ## Example
///
/// ```
/// use fieldcheck::{RuleDefinition, RuleRegistry};
///
/// let mut registry = RuleRegistry::default();
/// registry.register_fn("uppercase", |_field, value: &serde_json::Value, _data, _param| {
///     value.as_str().is_some_and(|s| s.chars().all(|c| !c.is_lowercase()))
/// });
///
/// assert!(registry.contains("uppercase"));
/// assert!(registry.contains("required"));
/// ```
#[derive(Clone)]
pub struct RuleRegistry {
    definitions: HashMap<String, RuleDefinition>,
}

impl RuleRegistry {
    /// A registry with no rules at all.
    pub fn empty() -> Self {
        Self {
            definitions: HashMap::new(),
        }
    }

    /// A registry seeded with the built-in catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register_rule::<RequiredRule>("required");
        registry.register_rule::<RequiredIfRule>("required_if");
        registry.register_rule::<StringRule>("string");
        registry.register_rule::<IntRule>("int");
        registry.register_rule::<FloatRule>("float");
        registry.register_rule::<BooleanRule>("boolean");
        registry.register_rule::<ArrayRule>("array");
        registry.register_rule::<MinRule>("min");
        registry.register_rule::<MaxRule>("max");
        registry.register_rule::<SizeRule>("size");
        registry.register_rule::<BetweenRule>("between");
        registry.register_rule::<InRule>("in");
        registry.register_rule::<NotInRule>("not_in");
        registry.register_rule::<EmailRule>("email");
        registry.register_rule::<UrlRule>("url");
        registry.register_rule::<IpRule>("ip");
        registry.register_rule::<JsonRule>("json");
        registry.register_rule::<DateRule>("date");
        registry.register_rule::<RegexRule>("regex");
        registry.register_rule::<AlphaRule>("alpha");
        registry.register_rule::<AlphaNumRule>("alpha_num");
        registry.register_rule::<SameRule>("same");
        registry.register_rule::<DifferentRule>("different");
        registry
    }

    /// Bind a name, replacing any earlier binding.
    pub fn register(&mut self, name: impl Into<String>, definition: RuleDefinition) {
        let name = name.into();
        if self.definitions.insert(name.clone(), definition).is_some() {
            tracing::debug!(rule = %name, "Replaced existing rule definition");
        }
    }

    /// Bind a name to a rule type.
    pub fn register_rule<R>(&mut self, name: impl Into<String>)
    where
        R: ValidationRule + FromParameter + 'static,
    {
        self.register(name, RuleDefinition::rule::<R>());
    }

    /// Bind a name to an inline callable.
    pub fn register_fn<F, O>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&str, &Value, &Record, Option<&str>) -> O + Send + Sync + 'static,
        O: Into<Outcome>,
    {
        self.register(name, RuleDefinition::inline(f));
    }

    /// Look up a name.
    pub fn resolve(&self, name: &str) -> Option<&RuleDefinition> {
        self.definitions.get(name)
    }

    /// Whether a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Every bound name, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of bound names.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}

static GLOBAL_REGISTRY: OnceLock<RwLock<RuleRegistry>> = OnceLock::new();

fn global() -> &'static RwLock<RuleRegistry> {
    GLOBAL_REGISTRY.get_or_init(|| RwLock::new(RuleRegistry::default()))
}

/// Register a rule in the process-wide registry.
///
/// Validators created afterwards with [`Validator::new`](crate::Validator::new)
/// see the new binding. Register custom rules at startup, before validators
/// are created on other threads.
pub fn extend(name: impl Into<String>, definition: RuleDefinition) {
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, definition);
}

/// A copy of the process-wide registry as it stands now.
pub fn global_snapshot() -> RuleRegistry {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}
