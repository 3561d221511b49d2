//! Rule sets loaded from JSON.
//!
//! ```json
//! {
//!   "rules": {
//!     "username": "required|alpha_num|min:5",
//!     "email": ["required", { "rule": "email", "message": "That is not an email." }]
//!   },
//!   "messages": { "required": "This field cannot be blank." }
//! }
//! ```

use crate::error::ConfigError;
use crate::registry::{RuleDefinition, RuleRegistry};
use crate::spec::{parse, RuleSpec};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Names the engine handles itself and that need no registry entry.
const ENGINE_RULES: [&str; 1] = ["bail"];

/// Rules and messages for one kind of input, in configuration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Field to rule spec, in validation order
    pub rules: IndexMap<String, RuleSpec>,
    /// Custom messages keyed by `"field.rule"` or `"rule"`
    #[serde(default)]
    pub messages: IndexMap<String, String>,
}

impl RuleSet {
    /// Parse a rule set from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a rule set from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Check every rule against a registry ahead of time.
    ///
    /// Validation itself never fails on a bad rule; it records a field error
    /// instead. This surfaces the same problems at load time. Only rule
    /// types can be checked for parameter errors; inline rules receive their
    /// parameter at call time.
    pub fn check(&self, registry: &RuleRegistry) -> Result<(), ConfigError> {
        for (field, spec) in &self.rules {
            for rule in parse(spec).iter() {
                if ENGINE_RULES.contains(&rule.name.as_str()) {
                    continue;
                }
                match registry.resolve(&rule.name) {
                    None => {
                        return Err(ConfigError::UnknownRule {
                            field: field.clone(),
                            rule: rule.name.clone(),
                        })
                    }
                    Some(RuleDefinition::Rule(factory)) => {
                        factory(rule.parameter.as_deref()).map_err(|source| {
                            ConfigError::Definition {
                                field: field.clone(),
                                source,
                            }
                        })?;
                    }
                    Some(RuleDefinition::Inline(_)) => {}
                }
            }
        }
        Ok(())
    }
}
