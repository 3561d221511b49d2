//! # fieldcheck
//!
//! Field-level validation for request input. Give it a flat record of field
//! values and a rule spec per field; it reports which fields failed, with
//! messages, and hands back the fields that passed with their types cast.
//!
//! ## Example
//!
//! ```rust
//! use fieldcheck::prelude::*;
//! use serde_json::json;
//!
//! let data: Record = serde_json::from_value(json!({
//!     "username": "  ab ",
//!     "age": "19",
//!     "newsletter": "yes"
//! }))
//! .unwrap();
//!
//! let mut validator = Validator::new();
//! validator.set_data(data).set_rules([
//!     ("username", "required|alpha_num|min:5"),
//!     ("age", "required|int|between:18,60"),
//!     ("newsletter", "boolean"),
//! ]);
//!
//! assert!(!validator.validate());
//! assert_eq!(
//!     validator.errors().first("username"),
//!     Some("The username must be at least 5 characters, items, or value.")
//! );
//! assert_eq!(validator.validated_data().get("age"), Some(&json!(19)));
//! assert_eq!(validator.validated_data().get("newsletter"), Some(&json!(true)));
//! ```
//!
//! ## Rule Specs
//!
//! - Pipe form: `"required|min:5|max:20"`
//! - List form: `["required", {"rule": "min:5", "message": "Too short"}]`
//! - `bail` anywhere in a field's spec stops that field at its first failure
//! - A field may instead be checked by one closure, see [`FieldRules::closure`]
//!
//! ## Built-in Rules
//!
//! `required`, `required_if:other,value`, `string`, `int`, `float`,
//! `boolean`, `array`, `min:n`, `max:n`, `size:n`, `between:lo,hi`,
//! `in:a,b,c`, `not_in:a,b,c`, `email`, `url`, `ip`, `json`, `date`,
//! `regex:pattern`, `alpha`, `alpha_num`, `same:other`, `different:other`.
//!
//! ## Custom Rules
//!
//! Register a rule type or a closure with [`extend`] for the whole process,
//! or with [`Validator::extend`] for one validator.

pub mod cast;
pub mod config;
pub mod error;
pub mod registry;
pub mod response;
pub mod rules;
pub mod spec;
pub mod validator;
pub mod value;

pub use config::RuleSet;
pub use error::{ConfigError, DefinitionError, ErrorBag};
pub use registry::{extend, RuleDefinition, RuleRegistry};
pub use response::FailureResponse;
pub use rules::{Outcome, ValidationRule};
pub use spec::{FieldRules, RuleEntry, RuleSpec};
pub use validator::Validator;
pub use value::{Record, UploadedFile};

/// Prelude module for validation
pub mod prelude {
    pub use crate::config::RuleSet;
    pub use crate::error::{ConfigError, DefinitionError, ErrorBag};
    pub use crate::registry::{extend, RuleDefinition, RuleRegistry};
    pub use crate::response::FailureResponse;
    pub use crate::rules::{FromParameter, Outcome, ValidationRule};
    pub use crate::spec::{FieldRules, RuleEntry, RuleSpec};
    pub use crate::validator::Validator;
    pub use crate::value::{Record, UploadedFile};
}
