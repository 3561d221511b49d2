//! Format rules: `email`, `url`, `ip`, `json`, `date`, `regex`, `alpha`,
//! `alpha_num`.

use super::{parameterless, required_parameter, FromParameter, ValidationRule};
use crate::error::DefinitionError;
use crate::value::Record;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::net::IpAddr;
use std::sync::OnceLock;
use validator::ValidateUrl;

static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn email_regex() -> Option<&'static Regex> {
    EMAIL_REGEX
        .get_or_init(|| {
            // Dot-atom local part; the domain needs at least one dot.
            Regex::new(
                r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
            )
            .ok()
        })
        .as_ref()
}

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_LOCAL_PART_LENGTH: usize = 64;

/// Date-only formats accepted by `date`, tried in order.
const DATE_FORMATS: [&str; 6] = ["%Y-%m-%d", "%Y/%m/%d", "%m-%d-%Y", "%m/%d/%Y", "%d-%m-%Y", "%d/%m/%Y"];

/// Date-time formats accepted by `date`, tried in order.
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
];

/// The value must be an email address.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailRule;

/// The value must be an absolute URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlRule;

/// The value must be an IPv4 or IPv6 address.
#[derive(Debug, Clone, Copy, Default)]
pub struct IpRule;

/// The value must be a string holding valid JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRule;

/// The value must be a date in one of the accepted formats.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRule;

/// The value must be ASCII letters only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaRule;

/// The value must be ASCII letters and digits only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaNumRule;

parameterless!(EmailRule, UrlRule, IpRule, JsonRule, DateRule, AlphaRule, AlphaNumRule);

impl EmailRule {
    pub fn check(value: &str) -> bool {
        let Some((local, _)) = value.rsplit_once('@') else {
            return false;
        };
        value.len() <= MAX_EMAIL_LENGTH
            && local.len() <= MAX_LOCAL_PART_LENGTH
            && email_regex().is_some_and(|re| re.is_match(value))
    }
}

impl ValidationRule for EmailRule {
    fn rule_name(&self) -> &'static str {
        "email"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        value.as_str().is_some_and(Self::check)
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must be a valid email address.")
    }
}

impl ValidationRule for UrlRule {
    fn rule_name(&self) -> &'static str {
        "url"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        value
            .as_str()
            .is_some_and(|url| !url.is_empty() && url.validate_url())
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must be a valid URL.")
    }
}

impl ValidationRule for IpRule {
    fn rule_name(&self) -> &'static str {
        "ip"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        value
            .as_str()
            .is_some_and(|ip| ip.parse::<IpAddr>().is_ok())
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must be a valid IP address.")
    }
}

impl ValidationRule for JsonRule {
    fn rule_name(&self) -> &'static str {
        "json"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        value
            .as_str()
            .is_some_and(|text| serde_json::from_str::<Value>(text).is_ok())
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must be a valid JSON string.")
    }
}

impl DateRule {
    /// Whether `value` parses in one of the accepted formats and formats
    /// back to exactly the same text.
    pub fn check(value: &str) -> bool {
        if value.trim().is_empty() {
            return false;
        }
        let date_matches = DATE_FORMATS.iter().any(|format| {
            NaiveDate::parse_from_str(value, format)
                .is_ok_and(|date| date.format(format).to_string() == value)
        });
        date_matches
            || DATE_TIME_FORMATS.iter().any(|format| {
                NaiveDateTime::parse_from_str(value, format)
                    .is_ok_and(|moment| moment.format(format).to_string() == value)
            })
    }
}

impl ValidationRule for DateRule {
    fn rule_name(&self) -> &'static str {
        "date"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        value.as_str().is_some_and(Self::check)
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must be a valid date.")
    }
}

/// The value must match a regular expression.
///
/// Patterns may be written bare (`^\d+$`) or with slash delimiters and
/// trailing flags (`/^abc$/i`). Supported flags: `i`, `m`, `s`, `x`, `U`;
/// `u` is accepted and ignored since matching is always Unicode-aware.
#[derive(Debug, Clone)]
pub struct RegexRule {
    pattern: String,
    compiled: Regex,
}

impl RegexRule {
    /// Compile a pattern, unwrapping `/.../flags` delimiters if present.
    pub fn new(pattern: &str) -> Result<Self, DefinitionError> {
        let source = unwrap_delimiters(pattern)?;
        let compiled = Regex::new(&source).map_err(|e| DefinitionError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            compiled,
        })
    }

    /// The pattern as written in the rule spec.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

fn unwrap_delimiters(pattern: &str) -> Result<String, DefinitionError> {
    let Some(rest) = pattern.strip_prefix('/') else {
        return Ok(pattern.to_string());
    };
    let Some((body, flags)) = rest.rsplit_once('/') else {
        return Ok(rest.to_string());
    };

    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' | 'U' => inline.push(flag),
            'u' => {}
            other => {
                return Err(DefinitionError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: format!("unsupported flag `{other}`"),
                })
            }
        }
    }

    if inline.is_empty() {
        Ok(body.to_string())
    } else {
        Ok(format!("(?{inline}){body}"))
    }
}

impl FromParameter for RegexRule {
    fn from_parameter(parameter: Option<&str>) -> Result<Self, DefinitionError> {
        Self::new(required_parameter("regex", parameter)?)
    }
}

impl ValidationRule for RegexRule {
    fn rule_name(&self) -> &'static str {
        "regex"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        value.as_str().is_some_and(|text| self.compiled.is_match(text))
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field format is invalid.")
    }
}

impl ValidationRule for AlphaRule {
    fn rule_name(&self) -> &'static str {
        "alpha"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        value
            .as_str()
            .is_some_and(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()))
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must only contain letters.")
    }
}

impl ValidationRule for AlphaNumRule {
    fn rule_name(&self) -> &'static str {
        "alpha_num"
    }

    fn validate(&self, _field: &str, value: &Value, _data: &Record) -> bool {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return false,
        };
        !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric())
    }

    fn default_message(&self, field: &str) -> String {
        format!("The {field} field must only contain letters and numbers.")
    }
}
