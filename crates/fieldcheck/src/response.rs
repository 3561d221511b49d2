//! Default failure response for fail-fast validation.
//!
//! The engine does not talk to a transport. [`FailureResponse`] is the
//! status and JSON body a web layer should send when validation fails and
//! the caller supplied no handler of its own.

use crate::error::ErrorBag;
use crate::spec::FieldRules;
use crate::validator::Validator;
use crate::value::Record;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde_json::{json, Value};
use std::fmt;

/// A `400 Bad Request` carrying `{"success": false, "errors": {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// JSON body
    pub body: Value,
}

impl FailureResponse {
    /// Build the default response for a failed run.
    pub fn from_errors(errors: &ErrorBag) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: json!({
                "success": false,
                "errors": errors.to_value(),
            }),
        }
    }

    /// The body as JSON text.
    pub fn body_string(&self) -> String {
        self.body.to_string()
    }

    /// Convert into an `http::Response` with a JSON content type.
    pub fn into_http_response(self) -> http::Response<String> {
        let mut response = http::Response::new(self.body.to_string());
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

impl fmt::Display for FailureResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.body)
    }
}

impl std::error::Error for FailureResponse {}

impl From<&ErrorBag> for FailureResponse {
    fn from(errors: &ErrorBag) -> Self {
        Self::from_errors(errors)
    }
}

impl Validator {
    /// Validate `data`, failing with the default [`FailureResponse`].
    ///
    /// ## Example
    ///
    /// ```
    /// use fieldcheck::{Record, Validator};
    ///
    /// let mut validator = Validator::new();
    /// let failure = validator
    ///     .validate_or_fail(Record::new(), [("email", "required|email")], [("required", "Missing.")])
    ///     .unwrap_err();
    ///
    /// assert_eq!(failure.status, http::StatusCode::BAD_REQUEST);
    /// assert_eq!(failure.body_string(), r#"{"success":false,"errors":{"email":["Missing."]}}"#);
    /// ```
    pub fn validate_or_fail<RI, RK, R, MI, MK, M>(
        &mut self,
        data: Record,
        rules: RI,
        messages: MI,
    ) -> Result<Record, FailureResponse>
    where
        RI: IntoIterator<Item = (RK, R)>,
        RK: Into<String>,
        R: Into<FieldRules>,
        MI: IntoIterator<Item = (MK, M)>,
        MK: Into<String>,
        M: Into<String>,
    {
        self.validate_or_else(data, rules, messages, FailureResponse::from_errors)
    }
}
