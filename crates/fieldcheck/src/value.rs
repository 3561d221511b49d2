//! Input values and the comparisons rules share.
//!
//! Records are plain JSON maps. Form posts, query strings and JSON bodies all
//! land here once the transport layer has decoded them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flat mapping of field name to value. Insertion order is preserved.
pub type Record = Map<String, Value>;

/// Upload error code meaning the client submitted the form without a file.
pub const UPLOAD_ERR_NO_FILE: i64 = 4;

/// Upload error code for a successful upload.
pub const UPLOAD_ERR_OK: i64 = 0;

/// An uploaded file as it appears in the input record.
///
/// The engine never touches the file itself; it only looks at `errorCode`
/// to decide whether an optional file field was left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Client-supplied file name
    pub name: String,
    /// Client-supplied MIME type
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Where the transport layer stored the upload
    pub tmp_path: String,
    /// Upload status code (`0` = ok, `4` = no file)
    pub error_code: i64,
    /// Size in bytes
    pub size: u64,
}

impl UploadedFile {
    /// Create a successfully uploaded file.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        tmp_path: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            tmp_path: tmp_path.into(),
            error_code: UPLOAD_ERR_OK,
            size,
        }
    }

    /// The placeholder a form produces when no file was chosen.
    pub fn missing() -> Self {
        Self {
            name: String::new(),
            mime_type: String::new(),
            tmp_path: String::new(),
            error_code: UPLOAD_ERR_NO_FILE,
            size: 0,
        }
    }

    /// Whether no file was uploaded.
    pub fn is_missing(&self) -> bool {
        self.error_code == UPLOAD_ERR_NO_FILE
    }
}

impl From<UploadedFile> for Value {
    fn from(file: UploadedFile) -> Self {
        serde_json::json!({
            "name": file.name,
            "type": file.mime_type,
            "tmpPath": file.tmp_path,
            "errorCode": file.error_code,
            "size": file.size,
        })
    }
}

/// Characters stripped from both ends of input strings. Unicode spaces such
/// as NBSP are content, not padding.
const PADDING: [char; 6] = [' ', '\t', '\n', '\r', '\0', '\x0B'];

/// A string with its padding removed from both ends.
pub fn trim_padding(s: &str) -> &str {
    s.trim_matches(&PADDING[..])
}

/// Trim surrounding padding from every string, at any depth.
pub fn trim_strings(value: &mut Value) {
    match value {
        Value::String(s) => {
            let trimmed = trim_padding(s);
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
        Value::Array(items) => items.iter_mut().for_each(trim_strings),
        Value::Object(map) => map.values_mut().for_each(trim_strings),
        _ => {}
    }
}

/// Trim every string in a record.
pub fn trim_record(mut record: Record) -> Record {
    record.values_mut().for_each(trim_strings);
    record
}

/// Whether a value counts as "not provided" for an optional field.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => trim_padding(s).is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty() || is_missing_file(map),
        _ => false,
    }
}

fn is_missing_file(map: &Map<String, Value>) -> bool {
    map.get("errorCode").and_then(Value::as_i64) == Some(UPLOAD_ERR_NO_FILE)
}

/// Whether a string is a decimal number literal: optional sign, digits,
/// optional fraction and exponent, with a finite value. Surrounding
/// whitespace is ignored.
pub fn is_numeric_str(s: &str) -> bool {
    let s = s.trim();
    let body = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return false;
    }
    if !body
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return false;
    }
    s.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Whether a value is a number or a numeric string. Booleans are not numeric.
pub fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => is_numeric_str(s),
        _ => false,
    }
}

/// Numeric view of a number or numeric string.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if is_numeric_str(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse an integer literal the strict way: optional sign, no leading zeros,
/// no fraction, within `i64`.
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let digits = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    s.strip_prefix('+').unwrap_or(s).parse().ok()
}

/// Render a float the way rule messages expect: `18` rather than `18.0`.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// The string form of a scalar, used when comparing against rule parameters.
///
/// `None` for `null`. Booleans render as `"1"` and `""`.
pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        }),
        other => Some(other.to_string()),
    }
}

/// How two values are compared by the membership and comparison rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Numeric values compare by magnitude (`2 == "2" == 2.0`); anything else
    /// compares strictly.
    Loose,
    /// Type and value must both match (`1 != "1"`, `1 != 1.0`).
    Strict,
}

/// Compare `value` to `candidate`.
///
/// Under [`Comparison::Loose`] a numeric `value` matches a numeric candidate
/// of equal magnitude, and a string candidate with the same text. A
/// non-numeric `value` always compares strictly.
pub fn loose_or_strict_equals(value: &Value, candidate: &Value, comparison: Comparison) -> bool {
    match comparison {
        Comparison::Strict => value == candidate,
        Comparison::Loose if is_numeric(value) => match (as_number(value), as_number(candidate)) {
            (Some(a), Some(b)) => a == b,
            _ => match candidate {
                Value::String(c) => stringify(value).as_deref() == Some(c.as_str()),
                _ => value == candidate,
            },
        },
        Comparison::Loose => value == candidate,
    }
}
