//! Error response body parsing.

use serde_json::{Map, Value};

/// Structured error information extracted from an error response body.
///
/// Fields the extractor could not find are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDescriptor {
    /// Message meant for the end user.
    pub user_message: String,
    /// Machine-readable error code.
    pub code: String,
    /// Symbolic error name.
    pub name: String,
}

/// Trait for reading error fields out of a JSON error body.
///
/// Implement this trait to match the error schema of a given API. Each
/// accessor is independent; returning `None` only blanks that one field.
///
/// # Example
///
/// ```
/// use courier_core::ErrorFieldExtractor;
/// use serde_json::{Map, Value};
///
/// struct ProblemJson;
///
/// impl ErrorFieldExtractor for ProblemJson {
///     fn user_message(&self, body: &Map<String, Value>) -> Option<String> {
///         body.get("detail")?.as_str().map(str::to_string)
///     }
///
///     fn code(&self, body: &Map<String, Value>) -> Option<String> {
///         body.get("status").map(Value::to_string)
///     }
///
///     fn error_name(&self, body: &Map<String, Value>) -> Option<String> {
///         body.get("title")?.as_str().map(str::to_string)
///     }
/// }
/// ```
pub trait ErrorFieldExtractor: Send + Sync + 'static {
    /// Message meant for the end user.
    fn user_message(&self, body: &Map<String, Value>) -> Option<String>;

    /// Machine-readable error code.
    fn code(&self, body: &Map<String, Value>) -> Option<String>;

    /// Symbolic error name.
    fn error_name(&self, body: &Map<String, Value>) -> Option<String>;
}

/// Extractor reading `userMessage` and `errorName`; it reports no code.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorFieldExtractor;

impl ErrorFieldExtractor for DefaultErrorFieldExtractor {
    fn user_message(&self, body: &Map<String, Value>) -> Option<String> {
        text_field(body, "userMessage")
    }

    fn code(&self, _body: &Map<String, Value>) -> Option<String> {
        None
    }

    fn error_name(&self, body: &Map<String, Value>) -> Option<String> {
        text_field(body, "errorName")
    }
}

/// Extractor reading three top-level fields by name.
///
/// ```
/// use courier_core::FieldNames;
///
/// let extractor = FieldNames::new("message", "code", "error");
/// ```
#[derive(Debug, Clone)]
pub struct FieldNames {
    user_message: String,
    code: String,
    name: String,
}

impl FieldNames {
    /// Creates an extractor for the given field names.
    #[must_use]
    pub fn new(
        user_message: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            user_message: user_message.into(),
            code: code.into(),
            name: name.into(),
        }
    }
}

impl ErrorFieldExtractor for FieldNames {
    fn user_message(&self, body: &Map<String, Value>) -> Option<String> {
        text_field(body, &self.user_message)
    }

    fn code(&self, body: &Map<String, Value>) -> Option<String> {
        text_field(body, &self.code)
    }

    fn error_name(&self, body: &Map<String, Value>) -> Option<String> {
        text_field(body, &self.name)
    }
}

/// Read a scalar field as text. Numbers and booleans are rendered, `null` and
/// containers count as missing.
#[must_use]
pub fn text_field(body: &Map<String, Value>, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse an error response body.
///
/// Returns `None` when the body is not a JSON object; callers fall back to a
/// generic message. Otherwise every field the extractor cannot find is left
/// empty.
#[must_use]
pub fn parse_error_body(
    raw: &[u8],
    extractor: &dyn ErrorFieldExtractor,
) -> Option<ErrorDescriptor> {
    let body = match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(body)) => body,
        Ok(_) => {
            tracing::debug!("error body is not a JSON object");
            return None;
        }
        Err(err) => {
            tracing::debug!(error = %err, "error body is not valid JSON");
            return None;
        }
    };

    Some(ErrorDescriptor {
        user_message: extractor.user_message(&body).unwrap_or_default(),
        code: extractor.code(&body).unwrap_or_default(),
        name: extractor.error_name(&body).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_extractor_reads_known_fields() {
        let body = br#"{"userMessage": "Card declined", "errorName": "PAYMENT_FAILED"}"#;
        let descriptor =
            parse_error_body(body, &DefaultErrorFieldExtractor).expect("valid error body");

        assert_eq!(
            descriptor,
            ErrorDescriptor {
                user_message: "Card declined".to_string(),
                code: String::new(),
                name: "PAYMENT_FAILED".to_string(),
            }
        );
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let body = br#"{"errorName": "E42"}"#;
        let descriptor =
            parse_error_body(body, &DefaultErrorFieldExtractor).expect("valid error body");

        assert_eq!(descriptor.user_message, "");
        assert_eq!(descriptor.name, "E42");
    }

    #[test]
    fn malformed_body_gives_none() {
        assert!(parse_error_body(b"<html>oops</html>", &DefaultErrorFieldExtractor).is_none());
        assert!(parse_error_body(b"", &DefaultErrorFieldExtractor).is_none());
    }

    #[test]
    fn non_object_json_gives_none() {
        assert!(parse_error_body(b"[1, 2]", &DefaultErrorFieldExtractor).is_none());
        assert!(parse_error_body(br#""text""#, &DefaultErrorFieldExtractor).is_none());
    }

    #[test]
    fn field_names_extractor() {
        let extractor = FieldNames::new("message", "code", "error");
        let body = br#"{"message": "Slow down", "code": 429, "error": null}"#;
        let descriptor = parse_error_body(body, &extractor).expect("valid error body");

        assert_eq!(descriptor.user_message, "Slow down");
        assert_eq!(descriptor.code, "429");
        assert_eq!(descriptor.name, "");
    }

    #[test]
    fn text_field_coerces_scalars() {
        let body: Map<String, Value> =
            serde_json::from_str(r#"{"n": 1.5, "b": false, "o": {}, "a": []}"#).expect("object");

        assert_eq!(text_field(&body, "n").as_deref(), Some("1.5"));
        assert_eq!(text_field(&body, "b").as_deref(), Some("false"));
        assert_eq!(text_field(&body, "o"), None);
        assert_eq!(text_field(&body, "a"), None);
        assert_eq!(text_field(&body, "missing"), None);
    }
}
