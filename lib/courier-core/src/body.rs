//! Request body and query string encoding.

use bytes::Bytes;

use crate::{DynamicValue, Document, Error, Params, Result};

/// Content type of every JSON body courier sends.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Serialize a JSON document to bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use courier_core::to_json;
/// use serde_json::json;
///
/// let bytes = to_json(&json!({"name": "Alice"})).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"Alice"}"#);
/// ```
pub fn to_json(document: &Document) -> Result<Bytes> {
    serde_json::to_vec(document)
        .map(Bytes::from)
        .map_err(|err| Error::invalid_request(format!("JSON body: {err}")))
}

/// Render parameters as query string pairs, without normalization.
///
/// Scalars use their text form, a sequence repeats the key once per non-null
/// element, nested maps and JSON nodes are written as compact JSON, and null
/// values are left out. Nulls nested inside a container are written as JSON
/// `null`.
///
/// ```
/// use courier_core::{Params, to_query_pairs};
///
/// let params = Params::new().with("q", "rust").with("tag", vec!["a", "b"]);
/// let pairs = to_query_pairs(&params);
///
/// assert_eq!(pairs, [
///     ("q".to_string(), "rust".to_string()),
///     ("tag".to_string(), "a".to_string()),
///     ("tag".to_string(), "b".to_string()),
/// ]);
/// ```
#[must_use]
pub fn to_query_pairs(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params.iter() {
        match value {
            DynamicValue::Seq(items) => pairs.extend(
                items
                    .iter()
                    .filter_map(query_text)
                    .map(|text| (key.to_string(), text)),
            ),
            other => {
                if let Some(text) = query_text(other) {
                    pairs.push((key.to_string(), text));
                }
            }
        }
    }
    pairs
}

fn query_text(value: &DynamicValue) -> Option<String> {
    let text = match value {
        DynamicValue::Null => return None,
        DynamicValue::Bool(b) => b.to_string(),
        DynamicValue::Int(i) => i.to_string(),
        DynamicValue::UInt(u) => u.to_string(),
        DynamicValue::Float(x) => x.to_string(),
        DynamicValue::String(s) => s.clone(),
        DynamicValue::Json(serde_json::Value::String(s)) => s.clone(),
        DynamicValue::Json(node) => node.to_string(),
        DynamicValue::Seq(_) | DynamicValue::Map(_) => raw_json(value).to_string(),
        DynamicValue::Other(other) => other.to_string(),
    };
    Some(text)
}

/// JSON rendering of a query container. Nested nulls are kept.
fn raw_json(value: &DynamicValue) -> serde_json::Value {
    use serde_json::{Number, Value};

    match value {
        DynamicValue::Null => Value::Null,
        DynamicValue::Bool(b) => Value::Bool(*b),
        DynamicValue::Int(i) => Value::Number((*i).into()),
        DynamicValue::UInt(u) => Value::Number((*u).into()),
        DynamicValue::Float(x) => {
            Number::from_f64(*x).map_or_else(|| Value::String(x.to_string()), Value::Number)
        }
        DynamicValue::String(s) => Value::String(s.clone()),
        DynamicValue::Seq(items) => Value::Array(items.iter().map(raw_json).collect()),
        DynamicValue::Map(params) => Value::Object(
            params
                .iter()
                .map(|(key, value)| (key.to_string(), raw_json(value)))
                .collect(),
        ),
        DynamicValue::Json(node) => node.clone(),
        DynamicValue::Other(other) => Value::String(other.to_string()),
    }
}
