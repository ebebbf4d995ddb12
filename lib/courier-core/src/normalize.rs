//! Conversion of dynamic parameter trees into JSON documents.
//!
//! Normalization is total: every acyclic [`DynamicValue`] tree has a JSON
//! form. Unknown values degrade to their string representation instead of
//! failing.
//!
//! Nulls are treated asymmetrically. A top-level [`DynamicValue::Null`] stays
//! JSON `null`, but a null element of a sequence or a null map entry is
//! dropped. [`DynamicValue::Json`] nodes are already canonical and are moved
//! into the output unchanged, so a JSON `null` inside them survives.
//!
//! # Example
//!
//! ```
//! use courier_core::{DynamicValue, Params, normalize_params};
//! use serde_json::json;
//!
//! let params = Params::new()
//!     .with("a", DynamicValue::Null)
//!     .with("b", 1)
//!     .with("tags", vec![Some("x"), None]);
//!
//! assert_eq!(normalize_params(params), json!({"b": 1, "tags": ["x"]}));
//! ```

use serde_json::{Map, Number, Value};

use crate::{DynamicValue, Params};

/// Canonical JSON produced by normalization.
pub type Document = Value;

/// Normalize a single value.
#[must_use]
pub fn normalize(value: DynamicValue) -> Document {
    match value {
        DynamicValue::Null => Value::Null,
        DynamicValue::Json(node) => node,
        DynamicValue::Bool(b) => Value::Bool(b),
        DynamicValue::Int(i) => Value::Number(i.into()),
        DynamicValue::UInt(u) => Value::Number(u.into()),
        DynamicValue::Float(x) => {
            Number::from_f64(x).map_or_else(|| Value::String(x.to_string()), Value::Number)
        }
        DynamicValue::String(s) => Value::String(s),
        DynamicValue::Seq(items) => Value::Array(
            items
                .into_iter()
                .filter(|item| !item.is_null())
                .map(normalize)
                .collect(),
        ),
        DynamicValue::Map(params) => normalize_params(params),
        DynamicValue::Other(value) => Value::String(value.to_string()),
    }
}

/// Normalize a parameter mapping into a JSON object.
#[must_use]
pub fn normalize_params(params: Params) -> Document {
    let object: Map<String, Value> = params
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key, normalize(value)))
        .collect();
    Value::Object(object)
}
