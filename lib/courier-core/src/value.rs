//! Dynamic parameter values.
//!
//! A request's parameters form a tree of [`DynamicValue`]s that is only turned
//! into JSON when it is sent, see [`crate::normalize`].
//!
//! # Example
//!
//! ```
//! use courier_core::{DynamicValue, Params};
//!
//! let params = Params::new()
//!     .with("name", "x")
//!     .with("tags", vec![Some("a"), None, Some("b")])
//!     .with("limit", 10);
//!
//! assert_eq!(params.len(), 3);
//! assert!(matches!(params.get("limit"), Some(DynamicValue::Int(10))));
//! ```

use std::fmt;
use std::sync::Arc;

/// Any parameter value before normalization.
#[derive(Clone, Default)]
pub enum DynamicValue {
    /// Absent value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer too large for [`DynamicValue::Int`].
    UInt(u64),
    /// Floating-point number.
    Float(f64),
    /// Text.
    String(String),
    /// Ordered sequence.
    Seq(Vec<DynamicValue>),
    /// Ordered string-keyed mapping.
    Map(Params),
    /// Already-serialized JSON, passed through untouched.
    Json(serde_json::Value),
    /// Any other value, sent as its [`Display`](fmt::Display) representation.
    Other(Arc<dyn fmt::Display + Send + Sync>),
}

impl DynamicValue {
    /// Wrap an arbitrary displayable value.
    pub fn other(value: impl fmt::Display + Send + Sync + 'static) -> Self {
        Self::Other(Arc::new(value))
    }

    /// Returns `true` for [`DynamicValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Debug for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Self::UInt(u) => f.debug_tuple("UInt").field(u).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
            Self::Map(params) => f.debug_tuple("Map").field(params).finish(),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Other(value) => f
                .debug_tuple("Other")
                .field(&format_args!("{value}"))
                .finish(),
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for DynamicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! from_lossless_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DynamicValue {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

from_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for DynamicValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::UInt(value), Self::Int)
    }
}

impl From<f32> for DynamicValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for DynamicValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<char> for DynamicValue {
    fn from(value: char) -> Self {
        Self::String(value.to_string())
    }
}

impl From<&str> for DynamicValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for DynamicValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<serde_json::Value> for DynamicValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<Params> for DynamicValue {
    fn from(value: Params) -> Self {
        Self::Map(value)
    }
}

impl<T: Into<DynamicValue>> From<Option<T>> for DynamicValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<DynamicValue>> From<Vec<T>> for DynamicValue {
    fn from(values: Vec<T>) -> Self {
        Self::Seq(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DynamicValue>> FromIterator<T> for DynamicValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Seq(iter.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Params
// ============================================================================

/// Ordered mapping of parameter names to [`DynamicValue`]s.
///
/// Insertion order is kept; inserting an existing key replaces the value in
/// place.
#[derive(Debug, Clone, Default)]
pub struct Params {
    entries: Vec<(String, DynamicValue)>,
}

impl Params {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous one for that key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<DynamicValue>,
    ) -> Option<DynamicValue> {
        let key = key.into();
        let value = value.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Builder-style [`Params::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DynamicValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DynamicValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DynamicValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for Params {
    type Item = (String, DynamicValue);
    type IntoIter = std::vec::IntoIter<(String, DynamicValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<DynamicValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_keep_insertion_order() {
        let params = Params::new().with("b", 1).with("a", 2).with("c", 3);
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn params_insert_replaces_in_place() {
        let mut params = Params::new().with("a", 1).with("b", 2);
        let previous = params.insert("a", "one");

        assert!(matches!(previous, Some(DynamicValue::Int(1))));
        assert_eq!(params.len(), 2);
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
        assert!(matches!(params.get("a"), Some(DynamicValue::String(s)) if s == "one"));
    }

    #[test]
    fn conversions_keep_numeric_kind() {
        assert!(matches!(DynamicValue::from(7_u8), DynamicValue::Int(7)));
        assert!(matches!(DynamicValue::from(u64::MAX), DynamicValue::UInt(u64::MAX)));
        assert!(matches!(
            DynamicValue::from(1.5_f32),
            DynamicValue::Float(x) if (x - 1.5).abs() < f64::EPSILON
        ));
        assert!(matches!(DynamicValue::from(None::<i32>), DynamicValue::Null));
        assert!(matches!(DynamicValue::from('c'), DynamicValue::String(s) if s == "c"));
    }

    #[test]
    fn other_values_debug_through_display() {
        let value = DynamicValue::other(std::net::Ipv4Addr::LOCALHOST);
        assert_eq!(format!("{value:?}"), "Other(127.0.0.1)");
    }

    #[test]
    fn params_from_iterator() {
        let params: Params = [("x", 1), ("y", 2)].into_iter().collect();
        assert_eq!(params.len(), 2);
        assert!(!params.is_empty());
    }
}
