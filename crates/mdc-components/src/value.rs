//! Typed component property values.
//!
//! Component props are written as strings, bare flags or `{...}` literals.
//! [`PropValue`] is the tagged union every parsed value lands in, so schema
//! checks in the registry match on variants instead of inspecting strings.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Property bag of a single component occurrence.
pub type Props = BTreeMap<String, PropValue>;

/// A single property value.
///
/// `Undefined` is distinct from `Null`: `{undefined}` leaves a prop present
/// but unset, so declared defaults still apply to it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    String(String),
    Number(f64),
    Bool(bool),
    Array(Vec<PropValue>),
    Object(BTreeMap<String, PropValue>),
    Null,
    Undefined,
}

impl PropValue {
    /// Returns the string slice if this is a [`PropValue::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a [`PropValue::Number`].
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag if this is a [`PropValue::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// True for `null` and `undefined`, which count as "not provided".
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// Runtime type name used in type mismatch messages.
    ///
    /// Arrays and `null` report as `object`, matching how component authors
    /// see these values in their templates.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Bool(_) => "boolean",
            Self::Array(_) | Self::Object(_) | Self::Null => "object",
            Self::Undefined => "undefined",
        }
    }

    /// Check whether this value satisfies a declared kind.
    #[must_use]
    pub fn matches_kind(&self, kind: PropKind) -> bool {
        match (kind, self) {
            (PropKind::String, Self::String(_))
            | (PropKind::Boolean, Self::Bool(_))
            | (PropKind::Array, Self::Array(_))
            | (PropKind::Object, Self::Object(_)) => true,
            (PropKind::Number, Self::Number(n)) => !n.is_nan(),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Declared kind of a schema property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl fmt::Display for PropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_kind_rejects_nan() {
        assert!(PropValue::Number(1.5).matches_kind(PropKind::Number));
        assert!(!PropValue::Number(f64::NAN).matches_kind(PropKind::Number));
    }

    #[test]
    fn test_array_is_not_object() {
        let array = PropValue::Array(vec![PropValue::Bool(true)]);
        assert!(array.matches_kind(PropKind::Array));
        assert!(!array.matches_kind(PropKind::Object));
        assert_eq!(array.type_name(), "object");
    }

    #[test]
    fn test_missing_values() {
        assert!(PropValue::Null.is_missing());
        assert!(PropValue::Undefined.is_missing());
        assert!(!PropValue::Bool(false).is_missing());
    }

    #[test]
    fn test_from_json_nested() {
        let json = serde_json::json!({"a": [1, "x"], "b": null});
        let value = PropValue::from(json);

        let PropValue::Object(map) = value else {
            panic!("expected object");
        };
        assert_eq!(
            map["a"],
            PropValue::Array(vec![PropValue::Number(1.0), PropValue::from("x")])
        );
        assert_eq!(map["b"], PropValue::Null);
    }

    #[test]
    fn test_serialize_untagged() {
        let value = PropValue::Array(vec![PropValue::from("a"), PropValue::Number(2.0)]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!(["a", 2.0]));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(PropKind::Boolean.to_string(), "boolean");
        assert_eq!(PropKind::Object.to_string(), "object");
    }
}
