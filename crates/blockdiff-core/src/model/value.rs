//! Tagged attribute values for the Info and Params maps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single Info or Params entry.
///
/// Whether a value is compared with tolerance or exactly is decided by its
/// tag (see [`AttrValue::is_floating`]). Variant order matters for untagged
/// deserialization: integers are tried before floats so `3` stays an `Int`
/// while `3.0` becomes a `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
    StrArray(Vec<String>),
}

impl AttrValue {
    /// True for tags compared within a tolerance.
    pub fn is_floating(&self) -> bool {
        matches!(self, AttrValue::Float(_) | AttrValue::FloatArray(_))
    }

    /// Numeric view of the value, if it has one.
    ///
    /// Integers widen to `f64` so that a float parameter can still be compared
    /// against an integer written by a different writer.
    pub fn as_f64s(&self) -> Option<Vec<f64>> {
        match self {
            AttrValue::Int(v) => Some(vec![*v as f64]),
            AttrValue::Float(v) => Some(vec![*v]),
            AttrValue::IntArray(v) => Some(v.iter().map(|x| *x as f64).collect()),
            AttrValue::FloatArray(v) => Some(v.clone()),
            AttrValue::Bool(_) | AttrValue::Str(_) | AttrValue::StrArray(_) => None,
        }
    }

    /// Exact equality that ignores the integer/float tag.
    ///
    /// `Int(2)` equals `Float(2.0)` and `IntArray([1, 2])` equals
    /// `FloatArray([1.0, 2.0])`. Non-numeric values must match tag and value.
    pub fn same_value(&self, other: &AttrValue) -> bool {
        fn scalar(v: &AttrValue) -> bool {
            matches!(v, AttrValue::Int(_) | AttrValue::Float(_))
        }
        match (self.as_f64s(), other.as_f64s()) {
            (Some(xs), Some(ys)) => scalar(self) == scalar(other) && xs == ys,
            _ => self == other,
        }
    }

    /// Scalar float view used for the global time fallback.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(v) => Some(*v as f64),
            AttrValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            write!(f, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, "]")
        }

        match self {
            AttrValue::Bool(v) => write!(f, "{}", v),
            AttrValue::Int(v) => write!(f, "{}", v),
            AttrValue::Float(v) => write!(f, "{:e}", v),
            AttrValue::Str(v) => write!(f, "{:?}", v),
            AttrValue::IntArray(v) => list(f, v),
            AttrValue::FloatArray(v) => list(f, v),
            AttrValue::StrArray(v) => list(f, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_deserialization_keeps_integer_tag() {
        let v: AttrValue = serde_json::from_str("3").unwrap();
        assert_eq!(v, AttrValue::Int(3));
        let v: AttrValue = serde_json::from_str("3.0").unwrap();
        assert_eq!(v, AttrValue::Float(3.0));
    }

    #[test]
    fn test_mixed_numeric_array_becomes_float_array() {
        let v: AttrValue = serde_json::from_str("[1, 2.5]").unwrap();
        assert_eq!(v, AttrValue::FloatArray(vec![1.0, 2.5]));
        let v: AttrValue = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(v, AttrValue::IntArray(vec![1, 2]));
    }

    #[test]
    fn test_floating_dispatch() {
        assert!(AttrValue::Float(0.3).is_floating());
        assert!(AttrValue::FloatArray(vec![0.3]).is_floating());
        assert!(!AttrValue::Int(3).is_floating());
        assert!(!AttrValue::from("sod").is_floating());
    }

    #[test]
    fn test_same_value_ignores_numeric_tag() {
        assert!(AttrValue::Int(2).same_value(&AttrValue::Float(2.0)));
        let ints = AttrValue::IntArray(vec![1, 2]);
        assert!(ints.same_value(&AttrValue::FloatArray(vec![1.0, 2.0])));
        assert!(!AttrValue::Int(2).same_value(&AttrValue::Float(2.5)));
        assert!(!AttrValue::Int(2).same_value(&AttrValue::IntArray(vec![2])));
        assert!(!AttrValue::Float(f64::NAN).same_value(&AttrValue::Float(f64::NAN)));
        assert!(!AttrValue::from("2").same_value(&AttrValue::Int(2)));
    }

    #[test]
    fn test_as_f64s_widens_integers() {
        assert_eq!(AttrValue::IntArray(vec![1, 2]).as_f64s(), Some(vec![1.0, 2.0]));
        assert_eq!(AttrValue::from("x").as_f64s(), None);
    }
}
