//! Typed keys for the ordered key-value substrate
//!
//! Primary keys and posting-collection keys share one key type with a
//! deterministic total order: Bool < Int < Float < String. Floats are
//! carried as order-preserving bit patterns so the derived `Ord` matches
//! numeric order; strings compare lexicographically, which is what prefix
//! scans rely on.

use std::fmt;

use serde_json::Value;

/// A substrate key.
///
/// Keys round-trip to JSON scalars because posting lists persist primary
/// keys inside JSON arrays. Null, arrays, and objects are not keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// Boolean value (false < true)
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value (stored as bits for total ordering)
    Float(u64),
    /// String value
    String(String),
}

impl Key {
    /// Create a key from a float.
    ///
    /// Uses bit representation for total ordering.
    pub fn from_float(v: f64) -> Self {
        let bits = v.to_bits();
        // Negative: flip all bits. Positive: flip sign bit.
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        Key::Float(ordered)
    }

    /// Decode the float carried by a `Float` key.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Key::Float(bits) => {
                let raw = if (bits >> 63) == 1 {
                    bits ^ (1 << 63)
                } else {
                    !bits
                };
                Some(f64::from_bits(raw))
            }
            _ => None,
        }
    }

    /// Borrow the string carried by a `String` key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::String(s) => Some(s),
            _ => None,
        }
    }

    /// Create a key from a JSON value.
    ///
    /// Returns `None` for null, arrays, and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Key::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Key::Int(i))
                } else {
                    n.as_f64().map(Key::from_float)
                }
            }
            Value::String(s) => Some(Key::String(s.clone())),
            _ => None,
        }
    }

    /// Convert the key back to its JSON form.
    pub fn to_json(&self) -> Value {
        match self {
            Key::Bool(b) => Value::Bool(*b),
            Key::Int(i) => Value::from(*i),
            Key::Float(_) => match self.as_f64().and_then(serde_json::Number::from_f64) {
                Some(n) => Value::Number(n),
                // Non-finite floats have no JSON form.
                None => Value::Null,
            },
            Key::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Bool(b) => write!(f, "{}", b),
            Key::Int(i) => write!(f, "{}", i),
            Key::Float(_) => match self.as_f64() {
                Some(v) => write!(f, "{}", v),
                None => write!(f, "NaN"),
            },
            Key::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Key {
    fn from(v: bool) -> Self {
        Key::Bool(v)
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Int(v)
    }
}

impl From<i32> for Key {
    fn from(v: i32) -> Self {
        Key::Int(v as i64)
    }
}

impl From<f64> for Key {
    fn from(v: f64) -> Self {
        Key::from_float(v)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::String(v.to_string())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::String(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variant_ordering() {
        let keys = vec![
            Key::Bool(false),
            Key::Bool(true),
            Key::Int(-100),
            Key::Int(0),
            Key::Int(100),
            Key::from_float(-1.5),
            Key::from_float(2.5),
            Key::from("aaa"),
            Key::from("zzz"),
        ];

        for i in 1..keys.len() {
            assert!(keys[i - 1] < keys[i], "keys should be ordered");
        }
    }

    #[test]
    fn test_float_order_matches_numeric_order() {
        let values = [-1000.0, -1.5, -0.0, 0.0, 0.25, 1.0, 99.9];
        for pair in values.windows(2) {
            assert!(Key::from_float(pair[0]) <= Key::from_float(pair[1]));
        }
    }

    #[test]
    fn test_float_roundtrip() {
        for v in [-3.75, 0.0, 1.25, 1e18] {
            assert_eq!(Key::from_float(v).as_f64(), Some(v));
        }
    }

    #[test]
    fn test_from_json_scalars_only() {
        assert_eq!(Key::from_json(&json!(true)), Some(Key::Bool(true)));
        assert_eq!(Key::from_json(&json!(42)), Some(Key::Int(42)));
        assert_eq!(
            Key::from_json(&json!("hello")),
            Some(Key::String("hello".to_string()))
        );
        assert_eq!(Key::from_json(&json!(null)), None);
        assert_eq!(Key::from_json(&json!([1, 2])), None);
        assert_eq!(Key::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_json_roundtrip() {
        for v in [json!(true), json!(-7), json!(2.5), json!("title")] {
            let key = Key::from_json(&v).unwrap();
            assert_eq!(key.to_json(), v);
        }
    }

    #[test]
    fn test_string_order_is_lexicographic() {
        assert!(Key::from("Node Advanced") < Key::from("Node JS"));
        assert!(Key::from("Node JS") < Key::from("Node JS Basics"));
    }
}
