//! Dynamic values that contracts are checked against
//!
//! Contracts do not know anything about host types; every check runs against
//! a [`Value`]. `Tagged` values play the role of class instances: a tagged
//! value carries the name of the type that produced it, and a
//! [`TypeTag::Tagged`](crate::adapter::TypeTag) contract matches on that name.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A dynamic value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Integer value
    Integer(i64),

    /// Floating point value
    Float(f64),

    /// String value
    String(String),

    /// Boolean value
    Boolean(bool),

    /// Nil/null value
    Nil,

    /// List of values
    List(Vec<Value>),

    /// Fixed-arity tuple of values
    Tuple(Vec<Value>),

    /// String-keyed map
    Map(FxHashMap<String, Value>),

    /// Tagged value, standing in for an instance of a user-defined type
    Tagged { tag: String, values: Vec<Value> },
}

/// The built-in shapes a [`Value`] can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Integer,
    Float,
    String,
    Boolean,
    Nil,
    List,
    Tuple,
    Map,
    Tagged,
}

impl ValueKind {
    /// Name of this kind in contract expression syntax
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Integer => "int",
            ValueKind::Float => "float",
            ValueKind::String => "str",
            ValueKind::Boolean => "bool",
            ValueKind::Nil => "nil",
            ValueKind::List => "list",
            ValueKind::Tuple => "tuple",
            ValueKind::Map => "map",
            ValueKind::Tagged => "tagged",
        }
    }
}

impl Value {
    /// The built-in shape of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Nil => ValueKind::Nil,
            Value::List(_) => ValueKind::List,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Map(_) => ValueKind::Map,
            Value::Tagged { .. } => ValueKind::Tagged,
        }
    }

    /// Numeric view of this value, if it is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// True for `Integer` and `Float`
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Tagged { tag, values } => {
                write!(f, "{}(", tag)?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Build a `Value::List` from integer literals
///
/// Shorthand used throughout the tests: `list_of(&[1, 2, 3])`.
pub fn list_of(items: &[i64]) -> Value {
    Value::List(items.iter().map(|&i| Value::Integer(i)).collect())
}

/// Build a `Value::Tuple` from already-built values
pub fn tuple_of(items: Vec<Value>) -> Value {
    Value::Tuple(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Integer(1).kind().name(), "int");
        assert_eq!(Value::Float(1.5).kind().name(), "float");
        assert_eq!(Value::Nil.kind().name(), "nil");
        assert_eq!(list_of(&[1]).kind().name(), "list");
    }

    #[test]
    fn test_numeric_view() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::String("3".into()).as_f64(), None);
        assert!(!Value::Boolean(true).is_number());
    }

    #[test]
    fn test_display() {
        assert_eq!(list_of(&[1, 2]).to_string(), "[1, 2]");
        assert_eq!(
            tuple_of(vec![Value::Integer(1), Value::String("a".into())]).to_string(),
            "(1, \"a\")"
        );
        let tagged = Value::Tagged {
            tag: "Point".to_string(),
            values: vec![Value::Integer(0), Value::Integer(1)],
        };
        assert_eq!(tagged.to_string(), "Point(0, 1)");
    }

    #[test]
    fn test_serde_round_trip() {
        let value = Value::Tuple(vec![list_of(&[1, 2]), Value::Nil]);
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, back);
    }
}
