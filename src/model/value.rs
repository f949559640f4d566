//! Runtime value types

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::ast::Node;

/// Insertion-ordered map used for object values
pub type ObjectMap = IndexMap<String, ElValue>;

/// One frame of lambda parameters, captured by closures
pub type ScopeFrame = FxHashMap<String, ElValue>;

/// A value produced by expression evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum ElValue {
    /// The null value
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Long(i64),
    /// Double-precision float
    Double(f64),
    /// Arbitrary-precision decimal, supplied by resolvers or functions
    Decimal(Decimal),
    /// String
    Str(Arc<str>),
    /// Array of values
    Array(Vec<ElValue>),
    /// Keyed object
    Object(ObjectMap),
    /// First-class lambda
    Lambda(ElLambda),
}

/// A lambda closure: parameters, body, and the scope frames captured at
/// the point the lambda literal was evaluated
#[derive(Debug, Clone)]
pub struct ElLambda {
    /// Parameter names, bound positionally on invocation
    pub params: Arc<[String]>,
    /// The body expression
    pub body: Arc<Node>,
    /// Captured enclosing lambda frames, outermost first
    pub captured: Vec<ScopeFrame>,
}

impl PartialEq for ElLambda {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
            && self.params == other.params
            && self.captured == other.captured
    }
}

impl ElValue {
    /// Human-readable type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Long(_) => "long",
            Self::Double(_) => "double",
            Self::Decimal(_) => "decimal",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Lambda(_) => "lambda",
        }
    }

    /// Whether this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Build a string value
    pub fn str(s: impl AsRef<str>) -> Self {
        Self::Str(Arc::from(s.as_ref()))
    }
}

impl From<bool> for ElValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for ElValue {
    fn from(n: i64) -> Self {
        Self::Long(n)
    }
}

impl From<f64> for ElValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<Decimal> for ElValue {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<&str> for ElValue {
    fn from(s: &str) -> Self {
        Self::Str(Arc::from(s))
    }
}

impl From<String> for ElValue {
    fn from(s: String) -> Self {
        Self::Str(Arc::from(s.as_str()))
    }
}

impl From<Vec<ElValue>> for ElValue {
    fn from(items: Vec<ElValue>) -> Self {
        Self::Array(items)
    }
}

impl From<Value> for ElValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Long(i)
                } else {
                    Self::Double(n.as_f64().unwrap_or_default())
                }
            }
            Value::String(s) => Self::from(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<ElValue> for Value {
    fn from(value: ElValue) -> Self {
        use rust_decimal::prelude::ToPrimitive;
        match value {
            ElValue::Null | ElValue::Lambda(_) => Value::Null,
            ElValue::Bool(b) => Value::Bool(b),
            ElValue::Long(n) => Value::Number(n.into()),
            ElValue::Double(d) => serde_json::Number::from_f64(d).map_or(Value::Null, Value::Number),
            ElValue::Decimal(d) => d
                .to_f64()
                .and_then(serde_json::Number::from_f64)
                .map_or(Value::Null, Value::Number),
            ElValue::Str(s) => Value::String(s.as_ref().to_string()),
            ElValue::Array(items) => Value::Array(items.into_iter().map(Into::into).collect()),
            ElValue::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl Serialize for ElValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self.clone()).serialize(serializer)
    }
}

impl fmt::Display for ElValue {
    /// The EL string coercion: null renders empty, scalars render their
    /// literal form, arrays and objects render as JSON
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Long(n) => write!(f, "{n}"),
            Self::Double(d) => write!(f, "{d}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Str(s) => f.write_str(s),
            Self::Array(_) | Self::Object(_) => match serde_json::to_string(self) {
                Ok(json) => f.write_str(&json),
                Err(_) => Err(fmt::Error),
            },
            Self::Lambda(_) => f.write_str("<lambda>"),
        }
    }
}
