//! The typed property-list value tree.

use indexmap::IndexMap;

/// A property-list mapping. Keys keep document order.
pub type Dict = IndexMap<String, Value>;

/// A decoded property-list value.
///
/// `<date>` and `<data>` elements are kept as their raw text in
/// [`Value::String`]; nothing downstream interprets them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Dict(Dict),
    Array(Vec<Value>),
    String(String),
    Real(f64),
    Integer(i64),
    Bool(bool),
}

impl Value {
    /// Looks up `key` when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict().and_then(|dict| dict.get(key))
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a number from a real, an integer, or a numeric string.
    ///
    /// OmniGraffle is inconsistent about numeric storage: colors and shape
    /// parameters are often written as `<string>0.5</string>`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            Value::Integer(i) => Some(*i as f64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Same as [`Value::as_f64`], narrowed to the geometry precision.
    pub fn as_f32(&self) -> Option<f32> {
        self.as_f64().map(|v| v as f32)
    }

    /// Returns an integer from an integer, an integral real, or a numeric string.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(r) if r.fract() == 0.0 => Some(*r as i64),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Name of the value kind, for log and diagnostic messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Dict(_) => "dict",
            Value::Array(_) => "array",
            Value::String(_) => "string",
            Value::Real(_) => "real",
            Value::Integer(_) => "integer",
            Value::Bool(_) => "bool",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
