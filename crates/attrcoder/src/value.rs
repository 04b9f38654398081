//! Dynamic attribute values and their runtime classes.
//!
//! [`Value`] is used on both sides of the storage boundary: it holds the
//! in-memory value of an attribute as well as the raw primitive a storage
//! column accepts (usually [`Value::String`]). Coders translate between the two.

use std::collections::BTreeMap;
use std::fmt;

/// A named composite value.
///
/// Objects are how values of user-defined classes are represented. The class
/// name is part of the value's identity and survives a round-trip through
/// [`ObjectCoder`](crate::coder::ObjectCoder).
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub class: String,
    pub fields: BTreeMap<String, Value>,
}

impl Object {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }
}

/// Runtime representation of an attribute value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(Object),
}

impl Value {
    /// Build a map value from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The runtime class of this value.
    pub fn class(&self) -> ValueClass {
        match self {
            Value::Null => ValueClass::Null,
            Value::Bool(_) => ValueClass::Bool,
            Value::Integer(_) => ValueClass::Integer,
            Value::Float(_) => ValueClass::Float,
            Value::String(_) => ValueClass::String,
            Value::Array(_) => ValueClass::Array,
            Value::Map(_) => ValueClass::Map,
            Value::Object(obj) => ValueClass::Object(obj.class.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Class descriptor for a [`Value`].
///
/// Used as the expected-class constraint of a coder. [`ValueClass::Any`]
/// means "no constraint" and is never the class of an actual value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ValueClass {
    #[default]
    Any,
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Map,
    /// A named object class (see [`Object`]).
    Object(String),
}

impl ValueClass {
    pub fn object(name: impl Into<String>) -> Self {
        ValueClass::Object(name.into())
    }

    pub fn is_any(&self) -> bool {
        matches!(self, ValueClass::Any)
    }

    /// Whether `value` satisfies this class. `Any` accepts everything.
    pub fn admits(&self, value: &Value) -> bool {
        self.is_any() || *self == value.class()
    }
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueClass::Any => "Any",
            ValueClass::Null => "Null",
            ValueClass::Bool => "Bool",
            ValueClass::Integer => "Integer",
            ValueClass::Float => "Float",
            ValueClass::String => "String",
            ValueClass::Array => "Array",
            ValueClass::Map => "Map",
            ValueClass::Object(name) => name,
        };
        f.write_str(name)
    }
}
