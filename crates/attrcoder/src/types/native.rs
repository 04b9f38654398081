use super::AttributeType;
use crate::error::{AttrError, Result};
use crate::value::Value;

/// Text column.
///
/// Scalars are stored as their textual form; composite values cannot be
/// stored and are rejected, which is why composite attributes go through a
/// [`SerializedType`](super::SerializedType) first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextType {
    default: Option<String>,
    limit: Option<usize>,
}

impl TextType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Maximum length in characters.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Scalars become their textual form; anything else is left as is.
fn to_text(value: &Value) -> Value {
    match value {
        Value::Bool(b) => Value::String(b.to_string()),
        Value::Integer(i) => Value::String(i.to_string()),
        Value::Float(f) => Value::String(f.to_string()),
        other => other.clone(),
    }
}

impl AttributeType for TextType {
    fn name(&self) -> &'static str {
        "text"
    }

    fn cast_for_database(&self, value: &Value) -> Result<Value> {
        self.validate_primitive(value)?;
        Ok(to_text(value))
    }

    /// Stored data is only normalized; limits apply to writes.
    fn cast_from_database(&self, raw: &Value) -> Result<Value> {
        Ok(to_text(raw))
    }

    fn default_value(&self) -> Value {
        self.default.clone().into()
    }

    fn validate_primitive(&self, raw: &Value) -> Result<()> {
        match raw {
            Value::Array(_) | Value::Map(_) | Value::Object(_) => Err(AttrError::InvalidValue {
                type_name: "text",
                message: format!("cannot store a {} value", raw.class()),
            }),
            Value::String(s) => match self.limit {
                Some(limit) if s.chars().count() > limit => Err(AttrError::InvalidValue {
                    type_name: "text",
                    message: format!("{} characters exceeds limit of {}", s.chars().count(), limit),
                }),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

/// Identity type: values cross the storage boundary unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueType;

impl AttributeType for ValueType {
    fn name(&self) -> &'static str {
        "value"
    }

    fn cast_for_database(&self, value: &Value) -> Result<Value> {
        Ok(value.clone())
    }

    fn cast_from_database(&self, raw: &Value) -> Result<Value> {
        Ok(raw.clone())
    }
}
