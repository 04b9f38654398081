use crate::coder::Coder;
use crate::error::{AttrError, Result};
use crate::types::AttributeType;
use crate::value::Value;
use std::sync::Arc;

/// Coder that prefixes strings on dump and strips the prefix on load.
/// Makes the order in which nested layers run visible.
#[derive(Debug, Clone)]
pub struct PrefixCoder {
    prefix: String,
}

impl PrefixCoder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Coder for PrefixCoder {
    fn dump(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::String(s) => Ok(Value::String(format!("{}{}", self.prefix, s))),
            other => Err(AttrError::encode("prefix", format!("{:?}", other))),
        }
    }

    fn load(&self, raw: &Value) -> Result<Value> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::String(s) => s
                .strip_prefix(&self.prefix)
                .map(Value::from)
                .ok_or_else(|| AttrError::decode("prefix", format!("missing `{}`", self.prefix))),
            other => Err(AttrError::decode("prefix", format!("{:?}", other))),
        }
    }
}

/// Decoration that upper-cases strings on the way to the database.
#[derive(Debug)]
pub struct Shouting(pub Arc<dyn AttributeType>);

impl AttributeType for Shouting {
    fn name(&self) -> &'static str {
        "shouting"
    }

    fn cast_for_database(&self, value: &Value) -> Result<Value> {
        match value {
            Value::String(s) => self.0.cast_for_database(&Value::from(s.to_uppercase())),
            other => self.0.cast_for_database(other),
        }
    }

    fn cast_from_database(&self, raw: &Value) -> Result<Value> {
        self.0.cast_from_database(raw)
    }
}
