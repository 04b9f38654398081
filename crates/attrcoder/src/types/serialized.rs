use super::AttributeType;
use crate::coder::Coder;
use crate::error::Result;
use crate::value::Value;
use std::sync::Arc;

/// Decorates an inner type with a coder.
///
/// Writes run the coder's `dump` first and hand the result to the inner
/// type; reads let the inner type normalize the raw primitive first and then
/// run the coder's `load`. Anything else is delegated to the inner type,
/// except change detection: a serialized attribute is always considered
/// changed.
#[derive(Debug, Clone)]
pub struct SerializedType {
    inner: Arc<dyn AttributeType>,
    coder: Arc<dyn Coder>,
}

impl SerializedType {
    pub fn new(inner: Arc<dyn AttributeType>, coder: Arc<dyn Coder>) -> Self {
        Self { inner, coder }
    }

    pub fn inner(&self) -> &Arc<dyn AttributeType> {
        &self.inner
    }

    pub fn coder(&self) -> &Arc<dyn Coder> {
        &self.coder
    }
}

impl AttributeType for SerializedType {
    fn name(&self) -> &'static str {
        "serialized"
    }

    fn cast_for_database(&self, value: &Value) -> Result<Value> {
        // Null goes through dump as well; the coder decides how null is stored.
        let dumped = self.coder.dump(value)?;
        self.inner.cast_for_database(&dumped)
    }

    fn cast_from_database(&self, raw: &Value) -> Result<Value> {
        let native = self.inner.cast_from_database(raw)?;
        self.coder.load(&native)
    }

    fn default_value(&self) -> Value {
        self.inner.default_value()
    }

    fn validate_primitive(&self, raw: &Value) -> Result<()> {
        self.inner.validate_primitive(raw)
    }

    fn changed(&self, _old: &Value, _new: &Value) -> bool {
        true
    }

    fn as_serialized(&self) -> Option<&SerializedType> {
        Some(self)
    }
}
