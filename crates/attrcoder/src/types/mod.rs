//! # Attribute Types
//!
//! An attribute type knows how to move one attribute's value across the
//! storage boundary:
//!
//! ```text
//!   in-memory Value ──cast_for_database──▶ storage primitive
//!   in-memory Value ◀─cast_from_database── storage primitive
//! ```
//!
//! Native types ([`TextType`], [`ValueType`]) deal with raw primitives.
//! [`SerializedType`] decorates any other type with a [`Coder`](crate::Coder),
//! and decorations nest by plain composition.

mod native;
mod serialized;

pub use native::{TextType, ValueType};
pub use serialized::SerializedType;

use crate::error::Result;
use crate::value::Value;
use std::fmt;

/// Capability every attribute type provides.
pub trait AttributeType: fmt::Debug + Send + Sync {
    /// Short type name, used in diagnostics.
    fn name(&self) -> &'static str;

    fn cast_for_database(&self, value: &Value) -> Result<Value>;

    fn cast_from_database(&self, raw: &Value) -> Result<Value>;

    /// Value of a freshly built record.
    fn default_value(&self) -> Value {
        Value::Null
    }

    /// Check that `raw` is a primitive this type can store.
    fn validate_primitive(&self, _raw: &Value) -> Result<()> {
        Ok(())
    }

    /// Whether going from `old` to `new` must be persisted on save.
    fn changed(&self, old: &Value, new: &Value) -> bool {
        old != new
    }

    /// Downcast hook for inspecting serialization layers.
    fn as_serialized(&self) -> Option<&SerializedType> {
        None
    }
}
