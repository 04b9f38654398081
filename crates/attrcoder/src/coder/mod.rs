//! # Coders
//!
//! A coder is the strategy that turns an in-memory [`Value`] into the
//! primitive a storage column holds, and back. The serialized attribute
//! wrapper delegates all object-level encoding to its coder.
//!
//! | Coder | Format | Class identity | Expected class |
//! |-------|--------|----------------|----------------|
//! | [`ObjectCoder`] | YAML | kept (tagged mappings) | optional |
//! | [`JsonCoder`] | JSON | dropped | none |
//!
//! Any type implementing [`Coder`] can be plugged in through
//! [`CoderSpec::Coder`].

mod json;
mod yaml;

pub use json::JsonCoder;
pub use yaml::ObjectCoder;

use crate::error::Result;
use crate::value::{Value, ValueClass};
use std::fmt;
use std::sync::Arc;

/// Encode/decode strategy for a single attribute.
pub trait Coder: fmt::Debug + Send + Sync {
    /// Encode an in-memory value into its storable primitive.
    ///
    /// Must accept [`Value::Null`] and return the format's own null
    /// representation.
    fn dump(&self, value: &Value) -> Result<Value>;

    /// Decode a storable primitive back into an in-memory value.
    fn load(&self, raw: &Value) -> Result<Value>;
}

/// The second argument of [`serialize`](crate::RecordTypeBuilder::serialize):
/// either a ready-made coder or the class a default coder should enforce.
#[derive(Debug, Clone)]
pub enum CoderSpec {
    /// Use this coder as is.
    Coder(Arc<dyn Coder>),
    /// Build an [`ObjectCoder`] expecting this class.
    Class(ValueClass),
}

impl CoderSpec {
    pub fn coder(coder: impl Coder + 'static) -> Self {
        CoderSpec::Coder(Arc::new(coder))
    }
}

impl Default for CoderSpec {
    fn default() -> Self {
        CoderSpec::Class(ValueClass::Any)
    }
}

impl From<ValueClass> for CoderSpec {
    fn from(class: ValueClass) -> Self {
        CoderSpec::Class(class)
    }
}

impl From<Arc<dyn Coder>> for CoderSpec {
    fn from(coder: Arc<dyn Coder>) -> Self {
        CoderSpec::Coder(coder)
    }
}

/// Null and empty text both mean "nothing stored".
pub(crate) fn is_blank(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
