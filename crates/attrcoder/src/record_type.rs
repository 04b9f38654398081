//! # Record Types
//!
//! A record type is the owner of the attribute-name → attribute-type mapping.
//! The mapping is assembled on a [`RecordTypeBuilder`] during setup and frozen
//! by [`RecordTypeBuilder::build`]; a built [`RecordType`] is immutable and can
//! be shared between threads.
//!
//! ## Serialized attributes
//!
//! ```ignore
//! let users = RecordTypeBuilder::new("User")
//!     .attribute("preferences", TextType::new())
//!     .attribute("data", TextType::new())
//!     .serialize("preferences", CoderSpec::default())     // YAML, any class
//!     .serialize("data", ValueClass::Map)                  // YAML, maps only
//!     .build();
//! ```
//!
//! `serialize` resolves its second argument into a coder and replaces the
//! attribute's type with a [`SerializedType`] wrapping the previous one.

use crate::coder::{Coder, CoderSpec, ObjectCoder};
use crate::config::{RepeatPolicy, SerializationConfig};
use crate::error::{AttrError, Result};
use crate::record::Record;
use crate::types::{AttributeType, SerializedType, ValueType};
use crate::value::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Setup-phase view of a record type. All mutation happens here.
#[derive(Debug)]
pub struct RecordTypeBuilder {
    name: String,
    config: SerializationConfig,
    attributes: BTreeMap<String, Arc<dyn AttributeType>>,
    /// Type each serialized attribute had before its first `serialize`.
    pre_serialized: BTreeMap<String, Arc<dyn AttributeType>>,
}

impl RecordTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: SerializationConfig::default(),
            attributes: BTreeMap::new(),
            pre_serialized: BTreeMap::new(),
        }
    }

    pub fn with_config(mut self, config: SerializationConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare an attribute (or redeclare it with a new type).
    pub fn attribute(mut self, name: impl Into<String>, ty: impl AttributeType + 'static) -> Self {
        let name = name.into();
        self.pre_serialized.remove(&name);
        self.attributes.insert(name, Arc::new(ty));
        self
    }

    /// Replace the type of `name` with whatever `decorate` builds from it.
    ///
    /// An attribute that was never declared is decorated starting from
    /// [`ValueType`].
    pub fn decorate_attribute_type<F>(mut self, name: &str, decorate: F) -> Self
    where
        F: FnOnce(Arc<dyn AttributeType>) -> Arc<dyn AttributeType>,
    {
        let current = self
            .attributes
            .remove(name)
            .unwrap_or_else(|| Arc::new(ValueType));
        self.attributes.insert(name.to_string(), decorate(current));
        self
    }

    /// Persist `name` through a coder.
    ///
    /// `spec` is either a ready coder, or the class a default
    /// [`ObjectCoder`] should enforce on load.
    ///
    /// Under [`RepeatPolicy::Replace`] a repeated call wraps the type the
    /// attribute had before its first `serialize`. Every decoration applied
    /// since then is discarded, including ones from
    /// [`decorate_attribute_type`](Self::decorate_attribute_type).
    pub fn serialize(self, name: &str, spec: impl Into<CoderSpec>) -> Self {
        let coder: Arc<dyn Coder> = match spec.into() {
            CoderSpec::Coder(coder) => coder,
            CoderSpec::Class(class) => Arc::new(
                ObjectCoder::new(class)
                    .for_attribute(name)
                    .with_document_start(self.config.document_start),
            ),
        };
        tracing::debug!(
            record = %self.name,
            attribute = name,
            coder = ?coder,
            "serializing attribute"
        );
        self.wrap_serialized(name, coder)
    }

    fn wrap_serialized(mut self, name: &str, coder: Arc<dyn Coder>) -> Self {
        if let Some(original) = self.pre_serialized.get(name) {
            match self.config.repeat_policy {
                RepeatPolicy::Nest => {
                    tracing::debug!(attribute = name, "attribute already serialized, nesting coder");
                }
                RepeatPolicy::Replace => {
                    tracing::debug!(attribute = name, "attribute already serialized, replacing coder");
                    let decorated = self
                        .attributes
                        .get(name)
                        .is_some_and(|ty| ty.as_serialized().is_none());
                    if decorated {
                        tracing::warn!(
                            attribute = name,
                            "replacing coder drops decorations added since the first serialize"
                        );
                    }
                    let original = Arc::clone(original);
                    self.attributes.insert(
                        name.to_string(),
                        Arc::new(SerializedType::new(original, coder)),
                    );
                    return self;
                }
            }
        }

        let mut original = None;
        let builder = self.decorate_attribute_type(name, |inner| {
            original = Some(Arc::clone(&inner));
            let wrapped: Arc<dyn AttributeType> = Arc::new(SerializedType::new(inner, coder));
            wrapped
        });
        builder.remember_original(name, original)
    }

    fn remember_original(mut self, name: &str, original: Option<Arc<dyn AttributeType>>) -> Self {
        if let Some(original) = original {
            self.pre_serialized.entry(name.to_string()).or_insert(original);
        }
        self
    }

    pub fn build(self) -> Arc<RecordType> {
        Arc::new(RecordType {
            name: self.name,
            attributes: self.attributes,
        })
    }
}

/// Frozen record type definition.
#[derive(Debug)]
pub struct RecordType {
    name: String,
    attributes: BTreeMap<String, Arc<dyn AttributeType>>,
}

impl RecordType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute_type(&self, name: &str) -> Option<&Arc<dyn AttributeType>> {
        self.attributes.get(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub(crate) fn attributes(&self) -> impl Iterator<Item = (&str, &Arc<dyn AttributeType>)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn require(&self, name: &str) -> Result<&Arc<dyn AttributeType>> {
        self.attributes
            .get(name)
            .ok_or_else(|| AttrError::UnknownAttribute {
                record: self.name.clone(),
                attribute: name.to_string(),
            })
    }

    /// A new record holding every attribute's default value.
    pub fn new_record(self: &Arc<Self>) -> Record {
        let values = self
            .attributes()
            .map(|(name, ty)| (name.to_string(), ty.default_value()))
            .collect::<BTreeMap<_, Value>>();
        Record::new(Arc::clone(self), values)
    }

    /// Read a stored row. Columns missing from the row take the type default.
    pub fn load(self: &Arc<Self>, row: &crate::Row) -> Result<Record> {
        let mut values = BTreeMap::new();
        for (name, ty) in self.attributes() {
            let value = match row.get(name) {
                Some(raw) => ty.cast_from_database(raw)?,
                None => ty.default_value(),
            };
            values.insert(name.to_string(), value);
        }
        Ok(Record::loaded(Arc::clone(self), values))
    }
}
