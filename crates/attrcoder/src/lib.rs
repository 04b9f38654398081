//! # attrcoder
//!
//! Transparent serialization of single record attributes. A record type can
//! declare that an attribute is persisted through a [`Coder`] instead of its
//! native storage type; every read and write of that attribute then goes
//! through the coder.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Record types (record_type.rs, record.rs)                   │
//! │  - RecordTypeBuilder::serialize: the registration entry     │
//! │  - Frozen RecordType, Record with change tracking           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Attribute types (types/)                                   │
//! │  - SerializedType: decorates an inner type with a coder     │
//! │  - TextType / ValueType: native storage casting             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Coders (coder/)                                            │
//! │  - ObjectCoder: YAML, keeps class identity, expected class  │
//! │  - JsonCoder: plain JSON                                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use attrcoder::{CoderSpec, RecordTypeBuilder, Row, TextType, Value, ValueClass};
//!
//! let users = RecordTypeBuilder::new("User")
//!     .attribute("preferences", TextType::new())
//!     .attribute("data", TextType::new())
//!     .serialize("preferences", CoderSpec::default())
//!     .serialize("data", ValueClass::Map)
//!     .build();
//!
//! let mut user = users.new_record();
//! user.set("preferences", Value::map([("a", 1)])).unwrap();
//! let row: Row = user.save().unwrap();
//! assert_eq!(row["preferences"], Value::from("a: 1\n"));
//!
//! let reloaded = users.load(&row).unwrap();
//! assert_eq!(reloaded.get("preferences").unwrap(), &Value::map([("a", 1)]));
//! ```
//!
//! ## Change tracking
//!
//! Serialized attributes are always reported as changed: two equal values are
//! not guaranteed to be detected as equal cheaply, so they are always written.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (registration at debug level, null
//! short-circuits at trace level) and never installs a subscriber.

pub mod coder;
pub mod config;
pub mod error;
pub mod record;
pub mod record_type;
pub mod types;
pub mod value;

#[cfg(test)]
pub(crate) mod test_utils;

use std::collections::BTreeMap;

pub use coder::{Coder, CoderSpec, JsonCoder, ObjectCoder};
pub use config::{RepeatPolicy, SerializationConfig};
pub use error::{AttrError, Result};
pub use record::Record;
pub use record_type::{RecordType, RecordTypeBuilder};
pub use types::{AttributeType, SerializedType, TextType, ValueType};
pub use value::{Object, Value, ValueClass};

/// Raw storage primitives of one record, keyed by attribute name.
pub type Row = BTreeMap<String, Value>;
