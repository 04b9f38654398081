//! The default coder: YAML text with class identity and an optional
//! expected-class check on load.

use super::{is_blank, Coder};
use crate::error::{AttrError, Result};
use crate::value::{Object, Value, ValueClass};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Number};
use std::collections::BTreeMap;

const FORMAT: &str = "yaml";

/// General-purpose structured coder.
///
/// Values are written as YAML. [`Object`] values become tagged mappings
/// (`!Point {x: 1}`), so their class is restored on load. When an expected
/// class other than [`ValueClass::Any`] is configured, every non-null loaded
/// value must have exactly that class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectCoder {
    expected: ValueClass,
    attribute: Option<String>,
    document_start: bool,
}

impl ObjectCoder {
    pub fn new(expected: ValueClass) -> Self {
        Self {
            expected,
            ..Default::default()
        }
    }

    /// A coder without class constraint.
    pub fn any() -> Self {
        Self::default()
    }

    /// Name the attribute this coder serves; used in type-mismatch errors.
    pub fn for_attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute = Some(name.into());
        self
    }

    /// Prefix every dump with an explicit `---` document start line.
    pub fn with_document_start(mut self, enabled: bool) -> Self {
        self.document_start = enabled;
        self
    }

    pub fn expected(&self) -> &ValueClass {
        &self.expected
    }

    fn check_class(&self, value: Value) -> Result<Value> {
        if self.expected.is_any() || value.is_null() || self.expected.admits(&value) {
            return Ok(value);
        }
        let actual = value.class();
        tracing::debug!(
            attribute = self.attribute.as_deref().unwrap_or("<unnamed>"),
            expected = %self.expected,
            actual = %actual,
            "loaded value has unexpected class"
        );
        Err(AttrError::TypeMismatch {
            attribute: self.attribute.clone(),
            expected: self.expected.clone(),
            actual,
        })
    }
}

impl Coder for ObjectCoder {
    fn dump(&self, value: &Value) -> Result<Value> {
        let yaml = to_yaml(value)?;
        let text = serde_yaml::to_string(&yaml).map_err(|e| AttrError::encode(FORMAT, e))?;
        if self.document_start {
            Ok(Value::String(format!("---\n{}", text)))
        } else {
            Ok(Value::String(text))
        }
    }

    fn load(&self, raw: &Value) -> Result<Value> {
        if is_blank(raw) {
            tracing::trace!("blank primitive, skipping yaml decode");
            return Ok(Value::Null);
        }
        let decoded = match raw {
            Value::String(text) => {
                let yaml: serde_yaml::Value =
                    serde_yaml::from_str(text).map_err(|e| AttrError::decode(FORMAT, e))?;
                from_yaml(yaml)?
            }
            // Not text: the value was never encoded by us, take it as decoded.
            other => other.clone(),
        };
        self.check_class(decoded)
    }
}

fn to_yaml(value: &Value) -> Result<serde_yaml::Value> {
    Ok(match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Integer(i) => serde_yaml::Value::Number(Number::from(*i)),
        Value::Float(f) => serde_yaml::Value::Number(Number::from(*f)),
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Array(items) => serde_yaml::Value::Sequence(
            items.iter().map(to_yaml).collect::<Result<Vec<_>>>()?,
        ),
        Value::Map(map) => serde_yaml::Value::Mapping(to_mapping(map)?),
        Value::Object(obj) => {
            check_class_name(&obj.class)?;
            serde_yaml::Value::Tagged(Box::new(TaggedValue {
                tag: Tag::new(obj.class.as_str()),
                value: serde_yaml::Value::Mapping(to_mapping(&obj.fields)?),
            }))
        }
    })
}

/// Class names become YAML tags and must read back unchanged.
fn check_class_name(class: &str) -> Result<()> {
    // `!` would merge into the tag marker, `%` starts a URI escape, and the
    // flow indicators end the tag early.
    let invalid = class.is_empty()
        || class.starts_with('!')
        || class
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '[' | ']' | '{' | '}' | '%'));
    if invalid {
        return Err(AttrError::encode(
            FORMAT,
            format!("`{}` is not a valid class name", class),
        ));
    }
    Ok(())
}

fn to_mapping(map: &BTreeMap<String, Value>) -> Result<Mapping> {
    let mut mapping = Mapping::new();
    for (key, value) in map {
        mapping.insert(serde_yaml::Value::String(key.clone()), to_yaml(value)?);
    }
    Ok(mapping)
}

fn from_yaml(yaml: serde_yaml::Value) -> Result<Value> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if n.is_f64() {
                // is_f64 guarantees as_f64 succeeds
                Value::Float(n.as_f64().unwrap_or_default())
            } else {
                return Err(AttrError::decode(
                    FORMAT,
                    format!("integer {} is out of range", n),
                ));
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => Value::Map(from_mapping(mapping)?),
        serde_yaml::Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            let tag = tag.to_string();
            let class = tag.strip_prefix('!').unwrap_or(&tag).to_string();
            match value {
                serde_yaml::Value::Mapping(mapping) => Value::Object(Object {
                    class,
                    fields: from_mapping(mapping)?,
                }),
                _ => {
                    return Err(AttrError::decode(
                        FORMAT,
                        format!("tagged value `!{}` is not a mapping", class),
                    ))
                }
            }
        }
    })
}

fn from_mapping(mapping: Mapping) -> Result<BTreeMap<String, Value>> {
    let mut map = BTreeMap::new();
    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(s) => s,
            other => {
                return Err(AttrError::decode(
                    FORMAT,
                    format!("mapping keys must be strings, found {:?}", other),
                ))
            }
        };
        map.insert(key, from_yaml(value)?);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Value {
        Object::new("Point").with_field("x", 1).with_field("y", 2).into()
    }

    #[test]
    fn dump_map_yields_yaml_text() {
        let coder = ObjectCoder::any();
        let dumped = coder.dump(&Value::map([("a", 1)])).unwrap();
        assert_eq!(dumped, Value::from("a: 1\n"));
    }

    #[test]
    fn dump_null_is_yaml_null_not_error() {
        let coder = ObjectCoder::new(ValueClass::Map);
        assert_eq!(coder.dump(&Value::Null).unwrap(), Value::from("null\n"));
    }

    #[test]
    fn round_trip_composite() {
        let coder = ObjectCoder::any();
        let value = Value::map([
            ("name", Value::from("ada")),
            ("tags", Value::from(vec!["a", "b"])),
            ("score", Value::from(2.5)),
            ("active", Value::from(true)),
            ("nothing", Value::Null),
        ]);
        let dumped = coder.dump(&value).unwrap();
        assert_eq!(coder.load(&dumped).unwrap(), value);
    }

    #[test]
    fn object_class_survives_round_trip() {
        let coder = ObjectCoder::new(ValueClass::object("Point"));
        let dumped = coder.dump(&point()).unwrap();
        assert!(dumped.as_str().unwrap().starts_with("!Point"));
        let loaded = coder.load(&dumped).unwrap();
        assert_eq!(loaded, point());
        assert_eq!(loaded.class(), ValueClass::object("Point"));
    }

    #[test]
    fn quoted_numeric_string_stays_string() {
        let coder = ObjectCoder::any();
        let value = Value::from("123");
        let dumped = coder.dump(&value).unwrap();
        assert_eq!(coder.load(&dumped).unwrap(), value);
    }

    #[test]
    fn load_null_and_empty_return_null() {
        for coder in [
            ObjectCoder::any(),
            ObjectCoder::new(ValueClass::Map),
            ObjectCoder::new(ValueClass::object("Point")),
        ] {
            assert_eq!(coder.load(&Value::Null).unwrap(), Value::Null);
            assert_eq!(coder.load(&Value::from("")).unwrap(), Value::Null);
        }
    }

    #[test]
    fn decoded_null_passes_class_check() {
        let coder = ObjectCoder::new(ValueClass::Map);
        assert_eq!(coder.load(&Value::from("null\n")).unwrap(), Value::Null);
        assert_eq!(coder.load(&Value::from("~")).unwrap(), Value::Null);
    }

    #[test]
    fn mismatched_class_fails_with_both_classes() {
        let coder = ObjectCoder::new(ValueClass::Map).for_attribute("data");
        let dumped = ObjectCoder::any().dump(&Value::from(vec![1, 2])).unwrap();
        let err = coder.load(&dumped).unwrap_err();
        match err {
            AttrError::TypeMismatch {
                attribute,
                expected,
                actual,
            } => {
                assert_eq!(attribute.as_deref(), Some("data"));
                assert_eq!(expected, ValueClass::Map);
                assert_eq!(actual, ValueClass::Array);
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn object_of_other_class_is_a_mismatch() {
        let coder = ObjectCoder::new(ValueClass::object("Line"));
        let dumped = coder.dump(&point()).unwrap();
        assert!(coder.load(&dumped).unwrap_err().is_type_mismatch());
    }

    #[test]
    fn any_never_raises_type_mismatch() {
        let coder = ObjectCoder::any();
        for value in [Value::from(1), Value::from("s"), point(), Value::from(vec![1])] {
            let dumped = coder.dump(&value).unwrap();
            assert_eq!(coder.load(&dumped).unwrap(), value);
        }
    }

    #[test]
    fn malformed_yaml_is_decode_error() {
        let coder = ObjectCoder::new(ValueClass::Map);
        let err = coder.load(&Value::from("a: [1, 2")).unwrap_err();
        assert!(err.is_decode());
        assert!(!err.is_type_mismatch());
    }

    #[test]
    fn non_string_keys_are_decode_error() {
        let err = ObjectCoder::any().load(&Value::from("1: one\n")).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn tagged_scalar_is_decode_error() {
        let err = ObjectCoder::any().load(&Value::from("!Point 3\n")).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn invalid_class_name_fails_to_encode() {
        let err = ObjectCoder::any()
            .dump(&Value::from(Object::new("")))
            .unwrap_err();
        assert!(matches!(err, AttrError::Encode { .. }));
    }

    #[test]
    fn class_names_that_cannot_be_read_back_fail_to_encode() {
        for class in ["a,b", "x]", "a{b", "!Bang", "a%21", "two words"] {
            let coder = ObjectCoder::new(ValueClass::object(class));
            let err = coder
                .dump(&Object::new(class).with_field("x", 1).into())
                .unwrap_err();
            assert!(
                matches!(err, AttrError::Encode { .. }),
                "class `{}` should be rejected, got {:?}",
                class,
                err
            );
        }
    }

    #[test]
    fn accepted_class_names_round_trip() {
        for class in ["Point", "Foo::Bar", "Café", "geo.Point"] {
            let coder = ObjectCoder::new(ValueClass::object(class));
            let value: Value = Object::new(class).with_field("x", 1).into();
            let dumped = coder.dump(&value).unwrap();
            assert_eq!(coder.load(&dumped).unwrap(), value, "class `{}`", class);
        }
    }

    #[test]
    fn load_strips_a_single_tag_marker() {
        let loaded = ObjectCoder::any()
            .load(&Value::from("!Point\nx: 1\n"))
            .unwrap();
        assert_eq!(loaded.class(), ValueClass::object("Point"));
    }

    #[test]
    fn non_text_raw_is_taken_as_decoded() {
        let coder = ObjectCoder::new(ValueClass::Integer);
        assert_eq!(coder.load(&Value::from(7)).unwrap(), Value::from(7));
        assert!(ObjectCoder::new(ValueClass::Map)
            .load(&Value::from(7))
            .unwrap_err()
            .is_type_mismatch());
    }

    #[test]
    fn document_start_prefix() {
        let coder = ObjectCoder::any().with_document_start(true);
        let dumped = coder.dump(&Value::map([("a", 1)])).unwrap();
        assert_eq!(dumped, Value::from("---\na: 1\n"));
        assert_eq!(coder.load(&dumped).unwrap(), Value::map([("a", 1)]));
    }
}
