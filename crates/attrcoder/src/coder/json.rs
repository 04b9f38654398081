use super::{is_blank, Coder};
use crate::error::{AttrError, Result};
use crate::value::Value;
use serde_json::{Map, Number};

const FORMAT: &str = "json";

/// Plain JSON coder.
///
/// Unlike [`ObjectCoder`](super::ObjectCoder) it keeps no class identity:
/// objects are written as plain JSON objects and come back as maps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCoder;

impl Coder for JsonCoder {
    fn dump(&self, value: &Value) -> Result<Value> {
        let json = to_json(value)?;
        let text = serde_json::to_string(&json).map_err(|e| AttrError::encode(FORMAT, e))?;
        Ok(Value::String(text))
    }

    fn load(&self, raw: &Value) -> Result<Value> {
        match raw {
            raw if is_blank(raw) => Ok(Value::Null),
            Value::String(text) => {
                let json: serde_json::Value =
                    serde_json::from_str(text).map_err(|e| AttrError::decode(FORMAT, e))?;
                Ok(from_json(json))
            }
            other => Ok(other.clone()),
        }
    }
}

fn to_json(value: &Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => match Number::from_f64(*f) {
            Some(n) => serde_json::Value::Number(n),
            None => return Err(AttrError::encode(FORMAT, format!("{} is not finite", f))),
        },
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(
            items.iter().map(to_json).collect::<Result<Vec<_>>>()?,
        ),
        Value::Map(fields) => to_json_object(fields)?,
        Value::Object(obj) => to_json_object(&obj.fields)?,
    })
}

fn to_json_object(fields: &std::collections::BTreeMap<String, Value>) -> Result<serde_json::Value> {
    let mut map = Map::new();
    for (key, value) in fields {
        map.insert(key.clone(), to_json(value)?);
    }
    Ok(serde_json::Value::Object(map))
}

fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| (k, from_json(v)))
                .collect(),
        ),
    }
}
