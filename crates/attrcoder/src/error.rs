use crate::value::ValueClass;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttrError {
    /// The stored primitive could not be parsed by the coder's format.
    #[error("Failed to decode {format} payload: {message}")]
    Decode {
        format: &'static str,
        message: String,
    },

    /// The stored primitive parsed fine but produced a value of the wrong class.
    #[error("{}", describe_mismatch(.attribute.as_deref(), .expected, .actual))]
    TypeMismatch {
        attribute: Option<String>,
        expected: ValueClass,
        actual: ValueClass,
    },

    #[error("Failed to encode value as {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },

    #[error("Invalid value for {type_name}: {message}")]
    InvalidValue {
        type_name: &'static str,
        message: String,
    },

    #[error("Unknown attribute `{attribute}` for {record}")]
    UnknownAttribute { record: String, attribute: String },

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),
}

impl AttrError {
    pub(crate) fn decode(format: &'static str, message: impl ToString) -> Self {
        AttrError::Decode {
            format,
            message: message.to_string(),
        }
    }

    pub(crate) fn encode(format: &'static str, message: impl ToString) -> Self {
        AttrError::Encode {
            format,
            message: message.to_string(),
        }
    }

    /// True when the stored representation itself could not be parsed.
    pub fn is_decode(&self) -> bool {
        matches!(self, AttrError::Decode { .. })
    }

    /// True when decoding succeeded but the value had the wrong class.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, AttrError::TypeMismatch { .. })
    }
}

fn describe_mismatch(attribute: Option<&str>, expected: &ValueClass, actual: &ValueClass) -> String {
    let subject = match attribute {
        Some(name) => format!("`{}`", name),
        None => "value".to_string(),
    };
    format!(
        "can't load {}: was supposed to be {}, but was {}",
        subject,
        with_article(expected),
        with_article(actual)
    )
}

fn with_article(class: &ValueClass) -> String {
    let name = class.to_string();
    let article = match name.chars().next() {
        Some(c) if "AEIOUaeiou".contains(c) => "an",
        _ => "a",
    };
    format!("{} {}", article, name)
}

pub type Result<T> = std::result::Result<T, AttrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_message_names_attribute_and_classes() {
        let err = AttrError::TypeMismatch {
            attribute: Some("data".into()),
            expected: ValueClass::Map,
            actual: ValueClass::Array,
        };
        assert_eq!(
            err.to_string(),
            "can't load `data`: was supposed to be a Map, but was an Array"
        );
        assert!(err.is_type_mismatch());
        assert!(!err.is_decode());
    }

    #[test]
    fn type_mismatch_without_attribute_name() {
        let err = AttrError::TypeMismatch {
            attribute: None,
            expected: ValueClass::Object("Point".into()),
            actual: ValueClass::String,
        };
        assert_eq!(
            err.to_string(),
            "can't load value: was supposed to be a Point, but was a String"
        );

        let err = AttrError::TypeMismatch {
            attribute: None,
            expected: ValueClass::Object("Event".into()),
            actual: ValueClass::Integer,
        };
        assert_eq!(
            err.to_string(),
            "can't load value: was supposed to be an Event, but was an Integer"
        );
    }

    #[test]
    fn decode_error_is_distinguishable() {
        let err = AttrError::decode("yaml", "unexpected end of stream");
        assert!(err.is_decode());
        assert!(!err.is_type_mismatch());
        assert_eq!(
            err.to_string(),
            "Failed to decode yaml payload: unexpected end of stream"
        );
    }
}
