//! Typed attribute values attached to entity states.

use serde::{Deserialize, Serialize};

/// A single attribute value as reported by the backend.
///
/// Untagged so backend JSON maps onto it without wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Json(serde_json::Value),
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_backend_position_as_int() {
        let val: AttributeValue = serde_json::from_str("100").unwrap();
        assert_eq!(val, AttributeValue::Int(100));
    }

    #[test]
    fn should_parse_hvac_mode_as_string() {
        let val: AttributeValue = serde_json::from_str("\"heat\"").unwrap();
        assert_eq!(val.to_string(), "heat");
    }

    #[test]
    fn should_keep_nested_objects_as_json() {
        let val: AttributeValue = serde_json::from_str(r#"{"r": 255}"#).unwrap();
        assert!(matches!(val, AttributeValue::Json(_)));
    }
}
