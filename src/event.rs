//! Outbound events sent to the host

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A primitive value that is safe to send across the host boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl DataValue {
    /// Convert a JSON value, `None` for null and non-primitive values
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(DataValue::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(DataValue::Integer)
                .or_else(|| n.as_f64().map(DataValue::Float)),
            Value::String(s) => Some(DataValue::Text(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    #[cfg(test)]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(x) => write!(f, "{}", x),
            DataValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

/// Ordered event payload
pub type EventData = IndexMap<String, DataValue>;

/// A named event ready for the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEvent {
    pub name: String,
    pub data: EventData,
}

impl OutboundEvent {
    pub fn new(name: impl Into<String>, data: EventData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_primitives() {
        assert_eq!(DataValue::from_json(&json!(true)), Some(DataValue::Bool(true)));
        assert_eq!(DataValue::from_json(&json!(3)), Some(DataValue::Integer(3)));
        assert_eq!(DataValue::from_json(&json!(1.5)), Some(DataValue::Float(1.5)));
        assert_eq!(DataValue::from_json(&json!("x")), Some(DataValue::from("x")));
    }

    #[test]
    fn test_from_json_drops_non_primitives() {
        assert_eq!(DataValue::from_json(&json!(null)), None);
        assert_eq!(DataValue::from_json(&json!([1])), None);
        assert_eq!(DataValue::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_event_serializes_flat() {
        let mut data = EventData::new();
        data.insert("url".to_string(), DataValue::from("https://example.com/room"));
        data.insert("attempt".to_string(), DataValue::Integer(2));
        let event = OutboundEvent::new("conference.joined", data);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            json!({"name": "conference.joined", "data": {"url": "https://example.com/room", "attempt": 2}})
        );
    }
}
