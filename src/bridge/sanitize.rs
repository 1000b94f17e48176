//! Turning action contents into host-safe values

use log::debug;

use crate::action::{ErrorValue, Fields};
use crate::event::{DataValue, EventData};

const DEFAULT_ERROR_NAME: &str = "Error";

/// Stable textual form of an error value.
///
/// Objects render as `Name: message`; their other fields are never exposed.
pub fn to_error_string(error: &ErrorValue) -> String {
    match error {
        ErrorValue::Empty => String::new(),
        ErrorValue::Text(s) => s.clone(),
        ErrorValue::Structured { name, message } => {
            render_named(name.as_deref().unwrap_or(DEFAULT_ERROR_NAME), message.as_deref().unwrap_or(""))
        }
        ErrorValue::Native(e) => render_named(DEFAULT_ERROR_NAME, &e.to_string()),
    }
}

fn render_named(name: &str, message: &str) -> String {
    match (name.is_empty(), message.is_empty()) {
        (true, _) => message.to_string(),
        (false, true) => name.to_string(),
        (false, false) => format!("{}: {}", name, message),
    }
}

/// Keep only primitive pass-through fields
pub fn sanitize_fields(fields: &Fields) -> EventData {
    let mut data = EventData::with_capacity(fields.len());
    for (key, value) in fields {
        match DataValue::from_json(value) {
            Some(v) => {
                data.insert(key.clone(), v);
            }
            None => debug!("Dropping non-primitive field '{}'", key),
        }
    }
    data
}
