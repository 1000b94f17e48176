//! Decoding actions from JSON lines
//!
//! Each line is an object whose `type` names the action kind. Fields the kind
//! understands are lifted out; everything else is kept as a pass-through
//! field, minus the excluded keys.

use eyre::{Context, Result, bail, eyre};
use serde_json::{Map, Value};
use std::rc::Rc;
use url::Url;

use super::{
    Action, ActionKind, ConferenceAction, ConferenceFailed, ConfigFailureKind, ConfigLoadFailed, ErrorValue, Fields,
};
use crate::conference::{ConferenceHandle, LocationUrl, UrlConference};

/// Keys never passed through to emitted data
pub const EXCLUDED_FIELDS: &[&str] = &["conference", "kind", "type", "error"];

/// Decode a single JSON line into an action
pub fn decode(line: &str) -> Result<Action> {
    let value: Value = serde_json::from_str(line).context("Failed to parse action JSON")?;
    decode_value(value)
}

pub fn decode_value(value: Value) -> Result<Action> {
    let Value::Object(mut object) = value else {
        bail!("Action must be a JSON object");
    };

    let label = match object.shift_remove("type") {
        Some(Value::String(s)) => s,
        Some(other) => bail!("Action type must be a string, got {}", other),
        None => bail!("Action is missing a type"),
    };

    let Some(kind) = ActionKind::from_label(&label) else {
        return Ok(Action::Other {
            kind: label,
            fields: pass_through(object),
        });
    };

    let action = match kind {
        ActionKind::ConferenceWillJoin => Action::ConferenceWillJoin(conference_action(object)?),
        ActionKind::ConferenceJoined => Action::ConferenceJoined(conference_action(object)?),
        ActionKind::ConferenceWillLeave => Action::ConferenceWillLeave(conference_action(object)?),
        ActionKind::ConferenceLeft => Action::ConferenceLeft(conference_action(object)?),
        ActionKind::ConferenceFailed => {
            let conference = take_conference(&mut object)?;
            let error = take_error(&mut object);
            let recoverable = object.shift_remove("recoverable").as_ref().is_some_and(is_truthy);
            Action::ConferenceFailed(ConferenceFailed {
                conference,
                error,
                recoverable,
                fields: pass_through(object),
            })
        }
        ActionKind::ConfigLoadFailed => {
            let error = take_error(&mut object);
            let location_url = object.shift_remove("locationURL").map(location_url).transpose()?;
            let kind = match object.shift_remove("kind") {
                Some(Value::String(s)) => ConfigFailureKind::from_label(&s)
                    .ok_or_else(|| eyre!("Unknown config failure kind: {}", s))?,
                _ => bail!("Config load failure is missing its kind"),
            };
            Action::ConfigLoadFailed(ConfigLoadFailed {
                error,
                location_url,
                kind,
            })
        }
        ActionKind::SurfaceMounted => Action::SurfaceMounted {
            surface: take_surface(&mut object)?,
            scope: object.shift_remove("scope").and_then(|v| v.as_str().map(str::to_string)),
        },
        ActionKind::SurfaceUnmounted => Action::SurfaceUnmounted {
            surface: take_surface(&mut object)?,
        },
    };

    Ok(action)
}

fn conference_action(mut object: Map<String, Value>) -> Result<ConferenceAction> {
    Ok(ConferenceAction {
        conference: take_conference(&mut object)?,
        fields: pass_through(object),
    })
}

fn take_conference(object: &mut Map<String, Value>) -> Result<Option<Rc<dyn ConferenceHandle>>> {
    let url = match object.shift_remove("conference") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s,
        Some(Value::Object(mut conference)) => match conference.shift_remove("url") {
            Some(Value::String(s)) => s,
            _ => bail!("Conference is missing its url"),
        },
        Some(other) => bail!("Unsupported conference value: {}", other),
    };

    let url = Url::parse(&url).with_context(|| format!("Invalid conference URL: {}", url))?;
    Ok(Some(Rc::new(UrlConference::new(url))))
}

fn take_error(object: &mut Map<String, Value>) -> ErrorValue {
    match object.shift_remove("error") {
        None => ErrorValue::Empty,
        Some(value) if !is_truthy(&value) => ErrorValue::Empty,
        Some(Value::String(s)) => ErrorValue::Text(s),
        Some(Value::Object(error)) => ErrorValue::Structured {
            name: error_part(&error, "name"),
            message: error_part(&error, "message"),
        },
        Some(Value::Array(_)) => ErrorValue::Structured {
            name: None,
            message: None,
        },
        Some(other) => ErrorValue::Text(other.to_string()),
    }
}

/// Textual form of an error's `name` or `message`; non-primitives are skipped
fn error_part(error: &Map<String, Value>, key: &str) -> Option<String> {
    match error.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn take_surface(object: &mut Map<String, Value>) -> Result<String> {
    match object.shift_remove("surface") {
        Some(Value::String(s)) => Ok(s),
        None => Ok("main".to_string()),
        Some(other) => bail!("Surface id must be a string, got {}", other),
    }
}

fn location_url(value: Value) -> Result<LocationUrl> {
    match value {
        Value::String(s) => Ok(LocationUrl::Text(s)),
        Value::Object(parts) => {
            if let Some(href) = parts.get("href").and_then(Value::as_str) {
                return Ok(LocationUrl::Text(href.to_string()));
            }
            let part = |key: &str| parts.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
            Ok(LocationUrl::Parts {
                protocol: part("protocol"),
                host: part("host"),
                pathname: part("pathname"),
                search: part("search"),
                hash: part("hash"),
            })
        }
        other => bail!("Unsupported locationURL value: {}", other),
    }
}

fn pass_through(object: Map<String, Value>) -> Fields {
    object
        .into_iter()
        .filter(|(key, _)| !EXCLUDED_FIELDS.contains(&key.as_str()))
        .collect()
}

/// Truthiness of a loosely-typed flag
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::sanitize::to_error_string;
    use serde_json::json;

    #[test]
    fn test_decode_conference_joined() {
        let action = decode(r#"{"type":"conference.joined","conference":{"url":"https://example.com/room"},"isModerator":true}"#)
            .unwrap();
        let Action::ConferenceJoined(joined) = action else {
            panic!("expected ConferenceJoined");
        };
        let conference = joined.conference.expect("conference");
        assert_eq!(conference.canonical_url().as_str(), "https://example.com/room");
        assert_eq!(joined.fields.get("isModerator"), Some(&json!(true)));
    }

    #[test]
    fn test_decode_legacy_sigil_type() {
        let action = decode(r#"{"type":"@@conference.left"}"#).unwrap();
        assert!(matches!(action, Action::ConferenceLeft(_)));
    }

    #[test]
    fn test_decode_unknown_type_is_other() {
        let action = decode(r#"{"type":"audio.muted","muted":true}"#).unwrap();
        match action {
            Action::Other { kind, fields } => {
                assert_eq!(kind, "audio.muted");
                assert_eq!(fields.get("muted"), Some(&json!(true)));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_decode_missing_type_fails() {
        assert!(decode(r#"{"conference":null}"#).is_err());
        assert!(decode("[1,2]").is_err());
        assert!(decode("not json").is_err());
    }

    #[test]
    fn test_decode_conference_failed() {
        let action = decode_value(json!({
            "type": "conference.failed",
            "error": {"name": "conference.authenticationRequired", "message": "auth", "stack": "..."},
            "recoverable": 1,
            "kind": "leaked",
            "attempt": 2
        }))
        .unwrap();
        let Action::ConferenceFailed(failed) = action else {
            panic!("expected ConferenceFailed");
        };
        assert!(failed.recoverable);
        assert!(failed.conference.is_none());
        assert!(matches!(failed.error, ErrorValue::Structured { .. }));
        assert_eq!(failed.fields.len(), 1);
        assert_eq!(failed.fields.get("attempt"), Some(&json!(2)));
    }

    #[test]
    fn test_decode_config_load_failed() {
        let action = decode_value(json!({
            "type": "config.load.failed",
            "error": "network down",
            "locationURL": "http://cfg/x.json",
            "kind": "@@config.fetch.error"
        }))
        .unwrap();
        let Action::ConfigLoadFailed(failed) = action else {
            panic!("expected ConfigLoadFailed");
        };
        assert_eq!(failed.kind, ConfigFailureKind::FetchError);
        assert_eq!(failed.location_url, Some(LocationUrl::Text("http://cfg/x.json".to_string())));
    }

    #[test]
    fn test_decode_config_load_failed_unknown_kind() {
        let result = decode_value(json!({"type": "config.load.failed", "kind": "config.exploded"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_structured_location() {
        let action = decode_value(json!({
            "type": "config.load.failed",
            "locationURL": {"protocol": "https:", "host": "cfg", "pathname": "/x.json"},
            "kind": "config.not_found"
        }))
        .unwrap();
        let Action::ConfigLoadFailed(failed) = action else {
            panic!("expected ConfigLoadFailed");
        };
        assert_eq!(failed.location_url.unwrap().to_url_string(), "https://cfg/x.json");
    }

    #[test]
    fn test_decode_surface_mounted_defaults_id() {
        let action = decode(r#"{"type":"surface.mounted","scope":"room1"}"#).unwrap();
        match action {
            Action::SurfaceMounted { surface, scope } => {
                assert_eq!(surface, "main");
                assert_eq!(scope.as_deref(), Some("room1"));
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_decode_invalid_conference_url() {
        assert!(decode(r#"{"type":"conference.joined","conference":{"url":"not a url"}}"#).is_err());
    }

    #[test]
    fn test_falsy_error_is_empty() {
        for error in [json!(false), json!(0), json!(""), json!(null)] {
            let action = decode_value(json!({"type": "conference.failed", "error": error})).unwrap();
            let Action::ConferenceFailed(failed) = action else {
                panic!("expected ConferenceFailed");
            };
            assert!(matches!(failed.error, ErrorValue::Empty), "error {} should be empty", error);
        }
    }

    #[test]
    fn test_truthy_scalar_error_is_text() {
        let action = decode_value(json!({"type": "conference.failed", "error": 503})).unwrap();
        let Action::ConferenceFailed(failed) = action else {
            panic!("expected ConferenceFailed");
        };
        assert!(matches!(failed.error, ErrorValue::Text(ref s) if s == "503"));
    }

    #[test]
    fn test_structured_error_keeps_scalar_parts() {
        let action = decode_value(json!({
            "type": "conference.failed",
            "error": {"name": "X", "message": 42}
        }))
        .unwrap();
        let Action::ConferenceFailed(failed) = action else {
            panic!("expected ConferenceFailed");
        };
        assert_eq!(to_error_string(&failed.error), "X: 42");
        match failed.error {
            ErrorValue::Structured { name, message } => {
                assert_eq!(name.as_deref(), Some("X"));
                assert_eq!(message.as_deref(), Some("42"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!({})));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
    }
}
