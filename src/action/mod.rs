//! Actions dispatched through the pipeline
//!
//! An action is one internal state transition. Conference lifecycle and config
//! load actions are what the bridge translates; surface actions feed the
//! store's mount state; anything else is carried as `Other` and ignored.

use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::conference::{ConferenceHandle, LocationUrl};

pub mod tag;
pub mod wire;

pub use tag::{ActionKind, ConfigFailureKind};

/// Extra fields carried by an action, passed through to the host
pub type Fields = IndexMap<String, serde_json::Value>;

/// An error value attached to a failure action
#[derive(Clone, Default)]
pub enum ErrorValue {
    #[default]
    Empty,
    Text(String),
    Structured {
        name: Option<String>,
        message: Option<String>,
    },
    /// Error raised in-process; the wire decoder never produces one
    #[allow(dead_code)]
    Native(Arc<dyn std::error::Error + Send + Sync>),
}

impl ErrorValue {
    #[cfg(test)]
    pub fn native<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ErrorValue::Native(Arc::new(err))
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorValue::Empty => write!(f, "Empty"),
            ErrorValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            ErrorValue::Structured { name, message } => f
                .debug_struct("Structured")
                .field("name", name)
                .field("message", message)
                .finish(),
            ErrorValue::Native(e) => f.debug_tuple("Native").field(&e.to_string()).finish(),
        }
    }
}

impl From<&str> for ErrorValue {
    fn from(s: &str) -> Self {
        ErrorValue::Text(s.to_string())
    }
}

/// A conference lifecycle action (will join, joined, will leave, left)
#[derive(Debug, Clone, Default)]
pub struct ConferenceAction {
    pub conference: Option<Rc<dyn ConferenceHandle>>,
    pub fields: Fields,
}

/// A conference failure
#[derive(Debug, Clone, Default)]
pub struct ConferenceFailed {
    pub conference: Option<Rc<dyn ConferenceHandle>>,
    pub error: ErrorValue,
    pub recoverable: bool,
    pub fields: Fields,
}

/// A configuration load failure
#[derive(Debug, Clone)]
pub struct ConfigLoadFailed {
    pub error: ErrorValue,
    pub location_url: Option<LocationUrl>,
    pub kind: ConfigFailureKind,
}

#[derive(Debug, Clone)]
pub enum Action {
    ConferenceWillJoin(ConferenceAction),
    ConferenceJoined(ConferenceAction),
    ConferenceWillLeave(ConferenceAction),
    ConferenceLeft(ConferenceAction),
    ConferenceFailed(ConferenceFailed),
    ConfigLoadFailed(ConfigLoadFailed),
    SurfaceMounted { surface: String, scope: Option<String> },
    SurfaceUnmounted { surface: String },
    Other { kind: String, fields: Fields },
}

impl Action {
    /// Kind of this action, `None` for unrecognized kinds
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Action::ConferenceWillJoin(_) => Some(ActionKind::ConferenceWillJoin),
            Action::ConferenceJoined(_) => Some(ActionKind::ConferenceJoined),
            Action::ConferenceWillLeave(_) => Some(ActionKind::ConferenceWillLeave),
            Action::ConferenceLeft(_) => Some(ActionKind::ConferenceLeft),
            Action::ConferenceFailed(_) => Some(ActionKind::ConferenceFailed),
            Action::ConfigLoadFailed(_) => Some(ActionKind::ConfigLoadFailed),
            Action::SurfaceMounted { .. } => Some(ActionKind::SurfaceMounted),
            Action::SurfaceUnmounted { .. } => Some(ActionKind::SurfaceUnmounted),
            Action::Other { .. } => None,
        }
    }

    /// Label of this action's kind, or the raw kind string for `Other`
    pub fn label(&self) -> &str {
        match self {
            Action::Other { kind, .. } => kind.as_str(),
            _ => self.kind().map(ActionKind::label).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_label() {
        let action = Action::ConferenceJoined(ConferenceAction::default());
        assert_eq!(action.label(), "conference.joined");
        assert_eq!(action.kind(), Some(ActionKind::ConferenceJoined));
    }

    #[test]
    fn test_other_action_label() {
        let action = Action::Other {
            kind: "audio.muted".to_string(),
            fields: Fields::new(),
        };
        assert_eq!(action.label(), "audio.muted");
        assert!(action.kind().is_none());
    }

    #[test]
    fn test_native_error_debug() {
        let err = ErrorValue::native(std::io::Error::other("socket closed"));
        assert!(format!("{:?}", err).contains("socket closed"));
    }
}
