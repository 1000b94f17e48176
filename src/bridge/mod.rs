//! Event bridge
//!
//! Observes actions after the rest of the pipeline has handled them and
//! forwards a normalized subset to the host as `(name, data)` events.

use eyre::Result;
use std::rc::Rc;

use crate::action::{Action, ActionKind, ConferenceAction, ConferenceFailed, ConfigLoadFailed};
use crate::conference::conference_url;
use crate::event::{DataValue, EventData, OutboundEvent};
use crate::host::HostDispatch;
use crate::mount::{Destination, DestinationResolver};
use crate::pipeline::{Middleware, Next};

pub mod sanitize;

pub use sanitize::{sanitize_fields, to_error_string};

/// What the bridge did with an action
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Not a bridged kind
    Ignored,
    /// Recoverable conference failure, kept local
    Filtered,
    /// Translated, but no host surface to send it to
    Dropped(OutboundEvent, Destination),
    Sent(OutboundEvent, String),
}

pub struct EventBridge {
    resolver: Rc<dyn DestinationResolver>,
    host: Rc<dyn HostDispatch>,
}

impl EventBridge {
    pub fn new(resolver: Rc<dyn DestinationResolver>, host: Rc<dyn HostDispatch>) -> Self {
        Self { resolver, host }
    }

    /// Translate and emit one action that has already been handled
    pub fn observe(&self, action: &Action) -> Result<Outcome> {
        if let Action::ConferenceFailed(failed) = action
            && failed.recoverable
        {
            return Ok(Outcome::Filtered);
        }

        match translate(action) {
            Some(event) => self.emit(event),
            None => Ok(Outcome::Ignored),
        }
    }

    /// Send an event to the mounted surface, if there is exactly one with a scope
    pub fn emit(&self, event: OutboundEvent) -> Result<Outcome> {
        match self.resolver.resolve() {
            Destination::Scope(scope) => {
                log::debug!("Sending {} to scope {}", event.name, scope);
                self.host.send(&event.name, &event.data, &scope)?;
                Ok(Outcome::Sent(event, scope))
            }
            other => Ok(Outcome::Dropped(event, other)),
        }
    }
}

impl Middleware for EventBridge {
    fn handle(&self, action: Action, next: Next<'_>) -> Result<Action> {
        let action = next.run(action)?;
        self.observe(&action)?;
        Ok(action)
    }
}

/// Event an action translates to, `None` for ignored and recoverable ones
pub fn translate(action: &Action) -> Option<OutboundEvent> {
    match action {
        Action::ConferenceFailed(failed) if failed.recoverable => None,
        Action::ConferenceFailed(failed) => Some(conference_failed_event(failed)),
        Action::ConferenceJoined(conference)
        | Action::ConferenceLeft(conference)
        | Action::ConferenceWillJoin(conference)
        | Action::ConferenceWillLeave(conference) => {
            let kind = action.kind()?;
            Some(conference_event(kind, conference))
        }
        Action::ConfigLoadFailed(failed) => Some(config_load_failed_event(failed)),
        Action::SurfaceMounted { .. } | Action::SurfaceUnmounted { .. } | Action::Other { .. } => None,
    }
}

fn conference_event(kind: ActionKind, action: &ConferenceAction) -> OutboundEvent {
    let mut data = sanitize_fields(&action.fields);
    if let Some(conference) = &action.conference {
        data.insert("url".to_string(), DataValue::from(conference_url(conference.as_ref())));
    }
    OutboundEvent::new(kind.label(), data)
}

fn conference_failed_event(failed: &ConferenceFailed) -> OutboundEvent {
    let mut data = sanitize_fields(&failed.fields);
    if let Some(conference) = &failed.conference {
        data.insert("url".to_string(), DataValue::from(conference_url(conference.as_ref())));
    }
    data.insert("recoverable".to_string(), DataValue::Bool(failed.recoverable));
    data.insert("error".to_string(), DataValue::from(to_error_string(&failed.error)));
    OutboundEvent::new(ActionKind::ConferenceFailed.label(), data)
}

fn config_load_failed_event(failed: &ConfigLoadFailed) -> OutboundEvent {
    let mut data = EventData::new();
    data.insert("error".to_string(), DataValue::from(to_error_string(&failed.error)));
    if let Some(location) = &failed.location_url {
        data.insert("url".to_string(), DataValue::from(location.to_url_string()));
    }
    OutboundEvent::new(failed.kind.label(), data)
}
