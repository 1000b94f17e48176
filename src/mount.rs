//! Host surface mount state and destination resolution

use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Where an event should go, resolved at send time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Destination {
    Scope(String),
    /// No host surface is mounted
    Unmounted,
    /// More than one surface is mounted, so none is addressable
    Ambiguous(usize),
    /// The mounted surface has no scope configured
    Unscoped,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Scope(scope) => write!(f, "scope {}", scope),
            Destination::Unmounted => write!(f, "no surface mounted"),
            Destination::Ambiguous(n) => write!(f, "{} surfaces mounted", n),
            Destination::Unscoped => write!(f, "surface has no scope"),
        }
    }
}

pub trait DestinationResolver {
    fn resolve(&self) -> Destination;
}

/// A mounted host surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountedSurface {
    pub id: String,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MountState {
    surfaces: Vec<MountedSurface>,
}

impl MountState {
    /// Mount a surface, replacing any surface with the same id
    pub fn mount(&mut self, id: &str, scope: Option<String>) {
        self.unmount(id);
        self.surfaces.push(MountedSurface {
            id: id.to_string(),
            scope,
        });
    }

    pub fn unmount(&mut self, id: &str) -> bool {
        let before = self.surfaces.len();
        self.surfaces.retain(|s| s.id != id);
        self.surfaces.len() != before
    }

    pub fn destination(&self) -> Destination {
        match self.surfaces.as_slice() {
            [] => Destination::Unmounted,
            [surface] => match surface.scope.as_deref() {
                Some(scope) if !scope.is_empty() => Destination::Scope(scope.to_string()),
                _ => Destination::Unscoped,
            },
            many => Destination::Ambiguous(many.len()),
        }
    }
}

/// Shared handle onto the process mount state
#[derive(Debug, Clone, Default)]
pub struct MountRegistry {
    state: Rc<RefCell<MountState>>,
}

impl MountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&self, id: &str, scope: Option<String>) {
        log::debug!("Mounting surface '{}' (scope: {:?})", id, scope);
        self.state.borrow_mut().mount(id, scope);
    }

    pub fn unmount(&self, id: &str) {
        if self.state.borrow_mut().unmount(id) {
            log::debug!("Unmounted surface '{}'", id);
        }
    }
}

impl DestinationResolver for MountRegistry {
    fn resolve(&self) -> Destination {
        self.state.borrow().destination()
    }
}

/// Resolver that always answers the same destination
#[derive(Debug, Clone)]
pub struct FixedDestination(pub Destination);

impl DestinationResolver for FixedDestination {
    fn resolve(&self) -> Destination {
        self.0.clone()
    }
}
