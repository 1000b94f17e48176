//! Action dispatch pipeline
//!
//! Middleware wrap the rest of the chain: each receives the action together
//! with a [`Next`] and decides what to do before and after calling it. The
//! chain ends in the store reducer.

use eyre::Result;

use crate::action::Action;
use crate::mount::MountRegistry;

/// A pipeline observer
pub trait Middleware {
    fn handle(&self, action: Action, next: Next<'_>) -> Result<Action>;
}

/// The remainder of the chain after the current middleware
pub struct Next<'a> {
    rest: &'a [Box<dyn Middleware>],
    store: &'a Store,
}

impl Next<'_> {
    pub fn run(self, action: Action) -> Result<Action> {
        match self.rest.split_first() {
            Some((head, tail)) => head.handle(
                action,
                Next {
                    rest: tail,
                    store: self.store,
                },
            ),
            None => {
                self.store.reduce(&action);
                Ok(action)
            }
        }
    }
}

/// State updated by dispatched actions
#[derive(Debug, Clone, Default)]
pub struct Store {
    mounts: MountRegistry,
}

impl Store {
    pub fn new(mounts: MountRegistry) -> Self {
        Self { mounts }
    }

    fn reduce(&self, action: &Action) {
        match action {
            Action::SurfaceMounted { surface, scope } => self.mounts.mount(surface, scope.clone()),
            Action::SurfaceUnmounted { surface } => self.mounts.unmount(surface),
            _ => {}
        }
    }
}

pub struct Pipeline {
    middleware: Vec<Box<dyn Middleware>>,
    store: Store,
}

impl Pipeline {
    pub fn new(store: Store) -> Self {
        Self {
            middleware: Vec::new(),
            store,
        }
    }

    /// Append a middleware; earlier middleware wrap later ones
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Deliver one action through every middleware to the store
    pub fn dispatch(&self, action: Action) -> Result<Action> {
        Next {
            rest: &self.middleware,
            store: &self.store,
        }
        .run(action)
    }
}

/// Logs every action passing through
pub struct ActionLogger;

impl Middleware for ActionLogger {
    fn handle(&self, action: Action, next: Next<'_>) -> Result<Action> {
        log::debug!("Dispatching action: {}", action.label());
        log::trace!("Action: {:?}", action);
        next.run(action)
    }
}
