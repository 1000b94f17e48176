//! In-memory host used by tests

use eyre::Result;
use std::cell::RefCell;

use super::HostDispatch;
use crate::event::{EventData, OutboundEvent};

/// Host that keeps every send in memory
#[derive(Debug, Default)]
pub struct RecordingHost {
    sent: RefCell<Vec<(OutboundEvent, String)>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events sent so far, with their scope
    pub fn sent(&self) -> Vec<(OutboundEvent, String)> {
        self.sent.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.borrow().is_empty()
    }
}

impl HostDispatch for RecordingHost {
    fn send(&self, name: &str, data: &EventData, scope: &str) -> Result<()> {
        self.sent
            .borrow_mut()
            .push((OutboundEvent::new(name, data.clone()), scope.to_string()));
        Ok(())
    }
}
