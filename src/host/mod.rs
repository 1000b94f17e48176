//! Host dispatch: delivering events to the host listener
//!
//! Provides delivery to multiple sinks:
//! - Stdout - one line per event (JSON or colored text)
//! - File (JSONL) - appends to <events_dir>/YYYY-MM/YYYY-MM-DD.jsonl
//! - HTTP - POSTs events to a configured endpoint

use chrono::{Local, Utc};
use colored::*;
use eyre::Result;
use serde::{Deserialize, Serialize};

use crate::event::EventData;

mod recording;
pub mod sinks;

pub use recording::RecordingHost;
pub use sinks::{FanoutHost, FileHost, HttpHost, StdoutHost};

/// Send primitive reaching the host listener.
///
/// Calls are synchronous and unacknowledged; an error is the caller's to handle.
pub trait HostDispatch {
    fn send(&self, name: &str, data: &EventData, scope: &str) -> Result<()>;
}

/// An event as it leaves the process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostEnvelope {
    /// Timestamp (UTC RFC 3339)
    pub timestamp: String,
    /// Local time for display
    #[serde(skip_serializing)]
    #[serde(default)]
    pub local_time: String,
    pub scope: String,
    pub name: String,
    pub data: EventData,
}

impl HostEnvelope {
    pub fn new(name: &str, data: &EventData, scope: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            local_time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            scope: scope.to_string(),
            name: name.to_string(),
            data: data.clone(),
        }
    }

    /// Format for terminal display
    pub fn format_display(&self) -> String {
        let name_colored = if self.name.ends_with(".failed") || self.name.contains(".error") {
            self.name.red()
        } else if self.name.ends_with(".joined") {
            self.name.green()
        } else if self.name.ends_with(".left") {
            self.name.yellow()
        } else {
            self.name.cyan()
        };

        let mut parts = vec![
            self.local_time.dimmed().to_string(),
            format!("[{}]", self.scope).dimmed().to_string(),
            name_colored.to_string(),
        ];

        for (key, value) in &self.data {
            parts.push(format!("{}={}", key.bold(), value));
        }

        parts.join(" ")
    }
}
