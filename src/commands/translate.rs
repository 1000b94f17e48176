//! Preview the event an action produces

use colored::*;
use eyre::{Context, Result};
use serde_json::json;
use std::io::{self, Read};
use std::rc::Rc;

use crate::action::wire;
use crate::bridge::{EventBridge, Outcome};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::host::RecordingHost;
use crate::mount::{Destination, FixedDestination};

pub fn run(action: Option<&str>, scope: Option<String>, format: OutputFormat, config: &Config) -> Result<()> {
    let action_str = match action {
        Some(a) => a.to_string(),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read action from stdin")?;
            buffer
        }
    };

    let action = wire::decode(action_str.trim())?;

    let destination = match scope.map(Some).or_else(|| config.startup_scope()) {
        Some(Some(scope)) if !scope.is_empty() => Destination::Scope(scope),
        Some(_) => Destination::Unscoped,
        None => Destination::Unmounted,
    };

    let bridge = EventBridge::new(Rc::new(FixedDestination(destination)), Rc::new(RecordingHost::new()));
    let outcome = bridge.observe(&action)?;

    print_outcome(&outcome, action.label(), format)
}

fn print_outcome(outcome: &Outcome, label: &str, format: OutputFormat) -> Result<()> {
    let report = match outcome {
        Outcome::Ignored => json!({"action": label, "outcome": "ignored"}),
        Outcome::Filtered => json!({"action": label, "outcome": "filtered"}),
        Outcome::Dropped(event, destination) => json!({
            "action": label,
            "outcome": "dropped",
            "reason": destination.to_string(),
            "event": event,
        }),
        Outcome::Sent(event, scope) => json!({
            "action": label,
            "outcome": "sent",
            "scope": scope,
            "event": event,
        }),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&report)?),
        OutputFormat::Text => match outcome {
            Outcome::Ignored => println!("{} {} is not forwarded to the host", "·".dimmed(), label.cyan()),
            Outcome::Filtered => println!("{} {} is recoverable, kept local", "·".dimmed(), label.cyan()),
            Outcome::Dropped(event, destination) => {
                println!("{} {} (dropped: {})", "⚠".yellow(), event.name.bold(), destination);
                print_data(&event.data);
            }
            Outcome::Sent(event, scope) => {
                println!("{} {} → {}", "✓".green(), event.name.bold(), scope.cyan());
                print_data(&event.data);
            }
        },
    }

    Ok(())
}

fn print_data(data: &crate::event::EventData) {
    for (key, value) in data {
        println!("  {}: {}", key, value);
    }
}
