use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::action::{ActionKind, ConfigFailureKind};
use crate::cli::OutputFormat;

#[derive(Debug, Serialize)]
struct KindEntry {
    kind: String,
    label: &'static str,
    forwarded: bool,
}

#[derive(Debug, Serialize)]
struct KindListing {
    actions: Vec<KindEntry>,
    config_failures: Vec<KindEntry>,
}

fn listing() -> KindListing {
    KindListing {
        actions: ActionKind::all()
            .map(|kind| KindEntry {
                kind: format!("{:?}", kind),
                label: kind.label(),
                forwarded: kind.is_bridged(),
            })
            .collect(),
        config_failures: ConfigFailureKind::all()
            .map(|kind| KindEntry {
                kind: format!("{:?}", kind),
                label: kind.label(),
                forwarded: true,
            })
            .collect(),
    }
}

pub fn run(format: OutputFormat) -> Result<()> {
    let listing = listing();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&listing)?),
        OutputFormat::Text => {
            println!("{}", "Action kinds:".bold());
            for entry in &listing.actions {
                let marker = if entry.forwarded { "→".green() } else { "·".dimmed() };
                println!("  {} {:<22} {}", marker, entry.kind, entry.label.cyan());
            }
            println!();
            println!("{}", "Config load failures (event named by kind):".bold());
            for entry in &listing.config_failures {
                println!("  {} {:<22} {}", "→".green(), entry.kind, entry.label.cyan());
            }
        }
    }

    Ok(())
}
