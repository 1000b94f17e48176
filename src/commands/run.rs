//! Dispatch a stream of actions through the bridge

use colored::*;
use eyre::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::rc::Rc;

use crate::action::{Action, wire};
use crate::bridge::EventBridge;
use crate::config::Config;
use crate::host::FanoutHost;
use crate::mount::MountRegistry;
use crate::pipeline::{ActionLogger, Pipeline, Store};

/// Surface id used for the surface mounted at startup
pub const STARTUP_SURFACE: &str = "main";

#[derive(Debug, Default)]
struct RunStats {
    dispatched: usize,
    skipped: usize,
}

pub fn run(input: Option<&Path>, scope: Option<String>, quiet: bool, config: &Config) -> Result<()> {
    let host = FanoutHost::from_config(&config.host).context("Failed to set up host sinks")?;
    if host.is_empty() {
        log::warn!("No host sinks configured, events will be discarded");
    }

    let mounts = MountRegistry::new();
    let pipeline = Pipeline::new(Store::new(mounts.clone()))
        .with(EventBridge::new(Rc::new(mounts), Rc::new(host)))
        .with(ActionLogger);

    if let Some(scope) = scope.map(Some).or_else(|| config.startup_scope()) {
        pipeline.dispatch(Action::SurfaceMounted {
            surface: STARTUP_SURFACE.to_string(),
            scope,
        })?;
    }

    let reader: Box<dyn BufRead> = match input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stats = pump(reader, &pipeline)?;
    log::info!("Dispatched {} actions, skipped {} lines", stats.dispatched, stats.skipped);

    if !quiet {
        eprintln!(
            "{} Dispatched {} actions{}",
            "✓".green(),
            stats.dispatched,
            if stats.skipped > 0 {
                format!(", skipped {} invalid lines", stats.skipped).yellow().to_string()
            } else {
                String::new()
            }
        );
    }

    Ok(())
}

fn pump(reader: impl BufRead, pipeline: &Pipeline) -> Result<RunStats> {
    let mut stats = RunStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read action")?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        match wire::decode(&line) {
            Ok(action) => {
                pipeline
                    .dispatch(action)
                    .with_context(|| format!("Failed to dispatch action on line {}", line_no))?;
                stats.dispatched += 1;
            }
            Err(e) => {
                log::warn!("Skipping line {}: {:#}", line_no, e);
                eprintln!("{} line {}: {:#}", "✗".red(), line_no, e);
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}
