use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;

mod action;
mod bridge;
mod cli;
mod commands;
mod conference;
mod config;
mod event;
mod host;
mod mount;
mod pipeline;

use cli::{Cli, Commands};
use config::{Config, LogLevel};

fn setup_logging(log_level: &LogLevel) -> Result<()> {
    let log_dir = Config::data_dir().join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("hostbridge.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG env var takes precedence, otherwise use config log_level
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.level_filter());
    }

    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {} (from {})",
        log_level.as_filter(),
        if std::env::var("RUST_LOG").is_ok() { "RUST_LOG env" } else { "config" }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Run { input, scope } => commands::run::run(input.as_deref(), scope, cli.quiet, &config),
        Commands::Translate { action, scope, format } => {
            commands::translate::run(action.as_deref(), scope, cli::OutputFormat::resolve(format), &config)
        }
        Commands::Kinds { format } => commands::kinds::run(cli::OutputFormat::resolve(format)),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Completions { shell } => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration before logging, so log messages in Config::load are silent
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    let log_level = if cli.verbose { LogLevel::Debug } else { config.log_level };
    setup_logging(&log_level).context("Failed to setup logging")?;

    info!("Starting hostbridge with config from: {:?}", cli.config);

    run(cli, config).context("Command failed")?;

    Ok(())
}
