use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main hostbridge configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub surface: SurfaceConfig,
    pub host: HostConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// The host surface mounted at startup
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Mount a surface before the first action
    pub mounted: bool,
    /// Scope identifier of the surface
    pub scope: Option<String>,
}

/// Host sink type
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HostSink {
    /// Print to stdout (default)
    Stdout,
    /// Append to JSONL files under events_dir
    File,
    /// POST to http_endpoint
    Http,
}

/// Line format of the stdout sink
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HostFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostConfig {
    pub sinks: Vec<HostSink>,
    pub format: HostFormat,
    pub events_dir: PathBuf,
    pub http_endpoint: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            sinks: vec![HostSink::Stdout],
            format: HostFormat::default(),
            events_dir: Config::data_dir().join("events"),
            http_endpoint: None,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Ok(env_path) = std::env::var("HOSTBRIDGE_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => log::warn!("Failed to load config from HOSTBRIDGE_CONFIG: {}", e),
                }
            }
        }

        if let Ok(dir) = std::env::var("HOSTBRIDGE_DIR") {
            let path = PathBuf::from(dir).join("hostbridge.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => log::warn!("Failed to load config from HOSTBRIDGE_DIR: {}", e),
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("hostbridge").join("hostbridge.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => log::warn!("Failed to load config from {}: {}", path.display(), e),
                }
            }
        }

        // ./hostbridge.yaml (for development)
        let local_config = PathBuf::from("hostbridge.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("Failed to load local config: {}", e),
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Directory for logs and file-sink events
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hostbridge")
    }

    /// Scope of the surface to mount at startup, if any
    pub fn startup_scope(&self) -> Option<Option<String>> {
        self.surface.mounted.then(|| self.surface.scope.clone())
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}
