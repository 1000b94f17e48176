use colored::*;
use eyre::{Result, bail};

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
        ConfigAction::Get { key } => {
            println!("{}", get(&key, config)?);
            Ok(())
        }
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "hostbridge Configuration".bold());
            println!();

            println!("  log_level: {}", config.log_level.as_filter());
            println!();

            println!("{}:", "surface".cyan());
            println!("  mounted: {}", config.surface.mounted);
            println!("  scope: {}", config.surface.scope.as_deref().unwrap_or("-"));
            println!();

            println!("{}:", "host".cyan());
            println!("  sinks: {:?}", config.host.sinks);
            println!("  format: {:?}", config.host.format);
            println!("  events_dir: {}", config.host.events_dir.display());
            println!("  http_endpoint: {}", config.host.http_endpoint.as_deref().unwrap_or("-"));
        }
    }

    Ok(())
}

fn get(key: &str, config: &Config) -> Result<String> {
    let value = match key {
        "log_level" | "log-level" => config.log_level.as_filter().to_string(),
        "surface.mounted" => config.surface.mounted.to_string(),
        "surface.scope" => config.surface.scope.clone().unwrap_or_default(),
        "host.sinks" => serde_json::to_string(&config.host.sinks)?,
        "host.format" => serde_json::to_string(&config.host.format)?.trim_matches('"').to_string(),
        "host.events_dir" => config.host.events_dir.display().to_string(),
        "host.http_endpoint" => config.host.http_endpoint.clone().unwrap_or_default(),
        _ => bail!("Unknown config key: {}", key),
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_keys() {
        let mut config = Config::default();
        config.surface.scope = Some("room1".to_string());

        assert_eq!(get("log_level", &config).unwrap(), "info");
        assert_eq!(get("surface.scope", &config).unwrap(), "room1");
        assert_eq!(get("host.sinks", &config).unwrap(), r#"["stdout"]"#);
        assert_eq!(get("host.format", &config).unwrap(), "json");
    }

    #[test]
    fn test_get_unknown_key() {
        assert!(get("paths.plugins", &Config::default()).is_err());
    }
}
