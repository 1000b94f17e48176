//! Host sinks

use chrono::Local;
use eyre::{Context, Result, eyre};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use super::{HostDispatch, HostEnvelope};
use crate::config::{Config, HostConfig, HostFormat, HostSink};
use crate::event::EventData;

/// Prints each event as one line on stdout
pub struct StdoutHost {
    format: HostFormat,
}

impl StdoutHost {
    pub fn new(format: HostFormat) -> Self {
        Self { format }
    }
}

impl HostDispatch for StdoutHost {
    fn send(&self, name: &str, data: &EventData, scope: &str) -> Result<()> {
        let envelope = HostEnvelope::new(name, data, scope);
        match self.format {
            HostFormat::Json => println!("{}", serde_json::to_string(&envelope)?),
            HostFormat::Text => println!("{}", envelope.format_display()),
        }
        Ok(())
    }
}

/// Appends events to daily JSONL files
pub struct FileHost {
    events_dir: PathBuf,
}

impl FileHost {
    pub fn new(events_dir: PathBuf) -> Self {
        Self { events_dir }
    }

    /// Path of the file today's events go to
    pub fn current_file(&self) -> PathBuf {
        let now = Local::now();
        self.events_dir
            .join(now.format("%Y-%m").to_string())
            .join(format!("{}.jsonl", now.format("%Y-%m-%d")))
    }
}

impl HostDispatch for FileHost {
    fn send(&self, name: &str, data: &EventData, scope: &str) -> Result<()> {
        let log_file = self.current_file();
        if let Some(month_dir) = log_file.parent() {
            fs::create_dir_all(month_dir).context("Failed to create events directory")?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .with_context(|| format!("Failed to open {}", log_file.display()))?;

        let json = serde_json::to_string(&HostEnvelope::new(name, data, scope))?;
        writeln!(file, "{}", json)?;

        Ok(())
    }
}

/// POSTs events to an HTTP endpoint
pub struct HttpHost {
    endpoint: String,
}

impl HttpHost {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl HostDispatch for HttpHost {
    fn send(&self, name: &str, data: &EventData, scope: &str) -> Result<()> {
        let body = serde_json::to_string(&HostEnvelope::new(name, data, scope))?;

        ureq::post(&self.endpoint)
            .header("Content-Type", "application/json")
            .send(body.as_bytes())
            .map_err(|e| eyre!("HTTP request to {} failed: {}", self.endpoint, e))?;

        Ok(())
    }
}

/// Sends to every sink in order, stopping at the first failure
#[derive(Default)]
pub struct FanoutHost {
    sinks: Vec<Box<dyn HostDispatch>>,
}

impl FanoutHost {
    pub fn new(sinks: Vec<Box<dyn HostDispatch>>) -> Self {
        Self { sinks }
    }

    /// Build the sinks named in the config
    pub fn from_config(config: &HostConfig) -> Result<Self> {
        let mut sinks: Vec<Box<dyn HostDispatch>> = Vec::new();

        for sink in &config.sinks {
            match sink {
                HostSink::Stdout => sinks.push(Box::new(StdoutHost::new(config.format))),
                HostSink::File => {
                    let dir = Config::expand_path(&config.events_dir);
                    sinks.push(Box::new(FileHost::new(dir)));
                }
                HostSink::Http => {
                    let endpoint = config
                        .http_endpoint
                        .as_ref()
                        .ok_or_else(|| eyre!("HTTP sink configured without host.http_endpoint"))?;
                    url::Url::parse(endpoint).with_context(|| format!("Invalid host endpoint: {}", endpoint))?;
                    sinks.push(Box::new(HttpHost::new(endpoint.clone())));
                }
            }
        }

        Ok(Self::new(sinks))
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl HostDispatch for FanoutHost {
    fn send(&self, name: &str, data: &EventData, scope: &str) -> Result<()> {
        for sink in &self.sinks {
            sink.send(name, data, scope)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::DataValue;
    use crate::host::RecordingHost;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct FailingHost;

    impl HostDispatch for FailingHost {
        fn send(&self, _name: &str, _data: &EventData, _scope: &str) -> Result<()> {
            Err(eyre!("host unavailable"))
        }
    }

    struct SharedRecorder(Rc<RecordingHost>);

    impl HostDispatch for SharedRecorder {
        fn send(&self, name: &str, data: &EventData, scope: &str) -> Result<()> {
            self.0.send(name, data, scope)
        }
    }

    #[test]
    fn test_file_host_appends_jsonl() {
        let temp = TempDir::new().unwrap();
        let host = FileHost::new(temp.path().to_path_buf());

        let mut data = EventData::new();
        data.insert("url".to_string(), DataValue::from("https://example.com/room"));
        host.send("conference.joined", &data, "room1").unwrap();
        host.send("conference.left", &data, "room1").unwrap();

        let content = fs::read_to_string(host.current_file()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["name"], "conference.joined");
        assert_eq!(first["scope"], "room1");
    }

    #[test]
    fn test_fanout_stops_at_first_failure() {
        let recorder = Rc::new(RecordingHost::new());
        let host = FanoutHost::new(vec![
            Box::new(SharedRecorder(recorder.clone())),
            Box::new(FailingHost),
            Box::new(SharedRecorder(recorder.clone())),
        ]);

        let result = host.send("conference.left", &EventData::new(), "room1");
        assert!(result.is_err());
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn test_from_config_http_requires_endpoint() {
        let config = HostConfig {
            sinks: vec![HostSink::Http],
            http_endpoint: None,
            ..HostConfig::default()
        };
        assert!(FanoutHost::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_builds_sinks() {
        let config = HostConfig {
            sinks: vec![HostSink::Stdout, HostSink::Http],
            http_endpoint: Some("http://localhost:9000/events".to_string()),
            ..HostConfig::default()
        };
        let host = FanoutHost::from_config(&config).unwrap();
        assert!(!host.is_empty());

        let none = HostConfig {
            sinks: Vec::new(),
            ..HostConfig::default()
        };
        assert!(FanoutHost::from_config(&none).unwrap().is_empty());
    }
}
