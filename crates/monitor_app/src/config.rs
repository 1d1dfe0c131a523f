//! Monitor configuration, read from a RON file.
//!
//! Without an explicit path, `./monitor.ron` is used when present and the
//! built-in defaults otherwise.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use monitor_core::Category;
use monitor_engine::{HttpSettings, MonitorSettings, StreamSettings};
use monitor_logging::LogDestination;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_CONFIG_FILENAME: &str = "monitor.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub base_url: String,
    pub events_path: String,
    /// Report listing endpoint; `None` skips the startup listing.
    pub reports_path: Option<String>,
    pub harvester_submit_path: String,
    pub scan_submit_path: String,
    pub reconnect_delay_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_destination: LogDestination,
    pub log_file: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            events_path: "/events".to_string(),
            reports_path: Some("/api/reports".to_string()),
            harvester_submit_path: "/api/harvester".to_string(),
            scan_submit_path: "/api/scan".to_string(),
            reconnect_delay_ms: 3000,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            log_destination: LogDestination::Terminal,
            log_file: None,
        }
    }
}

impl MonitorConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    Self::read(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        ron::from_str(&content).with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("invalid base url '{}'", self.base_url))
    }

    pub fn endpoint(&self, endpoint_path: &str) -> Result<Url> {
        self.base_url()?
            .join(endpoint_path)
            .with_context(|| format!("invalid endpoint path '{endpoint_path}'"))
    }

    pub fn reports_url(&self) -> Result<Option<Url>> {
        self.reports_path
            .as_deref()
            .map(|reports_path| self.endpoint(reports_path))
            .transpose()
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn settings_for(&self, category: Category) -> Result<MonitorSettings> {
        let submit_path = match category {
            Category::Harvester => &self.harvester_submit_path,
            Category::Scan => &self.scan_submit_path,
        };
        let mut settings = MonitorSettings::new(
            category,
            self.endpoint(&self.events_path)?,
            self.endpoint(submit_path)?,
        );
        settings.reports_url = self.reports_url()?;
        settings.http = self.http_settings();
        settings.stream = StreamSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
        };
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("monitor.ron");
        fs::write(
            &path,
            r#"(base_url: "http://recon.local:8080/", reconnect_delay_ms: 500, log_destination: Both)"#,
        )
        .unwrap();

        let config = MonitorConfig::load(Some(&path)).unwrap();
        assert_eq!(config.base_url, "http://recon.local:8080/");
        assert_eq!(config.reconnect_delay_ms, 500);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.events_path, "/events");
    }

    #[test]
    fn settings_join_endpoints_onto_base_url() {
        let config = MonitorConfig {
            base_url: "http://recon.local:8080".to_string(),
            reports_path: None,
            ..MonitorConfig::default()
        };

        let settings = config.settings_for(Category::Harvester).unwrap();
        assert_eq!(settings.events_url.as_str(), "http://recon.local:8080/events");
        assert_eq!(settings.submit_url.as_str(), "http://recon.local:8080/api/harvester");
        assert!(settings.reports_url.is_none());
        assert_eq!(settings.stream.reconnect_delay, Duration::from_millis(3000));

        let scan = config.settings_for(Category::Scan).unwrap();
        assert_eq!(scan.submit_url.as_str(), "http://recon.local:8080/api/scan");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = MonitorConfig::load(Some(&temp.path().join("absent.ron")));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("monitor.ron");
        fs::write(&path, "(base_url: 42").unwrap();
        assert!(MonitorConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let config = MonitorConfig {
            base_url: "not a url".to_string(),
            ..MonitorConfig::default()
        };
        assert!(config.settings_for(Category::Scan).is_err());
    }
}
