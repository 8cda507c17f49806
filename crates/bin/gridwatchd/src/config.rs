//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `gridwatch.toml` in the working directory. Every field except
//! the data source URL has a sensible default, so the file is optional when
//! `GRIDWATCH_URL` is set. Environment variables take precedence over file
//! values.

use std::time::Duration;

use serde::Deserialize;

use gridwatch_adapter_dashboard::DashboardConfig;
use gridwatch_adapter_http_axum::state::DEFAULT_PAGE_REFRESH_SECS;
use gridwatch_adapter_http_reqwest::HttpSourceConfig;
use gridwatch_app::refresh_controller::{DEFAULT_INTERVAL, RefreshConfig};
use gridwatch_domain::error::ValidationError;
use gridwatch_domain::field::FieldMapping;
use gridwatch_domain::window::DEFAULT_WINDOW_SIZE;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where readings come from.
    pub source: HttpSourceConfig,
    /// Polling cadence and window.
    pub refresh: RefreshSettings,
    /// Source keys per channel.
    pub fields: FieldMapping,
    /// Presentation settings.
    pub dashboard: DashboardConfig,
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Refresh controller settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RefreshSettings {
    /// Delay between ticks, in milliseconds.
    pub interval_ms: u64,
    /// Number of readings kept in the recent window.
    pub window_size: usize,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Auto-reload interval of the HTML page.
    pub page_refresh_secs: u32,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `gridwatch.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("gridwatch.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides looked up through `var`. Unparsable numbers are ignored.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("GRIDWATCH_URL") {
            self.source.url = val;
        }
        if let Some(val) = var("GRIDWATCH_INTERVAL_MS")
            && let Ok(ms) = val.parse()
        {
            self.refresh.interval_ms = ms;
        }
        if let Some(val) = var("GRIDWATCH_WINDOW_SIZE")
            && let Ok(size) = val.parse()
        {
            self.refresh.window_size = size;
        }
        if let Some(val) = var("GRIDWATCH_HOST") {
            self.server.host = val;
        }
        if let Some(val) = var("GRIDWATCH_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Some(val) = var("GRIDWATCH_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("GRIDWATCH_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.source.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source url must be set (GRIDWATCH_URL or [source] url)".to_string(),
            ));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "source timeout must be non-zero".to_string(),
            ));
        }
        if self.refresh.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "refresh interval must be non-zero".to_string(),
            ));
        }
        if self.refresh.window_size == 0 {
            return Err(ConfigError::Validation(
                "window size must be non-zero".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.server.page_refresh_secs == 0 {
            return Err(ConfigError::Validation(
                "page refresh must be non-zero".to_string(),
            ));
        }
        if self.dashboard.gauge_max <= self.dashboard.gauge_min {
            return Err(ConfigError::Validation(
                "gauge max must be greater than gauge min".to_string(),
            ));
        }
        if self.dashboard.gauge_zones.iter().any(|zone| zone.max <= zone.min) {
            return Err(ConfigError::Validation(
                "gauge zone max must be greater than its min".to_string(),
            ));
        }
        self.fields.validate()?;
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Polling parameters for the refresh controller.
    #[must_use]
    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            interval: Duration::from_millis(self.refresh.interval_ms),
            window_size: self.refresh.window_size,
        }
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_ms: u64::try_from(DEFAULT_INTERVAL.as_millis()).unwrap_or(1000),
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            page_refresh_secs: DEFAULT_PAGE_REFRESH_SECS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "gridwatchd=info,gridwatch_app=info,gridwatch_adapter_http_reqwest=info,tower_http=debug"
                .to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Invalid field mapping.
    #[error("invalid field mapping")]
    Fields(#[from] ValidationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use gridwatch_domain::field::Measurement;

    fn valid() -> Config {
        let mut config = Config::default();
        config.source.url = "http://sheet.local/exec".to_string();
        config
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.page_refresh_secs, 5);
        assert_eq!(config.refresh.interval_ms, 1000);
        assert_eq!(config.refresh.window_size, 20);
        assert_eq!(config.source.timeout_secs, 10);
        assert_eq!(config.fields, FieldMapping::default());
        assert!(!config.dashboard.newest_first);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.source.url.is_empty());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [source]
            url = 'https://script.example.com/exec'
            timeout_secs = 4

            [refresh]
            interval_ms = 2500
            window_size = 10

            [fields]
            timestamp = 'ts'

            [[fields.channels]]
            name = 'North'
            voltage = 'VN'
            current = 'IN'

            [dashboard]
            gauge_max = 50.0
            newest_first = true
            chart_measurement = 'frequency'

            [server]
            host = '127.0.0.1'
            port = 9090
            page_refresh_secs = 2

            [logging]
            filter = 'debug'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.source.url, "https://script.example.com/exec");
        assert_eq!(config.source.timeout_secs, 4);
        assert_eq!(config.refresh.interval_ms, 2500);
        assert_eq!(config.refresh.window_size, 10);
        assert_eq!(config.fields.timestamp, "ts");
        assert_eq!(config.fields.channels.len(), 1);
        assert_eq!(config.fields.channels[0].key(Measurement::Current), Some("IN"));
        assert!((config.dashboard.gauge_max - 50.0).abs() < f64::EPSILON);
        assert!(config.dashboard.newest_first);
        assert_eq!(config.dashboard.chart_measurement, Measurement::Frequency);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.page_refresh_secs, 2);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_apply_overrides() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("GRIDWATCH_URL", "http://override/exec"),
            ("GRIDWATCH_INTERVAL_MS", "500"),
            ("GRIDWATCH_WINDOW_SIZE", "7"),
            ("GRIDWATCH_BIND", "127.0.0.1:8081"),
            ("GRIDWATCH_LOG", "warn"),
        ]));
        assert_eq!(config.source.url, "http://override/exec");
        assert_eq!(config.refresh.interval_ms, 500);
        assert_eq!(config.refresh.window_size, 7);
        assert_eq!(config.bind_addr(), "127.0.0.1:8081");
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_prefer_rust_log_and_ignore_unparsable_numbers() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("GRIDWATCH_LOG", "warn"),
            ("RUST_LOG", "trace"),
            ("GRIDWATCH_PORT", "not-a-port"),
            ("GRIDWATCH_INTERVAL_MS", "-1"),
        ]));
        assert_eq!(config.logging.filter, "trace");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.refresh.interval_ms, 1000);
    }

    #[test]
    fn should_reject_missing_url() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn should_accept_valid_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn should_reject_zero_interval_window_and_port() {
        let mut config = valid();
        config.refresh.interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.refresh.window_size = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_timeout_and_page_refresh() {
        let mut config = valid();
        config.source.timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("timeout")
        ));

        let mut config = valid();
        config.server.page_refresh_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("page refresh")
        ));
    }

    #[test]
    fn should_reject_inverted_gauge_zone() {
        let mut config = valid();
        config.dashboard.gauge_zones[1].max = config.dashboard.gauge_zones[1].min;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("zone")
        ));
    }

    #[test]
    fn should_reject_inverted_gauge_scale() {
        let mut config = valid();
        config.dashboard.gauge_min = 10.0;
        config.dashboard.gauge_max = 10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_invalid_field_mapping() {
        let mut config = valid();
        config.fields.channels[1].name = "DL1".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Fields(ValidationError::DuplicateChannel(name))) if name == "DL1"
        ));
    }

    #[test]
    fn should_build_refresh_config() {
        let mut config = valid();
        config.refresh.interval_ms = 250;
        config.refresh.window_size = 5;
        let refresh = config.refresh_config();
        assert_eq!(refresh.interval, Duration::from_millis(250));
        assert_eq!(refresh.window_size, 5);
    }

    #[test]
    fn should_format_bind_addr() {
        assert_eq!(Config::default().bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
