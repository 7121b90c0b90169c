//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `coopd.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use coop_adapter_virtual::VirtualConfig;
use coop_domain::line::LineId;
use coop_domain::schedule::Coordinates;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Digital line settings.
    pub gpio: GpioConfig,
    /// Where the coop stands.
    pub location: LocationConfig,
    /// Control loop and actuation timings.
    pub control: ControlConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// Preferred TCP port.
    pub port: u16,
    /// Port tried when the preferred one cannot be bound.
    pub fallback_port: u16,
}

/// Which hardware interface drives the lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpioBackend {
    /// Linux sysfs GPIO tree.
    #[default]
    Sysfs,
    /// In-memory simulation.
    Virtual,
}

impl FromStr for GpioBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sysfs" => Ok(Self::Sysfs),
            "virtual" => Ok(Self::Virtual),
            other => Err(ConfigError::Validation(format!(
                "unknown gpio backend {other:?}"
            ))),
        }
    }
}

/// Digital line configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GpioConfig {
    pub backend: GpioBackend,
    /// Root of the sysfs GPIO tree.
    pub sysfs_root: PathBuf,
    pub door_line: u32,
    pub water_line: u32,
    /// Wait after an export before the line is used, in milliseconds.
    pub settle_delay_ms: u64,
    /// Simulation parameters, used by the `virtual` backend.
    pub simulation: VirtualConfig,
}

/// Coordinates used for the daily schedule.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

/// Timings of the control loop and the actuators.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Pause between two control iterations, in milliseconds.
    pub interval_ms: u64,
    /// Length of the water pulse, in seconds.
    pub pulse_secs: u64,
    /// Pause after a manual command before redirecting, in milliseconds.
    pub feedback_delay_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `coopd.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, if an
    /// override cannot be parsed, or if the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("coopd.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
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

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("COOPD_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("COOPD_PORT") {
            self.server.port = parse_var("COOPD_PORT", &val)?;
        }
        if let Some(val) = lookup("COOPD_FALLBACK_PORT") {
            self.server.fallback_port = parse_var("COOPD_FALLBACK_PORT", &val)?;
        }
        if let Some(val) = lookup("COOPD_GPIO_BACKEND") {
            self.gpio.backend = val.parse()?;
        }
        if let Some(val) = lookup("COOPD_SYSFS_ROOT") {
            self.gpio.sysfs_root = PathBuf::from(val);
        }
        if let Some(val) = lookup("COOPD_LATITUDE") {
            self.location.latitude = parse_var("COOPD_LATITUDE", &val)?;
        }
        if let Some(val) = lookup("COOPD_LONGITUDE") {
            self.location.longitude = parse_var("COOPD_LONGITUDE", &val)?;
        }
        if let Some(val) = lookup("COOPD_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 || self.server.fallback_port == 0 {
            return Err(ConfigError::Validation("ports must be non-zero".to_string()));
        }
        if !(-90.0..=90.0).contains(&self.location.latitude) {
            return Err(ConfigError::Validation(format!(
                "latitude {} out of range",
                self.location.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.location.longitude) {
            return Err(ConfigError::Validation(format!(
                "longitude {} out of range",
                self.location.longitude
            )));
        }
        if self.gpio.door_line == self.gpio.water_line {
            return Err(ConfigError::Validation(
                "door and water must use distinct lines".to_string(),
            ));
        }
        if self.control.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "control interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the preferred `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the `host:fallback_port` bind address.
    #[must_use]
    pub fn fallback_bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.fallback_port)
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.location.latitude, self.location.longitude)
    }
}

impl GpioConfig {
    #[must_use]
    pub fn door(&self) -> LineId {
        LineId::new(self.door_line)
    }

    #[must_use]
    pub fn water(&self) -> LineId {
        LineId::new(self.water_line)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl ControlConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    #[must_use]
    pub fn pulse(&self) -> Duration {
        Duration::from_secs(self.pulse_secs)
    }

    #[must_use]
    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}

fn parse_var<T: FromStr>(key: &str, val: &str) -> Result<T, ConfigError> {
    val.trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{key} has an invalid value {val:?}")))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
            fallback_port: 8080,
        }
    }
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            backend: GpioBackend::default(),
            sysfs_root: PathBuf::from("/sys/class/gpio"),
            door_line: 21,
            water_line: 20,
            settle_delay_ms: 1000,
            simulation: VirtualConfig::default(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: 37.4852,
            longitude: -122.2364,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            pulse_secs: 60,
            feedback_delay_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "coopd=info,coop=info,tower_http=debug".to_string(),
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
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
