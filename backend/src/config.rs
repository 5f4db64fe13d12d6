//! Validation configuration.
//!
//! Tolerances and remote service settings are read from a TOML file
//! (`ride_validation.toml`) and may be overridden from the environment:
//!
//! - `RIDE_SERVICE_URL`: base URL of the ride validation service
//! - `RIDE_SERVICE_TIMEOUT_SECS`: per-call timeout in seconds
//! - `RIDE_ODOMETER_MODE`: `delegated` | `last_odometer`

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::validators::Tolerances;

pub const CONFIG_FILE_NAME: &str = "ride_validation.toml";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("No {0} found in standard locations")]
    NotFound(&'static str),

    #[error("Invalid value for {name}: {message}")]
    InvalidEnv { name: &'static str, message: String },
}

/// How the odometer/distance consistency is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OdometerMode {
    /// Fetch the previous reading and compare locally.
    LastOdometer,
    /// Let the service decide through the field validation endpoints.
    #[default]
    Delegated,
}

impl FromStr for OdometerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last_odometer" | "last_odo" | "local" => Ok(Self::LastOdometer),
            "delegated" | "remote" => Ok(Self::Delegated),
            _ => Err(format!("Unknown odometer mode: {}", s)),
        }
    }
}

/// Remote service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub odometer_mode: OdometerMode,
}

fn default_base_url() -> String {
    "http://127.0.0.1:6543".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            odometer_mode: OdometerMode::default(),
        }
    }
}

impl ServiceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete validation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub tolerances: Tolerances,
    #[serde(default)]
    pub service: ServiceSettings,
}

impl ValidationConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid configuration.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `ride_validation.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("backend").join(CONFIG_FILE_NAME),
            PathBuf::from("..").join(CONFIG_FILE_NAME),
        ];

        for path in search_paths {
            if path.exists() {
                log::debug!("Loading validation config from {}", path.display());
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound(CONFIG_FILE_NAME))
    }

    /// Defaults plus environment overrides, without reading any file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load from `path` (or the default location), falling back to defaults
    /// when no file exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::from_default_location() {
                Ok(config) => config,
                Err(ConfigError::NotFound(name)) => {
                    log::debug!("No {} found, using defaults", name);
                    Self::default()
                }
                Err(e) => return Err(e),
            },
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `RIDE_SERVICE_URL`, `RIDE_SERVICE_TIMEOUT_SECS` and
    /// `RIDE_ODOMETER_MODE` when set.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("RIDE_SERVICE_URL") {
            if !url.trim().is_empty() {
                self.service.base_url = url.trim().to_string();
            }
        }

        if let Ok(raw) = env::var("RIDE_SERVICE_TIMEOUT_SECS") {
            self.service.timeout_secs =
                raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    name: "RIDE_SERVICE_TIMEOUT_SECS",
                    message: format!("'{}' is not a whole number of seconds", raw),
                })?;
        }

        if let Ok(raw) = env::var("RIDE_ODOMETER_MODE") {
            self.service.odometer_mode = raw.parse().map_err(|message| ConfigError::InvalidEnv {
                name: "RIDE_ODOMETER_MODE",
                message,
            })?;
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        self.service.timeout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ValidationConfig::from_toml_str("").unwrap();
        assert_eq!(config, ValidationConfig::default());
        assert_eq!(config.service.base_url, "http://127.0.0.1:6543");
        assert_eq!(config.service.odometer_mode, OdometerMode::Delegated);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[tolerances]
odometer = 0.5

[service]
odometer_mode = "last_odometer"
"#;
        let config = ValidationConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.tolerances.odometer, 0.5);
        assert_eq!(config.tolerances.avspeed_ratio_min, 0.99);
        assert_eq!(config.service.odometer_mode, OdometerMode::LastOdometer);
        assert_eq!(config.service.timeout_secs, 10);
    }

    #[test]
    fn test_invalid_toml() {
        let err =
            ValidationConfig::from_toml_str("[service]\ntimeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_odometer_mode_from_str() {
        assert_eq!("Delegated".parse::<OdometerMode>(), Ok(OdometerMode::Delegated));
        assert_eq!("last_odo".parse::<OdometerMode>(), Ok(OdometerMode::LastOdometer));
        assert!("sometimes".parse::<OdometerMode>().is_err());
    }
}
