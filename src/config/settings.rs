//! Application settings configuration
//!
//! Defines the check defaults and batch limits loaded from TOML.

use crate::checker::CheckOptions;
use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Defaults for a single certificate check
#[derive(Debug, Clone, Deserialize)]
pub struct CheckSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_warning_days")]
    pub warning_days: i64,
    /// PEM bundle of additional trust anchors (private CAs)
    #[serde(default)]
    pub extra_ca_file: Option<PathBuf>,
}

fn default_port() -> u16 {
    443
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_warning_days() -> i64 {
    30
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            warning_days: default_warning_days(),
            extra_ca_file: None,
        }
    }
}

impl CheckSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Batch settings
#[derive(Debug, Clone, Deserialize)]
pub struct BatchSettings {
    #[serde(default = "default_parallel")]
    pub parallel: usize,
}

fn default_parallel() -> usize {
    10
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub check: CheckSettings,
    #[serde(default)]
    pub batch: BatchSettings,
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "check.timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.check.warning_days < 0 {
            return Err(ConfigError::InvalidValue {
                key: "check.warning_days".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if self.batch.parallel == 0 {
            return Err(ConfigError::InvalidValue {
                key: "batch.parallel".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Per-call options seeded from these settings
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            port: self.check.port,
            timeout: self.check.timeout(),
            warning_days: self.check.warning_days,
        }
    }
}
