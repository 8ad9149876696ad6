//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::adl::{LIBRARY_NAMES, MAX_THERMAL_CHANNELS};
use crate::domain::FanSpeedValue;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Vendor library settings
    pub library: LibraryConfig,
    /// Adapter selection
    pub adapter: AdapterConfig,
    /// Power control profile
    pub power: PowerConfig,
    /// Fan profile
    pub fan: FanConfig,
}

impl Config {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(names) = &self.library.names {
            if names.is_empty() || names.iter().any(|n| n.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: "library.names".to_string(),
                    message: "must list at least one non-empty library name".to_string(),
                });
            }
        }

        if !(0..MAX_THERMAL_CHANNELS).contains(&self.fan.channel) {
            return Err(ConfigError::InvalidValue {
                key: "fan.channel".to_string(),
                message: format!("must be 0-{}", MAX_THERMAL_CHANNELS - 1),
            });
        }

        if let Some(percent) = self.fan.speed_percent {
            FanSpeedValue::percent(percent).map_err(|e| ConfigError::InvalidValue {
                key: "fan.speed_percent".to_string(),
                message: e.to_string(),
            })?;
        }

        Ok(())
    }
}

/// General configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
    /// Dry run mode
    pub dry_run: bool,
}

/// Vendor library configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Library names to try instead of the platform defaults
    pub names: Option<Vec<String>>,
}

impl LibraryConfig {
    /// Names to try, in order
    pub fn candidates(&self) -> Vec<String> {
        match &self.names {
            Some(names) => names.clone(),
            None => LIBRARY_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }
}

/// Adapter selection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Target ADL adapter index; all active adapters when unset
    pub index: Option<i32>,
}

/// Power control profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    /// Power control in percent relative to stock
    pub control_percent: Option<i32>,
}

/// Fan profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FanConfig {
    /// Thermal channel the fan belongs to
    pub channel: i32,
    /// Fixed fan speed in percent
    pub speed_percent: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.general.dry_run);
        assert!(config.adapter.index.is_none());
        assert_eq!(config.fan.channel, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_library_candidates() {
        let config = LibraryConfig::default();
        assert_eq!(config.candidates(), LIBRARY_NAMES.to_vec());

        let config = LibraryConfig {
            names: Some(vec!["/opt/amd/libatiadlxx.so".to_string()]),
        };
        assert_eq!(config.candidates(), vec!["/opt/amd/libatiadlxx.so"]);
    }

    #[test]
    fn test_parse_profile() {
        let config: Config = toml::from_str(
            r#"
            [adapter]
            index = 3

            [power]
            control_percent = -10

            [fan]
            channel = 0
            speed_percent = 55
            "#,
        )
        .unwrap();

        assert_eq!(config.adapter.index, Some(3));
        assert_eq!(config.power.control_percent, Some(-10));
        assert_eq!(config.fan.speed_percent, Some(55));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.fan.speed_percent = Some(120);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key, .. }) if key == "fan.speed_percent"
        ));

        let mut config = Config::default();
        config.fan.channel = 10;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.library.names = Some(vec![]);
        assert!(config.validate().is_err());
    }
}
