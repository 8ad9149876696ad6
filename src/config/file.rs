//! Configuration file loading
//!
//! Handles loading configuration from TOML files.

use crate::config::Config;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load and validate configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the highest-precedence default location that parses
    pub fn load_default() -> Option<Config> {
        Self::load_highest_precedence(&Self::default_paths())
    }

    /// Load the highest-precedence file of `paths` (ordered lowest first)
    ///
    /// Files that exist but fail to load are skipped with a warning.
    pub fn load_highest_precedence(paths: &[PathBuf]) -> Option<Config> {
        for path in paths.iter().rev() {
            if !path.exists() {
                continue;
            }
            match Self::load(path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return Some(config);
                }
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            }
        }
        None
    }

    /// Get default configuration file paths, lowest precedence first
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/adlctl/config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("adlctl").join("config.toml"));
        }

        paths.push(PathBuf::from("adlctl.toml"));
        paths.push(PathBuf::from(".adlctl.toml"));

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_paths() {
        let paths = ConfigFile::default_paths();
        assert_eq!(paths[0], PathBuf::from("/etc/adlctl/config.toml"));
        assert!(paths.iter().any(|p| p.ends_with("adlctl.toml")));
    }

    #[test]
    fn test_later_path_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let system = dir.path().join("system.toml");
        let project = dir.path().join("project.toml");
        std::fs::write(&system, "[adapter]\nindex = 1\n").unwrap();
        std::fs::write(&project, "[adapter]\nindex = 2\n").unwrap();

        let config = ConfigFile::load_highest_precedence(&[system.clone(), project]).unwrap();
        assert_eq!(config.adapter.index, Some(2));

        let missing = dir.path().join("missing.toml");
        let config = ConfigFile::load_highest_precedence(&[system, missing]).unwrap();
        assert_eq!(config.adapter.index, Some(1));
    }

    #[test]
    fn test_invalid_higher_precedence_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let broken = dir.path().join("broken.toml");
        std::fs::write(&user, "[power]\ncontrol_percent = 5\n").unwrap();
        std::fs::write(&broken, "[power\n").unwrap();

        let config = ConfigFile::load_highest_precedence(&[user, broken]).unwrap();
        assert_eq!(config.power.control_percent, Some(5));
    }

    #[test]
    fn test_no_candidates() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigFile::load_highest_precedence(&[dir.path().join("none.toml")]).is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigFile::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[general]\ndry_run = true\n\n[power]\ncontrol_percent = 10").unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        assert!(config.general.dry_run);
        assert_eq!(config.power.control_percent, Some(10));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[power\ncontrol_percent = ").unwrap();

        assert!(matches!(
            ConfigFile::load(file.path()),
            Err(ConfigError::TomlError(_))
        ));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fan]\nspeed_percent = 150").unwrap();

        assert!(matches!(
            ConfigFile::load(file.path()),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
