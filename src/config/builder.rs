//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    ///
    /// An explicit path must load; without one the default locations are
    /// searched and a missing file is fine.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default(),
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override with CLI verbose flag
    pub fn with_verbose(mut self, verbose: Option<bool>) -> Self {
        if let Some(v) = verbose {
            self.config.general.verbose = v;
        }
        self
    }

    /// Override with CLI dry-run flag
    pub fn with_dry_run(mut self, dry_run: Option<bool>) -> Self {
        if let Some(d) = dry_run {
            self.config.general.dry_run = d;
        }
        self
    }

    /// Override with CLI adapter index
    pub fn with_adapter_index(mut self, index: Option<i32>) -> Self {
        if let Some(i) = index {
            self.config.adapter.index = Some(i);
        }
        self
    }

    /// Override the library name list
    pub fn with_library_names(mut self, names: Option<Vec<String>>) -> Self {
        if let Some(n) = names {
            self.config.library.names = Some(n);
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().build();
        assert!(!config.general.verbose);
        assert!(!config.general.dry_run);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigBuilder::new()
            .with_verbose(Some(true))
            .with_dry_run(Some(true))
            .with_adapter_index(Some(2))
            .with_library_names(Some(vec!["libatiadlxx.so.1".to_string()]))
            .build();

        assert!(config.general.verbose);
        assert!(config.general.dry_run);
        assert_eq!(config.adapter.index, Some(2));
        assert_eq!(config.library.candidates(), vec!["libatiadlxx.so.1"]);
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[adapter]\nindex = 1\n\n[general]\ndry_run = false").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = ConfigBuilder::new()
            .with_file(Some(&path))
            .unwrap()
            .with_adapter_index(Some(4))
            .with_dry_run(None)
            .build();

        assert_eq!(config.adapter.index, Some(4));
        assert!(!config.general.dry_run);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = ConfigBuilder::new().with_file(Some("/nonexistent/adlctl.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
