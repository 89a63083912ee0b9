//! Vault configuration
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! `PWVAULT_` environment variables.

use crate::error::ConfigError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "PWVAULT_";

/// Credential store backing the vault manager
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The platform credential store of the current user
    Native,
    /// A process-local store that is lost on exit
    Memory,
}

impl Default for BackendKind {
    fn default() -> Self {
        if cfg!(windows) {
            Self::Native
        } else {
            Self::Memory
        }
    }
}

/// Vault configuration
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    #[serde(default)]
    pub backend: BackendKind,
}

/// Configuration manager that handles platform config paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with the default platform path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    fn default_config_path() -> PathBuf {
        // Check for XDG_CONFIG_HOME override first (Linux/macOS)
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("pwvault").join("config.toml");
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pwvault")
            .join("config.toml")
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    pub fn load(&self) -> Result<VaultConfig, ConfigError> {
        let mut figment = Figment::new();

        // Layer 1: Defaults
        figment = figment.merge(Serialized::defaults(VaultConfig::default()));

        // Layer 2: Config file (if exists)
        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        // Layer 3: Environment variables
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn manager_in(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(temp_dir.path().join("config.toml"))
    }

    #[test]
    #[serial]
    fn test_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = manager_in(&temp_dir).load().unwrap();
        assert_eq!(config, VaultConfig::default());
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.toml"), "backend = \"memory\"\n").unwrap();

        let config = manager_in(&temp_dir).load().unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.toml"), "backend = \"memory\"\n").unwrap();

        unsafe { std::env::set_var("PWVAULT_BACKEND", "native") };
        let result = manager_in(&temp_dir).load();
        unsafe { std::env::remove_var("PWVAULT_BACKEND") };

        assert_eq!(result.unwrap().backend, BackendKind::Native);
    }

    #[test]
    #[serial]
    fn test_unknown_backend_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("config.toml"), "backend = \"floppy\"\n").unwrap();

        let error = manager_in(&temp_dir).load().unwrap_err();
        assert!(error.to_string().contains("Failed to load configuration"));
    }

    #[test]
    fn test_with_path() {
        let path = PathBuf::from("/tmp/pwvault-test/config.toml");
        let manager = ConfigManager::with_path(path.clone());
        assert_eq!(manager.config_path(), &path);
    }

    #[test]
    fn test_default_path_ends_with_config_file() {
        let manager = ConfigManager::new();
        assert!(manager.config_path().ends_with("pwvault/config.toml"));
    }
}
