//! Configuration management.

use crate::error::{Result, VfError};
use crate::paths::SysfsLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// System-wide configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/vfctl/config.json";

/// Environment variable naming an alternate configuration file.
pub const CONFIG_ENV: &str = "VFCTL_CONFIG";

/// Environment variable overriding `layout.net_root`.
pub const SYSFS_ROOT_ENV: &str = "VFCTL_SYSFS_ROOT";

/// Configuration for vfctl.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub layout: SysfsLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self { log_level: "info".to_string(), layout: SysfsLayout::default() }
    }
}

impl Config {
    /// Get the path to the configuration file.
    ///
    /// Resolution order:
    /// 1. `VFCTL_CONFIG` environment variable
    /// 2. `/etc/vfctl/config.json`
    pub fn config_path() -> PathBuf {
        std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from the default location, applying environment overrides.
    ///
    /// A missing file at the resolved location yields the defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let config = if path.exists() { Self::read_file(&path)? } else { Self::default() };
        Ok(config.with_env_overrides())
    }

    /// Load configuration from an explicitly named file, applying environment overrides.
    ///
    /// Unlike [`Config::load`], a missing file is an error: falling back to the
    /// defaults here would point the layout at the real `/sys`.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(VfError::InvalidConfig {
                reason: format!("Config file not found: {}", path.display()),
            });
        }
        Ok(Self::read_file(path)?.with_env_overrides())
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| VfError::InvalidConfig {
            reason: format!("Failed to read config {}: {}", path.display(), e),
        })?;
        Self::from_json(&content)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(root) = std::env::var(SYSFS_ROOT_ENV) {
            self.layout.net_root = PathBuf::from(root);
        }
        self
    }

    /// Parse configuration from a JSON document.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).map_err(|e| VfError::InvalidConfig {
            reason: format!("Failed to parse config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        let fragments = [
            ("device_dir", &layout.device_dir),
            ("driver_dir", &layout.driver_dir),
            ("bind_file", &layout.bind_file),
            ("unbind_file", &layout.unbind_file),
            ("max_vfs_file", &layout.max_vfs_file),
            ("num_vfs_file", &layout.num_vfs_file),
            ("vf_prefix", &layout.vf_prefix),
            ("vf_net_dir", &layout.vf_net_dir),
        ];
        for (name, value) in fragments {
            if value.is_empty() {
                return Err(VfError::InvalidConfig {
                    reason: format!("layout.{} must not be empty", name),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config =
            Config::from_json(r#"{"layout": {"net_root": "/tmp/net"}}"#).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.layout.net_root, PathBuf::from("/tmp/net"));
        assert_eq!(config.layout.num_vfs_file, "sriov_numvfs");
        assert_eq!(config.layout.vf_prefix, "virtfn");
    }

    #[test]
    fn test_empty_fragment_rejected() {
        let err = Config::from_json(r#"{"layout": {"vf_prefix": ""}}"#).unwrap_err();
        assert!(matches!(err, VfError::InvalidConfig { .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = Config::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    /// Serializes tests that read or write process environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_load_from_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        std::fs::write(&path, r#"{"log_level": "debug"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();

        let err = Config::load_from(&temp.path().join("typo.json")).unwrap_err();
        assert!(matches!(err, VfError::InvalidConfig { .. }));
        assert!(err.to_string().contains("typo.json"));
    }

    #[test]
    fn test_load_resolves_env_config_and_sysfs_root() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vfctl.json");
        std::fs::write(&path, r#"{"log_level": "trace", "layout": {"net_root": "/from/file"}}"#)
            .unwrap();

        std::env::set_var(CONFIG_ENV, &path);
        std::env::set_var(SYSFS_ROOT_ENV, "/tmp/fake-sysfs/net");

        let resolved = Config::config_path();
        let loaded = Config::load();

        std::env::remove_var(CONFIG_ENV);
        std::env::remove_var(SYSFS_ROOT_ENV);

        assert_eq!(resolved, path);
        let config = loaded.unwrap();
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.layout.net_root, PathBuf::from("/tmp/fake-sysfs/net"));
    }

    #[test]
    fn test_load_missing_env_config_yields_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp = TempDir::new().unwrap();

        std::env::set_var(CONFIG_ENV, temp.path().join("absent.json"));
        let loaded = Config::load();
        std::env::remove_var(CONFIG_ENV);

        let config = loaded.unwrap();
        assert_eq!(config.log_level, "info");
    }
}
