//! Configuration loading and management
//!
//! Handles parsing of `.bugtrack.toml` configuration files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::storage::{BugStore, DEFAULT_STORE_PATH};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = ".bugtrack.toml";

const MAX_LOCK_TIMEOUT_MS: u64 = 60_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Actor configuration
    #[serde(default)]
    pub actor: ActorConfig,
}

/// Where and how the bug store is kept
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON snapshot, relative to the config file's directory
    #[serde(default = "default_store_path")]
    pub path: String,

    /// How long to wait for the store lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_store_path() -> String {
    DEFAULT_STORE_PATH.to_string()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Actor-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    /// Reporter name used when none is given
    #[serde(default = "default_actor")]
    pub default: String,
}

fn default_actor() -> String {
    "unknown".to_string()
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            default: default_actor(),
        }
    }
}

impl Config {
    /// Load configuration from a `.bugtrack.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `dir`, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Store location resolved against `base_dir`
    pub fn store_path(&self, base_dir: &Path) -> PathBuf {
        let path = Path::new(self.store.path.trim());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// A [`BugStore`] for the configured location
    pub fn open_store(&self, base_dir: &Path) -> BugStore {
        BugStore::new(self.store_path(base_dir)).with_lock_timeout(self.store.lock_timeout_ms)
    }

    fn validate(&self) -> Result<()> {
        self.store.validate()?;
        if self.actor.default.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "actor.default cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl StoreConfig {
    fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "store.path cannot be empty".to_string(),
            ));
        }
        if self.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "store.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        if self.lock_timeout_ms > MAX_LOCK_TIMEOUT_MS {
            return Err(Error::InvalidConfig(format!(
                "store.lock_timeout_ms must be <= {MAX_LOCK_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.store.path, ".bugtrack/bugs.json");
        assert_eq!(cfg.store.lock_timeout_ms, 5000);
        assert_eq!(cfg.actor.default, "unknown");
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[store]
path = "data/tracker.json"
lock_timeout_ms = 250

[actor]
default = "alice"
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.store.path, "data/tracker.json");
        assert_eq!(cfg.store.lock_timeout_ms, 250);
        assert_eq!(cfg.actor.default, "alice");
        assert_eq!(
            cfg.store_path(dir.path()),
            dir.path().join("data").join("tracker.json")
        );
    }

    #[test]
    fn invalid_lock_timeout_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[store]\nlock_timeout_ms = 0").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        match err {
            Error::InvalidConfig(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_store_path_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[store]\npath = \"  \"").expect("write config");

        assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn load_from_dir_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.store.path, ".bugtrack/bugs.json");
    }

    #[test]
    fn load_from_dir_defaults_on_invalid_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(CONFIG_FILE), "store = 12").expect("write config");
        let cfg = Config::load_from_dir(dir.path());
        assert_eq!(cfg.actor.default, "unknown");
    }

    #[test]
    fn absolute_store_path_is_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        let absolute = dir.path().join("elsewhere.json");
        let cfg = Config {
            store: StoreConfig {
                path: absolute.display().to_string(),
                ..StoreConfig::default()
            },
            ..Config::default()
        };
        assert_eq!(cfg.store_path(Path::new("/unused")), absolute);
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.toml");
        let cfg = Config::default();
        cfg.save(&path).expect("save config");

        let written = fs::read_to_string(&path).expect("read config");
        assert!(written.contains("path = \".bugtrack/bugs.json\""));
        assert!(written.contains("default = \"unknown\""));
    }
}
