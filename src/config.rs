//! Configuration loading and management
//!
//! Handles parsing of `todo.toml` from the data directory, and resolving
//! which data directory to use in the first place.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the configuration file inside the data directory
pub const CONFIG_FILENAME: &str = "todo.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage key layout
    #[serde(default)]
    pub storage: StorageConfig,

    /// Mocked authentication rules
    #[serde(default)]
    pub auth: AuthConfig,

    /// Simulated round-trip latency per operation
    #[serde(default)]
    pub latency: LatencyConfig,
}

/// Storage key configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key holding the serialized signed-in user
    #[serde(default = "default_session_key")]
    pub session_key: String,

    /// Key (or key prefix, when partitioned) holding the task collection
    #[serde(default = "default_tasks_key")]
    pub tasks_key: String,

    /// Keep one task collection per user id instead of a single shared one
    #[serde(default = "default_partition_by_user")]
    pub partition_by_user: bool,
}

fn default_session_key() -> String {
    "todoapp_user".to_string()
}

fn default_tasks_key() -> String {
    "todoapp_tasks".to_string()
}

fn default_partition_by_user() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            session_key: default_session_key(),
            tasks_key: default_tasks_key(),
            partition_by_user: default_partition_by_user(),
        }
    }
}

impl StorageConfig {
    /// Storage key of the task collection owned by `user_id`
    pub fn tasks_key_for(&self, user_id: &str) -> String {
        if self.partition_by_user {
            format!("{}:{}", self.tasks_key, user_id)
        } else {
            self.tasks_key.clone()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.session_key.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "storage.session_key cannot be empty".to_string(),
            ));
        }
        if self.tasks_key.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "storage.tasks_key cannot be empty".to_string(),
            ));
        }
        if self.session_key == self.tasks_key {
            return Err(Error::InvalidConfig(
                "storage.session_key and storage.tasks_key must differ".to_string(),
            ));
        }
        Ok(())
    }
}

/// Mocked authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Minimum password length, in characters
    #[serde(default = "default_min_password_len")]
    pub min_password_len: usize,

    /// Display name used when the email has no local-part
    #[serde(default = "default_fallback_name")]
    pub fallback_name: String,
}

fn default_min_password_len() -> usize {
    6
}

fn default_fallback_name() -> String {
    "User".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_len: default_min_password_len(),
            fallback_name: default_fallback_name(),
        }
    }
}

impl AuthConfig {
    fn validate(&self) -> Result<()> {
        if self.min_password_len == 0 {
            return Err(Error::InvalidConfig(
                "auth.min_password_len must be at least 1".to_string(),
            ));
        }
        if self.fallback_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "auth.fallback_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Simulated latency, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    #[serde(default = "default_login_ms")]
    pub login_ms: u64,

    #[serde(default = "default_signup_ms")]
    pub signup_ms: u64,

    #[serde(default = "default_add_ms")]
    pub add_ms: u64,

    #[serde(default = "default_update_ms")]
    pub update_ms: u64,

    #[serde(default = "default_remove_ms")]
    pub remove_ms: u64,
}

fn default_login_ms() -> u64 {
    1000
}

fn default_signup_ms() -> u64 {
    1000
}

fn default_add_ms() -> u64 {
    500
}

fn default_update_ms() -> u64 {
    300
}

fn default_remove_ms() -> u64 {
    300
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            login_ms: default_login_ms(),
            signup_ms: default_signup_ms(),
            add_ms: default_add_ms(),
            update_ms: default_update_ms(),
            remove_ms: default_remove_ms(),
        }
    }
}

impl LatencyConfig {
    /// No simulated delay at all
    pub fn zero() -> Self {
        Self {
            login_ms: 0,
            signup_ms: 0,
            add_ms: 0,
            update_ms: 0,
            remove_ms: 0,
        }
    }

    pub fn login(&self) -> Duration {
        Duration::from_millis(self.login_ms)
    }

    pub fn signup(&self) -> Duration {
        Duration::from_millis(self.signup_ms)
    }

    pub fn add(&self) -> Duration {
        Duration::from_millis(self.add_ms)
    }

    pub fn update(&self) -> Duration {
        Duration::from_millis(self.update_ms)
    }

    pub fn remove(&self) -> Duration {
        Duration::from_millis(self.remove_ms)
    }
}

impl Config {
    /// Load configuration from a `todo.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

/// Resolve the data directory.
///
/// Resolution order:
/// 1) Explicit path (CLI `--data-dir` or `TODO_DATA_DIR`)
/// 2) Platform data directory for the application
/// 3) `.todo` in the current directory
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }

    directories::ProjectDirs::from("", "", "todoapp")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".todo"))
}
