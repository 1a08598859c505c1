//! Configuration module for mailrelay.

use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

use crate::{RelayError, Result};

/// Environment variable overriding `storage.data_dir`.
pub const DATA_DIR_ENV: &str = "MAILRELAY_DATA_DIR";

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which storage variant to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON files on disk.
    #[default]
    Json,
    /// Process memory only; nothing survives a restart.
    Memory,
}

/// What to do when a persisted collection cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Report to the read-failure hook and read the collection as empty.
    #[default]
    Empty,
    /// Report to the read-failure hook and fail the operation.
    Error,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage variant.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory holding the collection files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// File name of the users collection.
    #[serde(default = "default_users_file")]
    pub users_file: String,
    /// File name of the messages collection.
    #[serde(default = "default_messages_file")]
    pub messages_file: String,
    /// Handling of unparsable collection files.
    #[serde(default)]
    pub on_corrupt: CorruptPolicy,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_users_file() -> String {
    "users.json".to_string()
}

fn default_messages_file() -> String {
    "messages.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            users_file: default_users_file(),
            messages_file: default_messages_file(),
            on_corrupt: CorruptPolicy::default(),
        }
    }
}

impl StorageConfig {
    /// Create a JSON storage config rooted at `data_dir` with default file names.
    pub fn json(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_string_lossy().into_owned(),
            ..Self::default()
        }
    }

    /// Validate the storage section.
    ///
    /// Both file names must be plain names (no separators, `.` or `..`) and
    /// must differ, so the two collections never share a file.
    pub fn validate(&self) -> Result<()> {
        check_file_name("users_file", &self.users_file)?;
        check_file_name("messages_file", &self.messages_file)?;
        if self.users_file == self.messages_file {
            return Err(RelayError::Config(
                "users and messages must be stored in different files".to_string(),
            ));
        }
        Ok(())
    }

    /// Full path of the users file.
    pub fn users_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.users_file)
    }

    /// Full path of the messages file.
    pub fn messages_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.messages_file)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty means console only.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/mailrelay.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RelayError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| RelayError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `MAILRELAY_DATA_DIR`: Override the storage data directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(data_dir) = std::env::var(DATA_DIR_ENV) {
            if !data_dir.is_empty() {
                self.storage.data_dir = data_dir;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The server port is zero
    /// - The storage section is invalid (see [`StorageConfig::validate`])
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(RelayError::Config("server.port must not be 0".to_string()));
        }
        self.storage.validate()
    }
}

/// Check that `name` is a single plain file name inside the data directory.
fn check_file_name(key: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(RelayError::Config(format!("storage.{key} must be set")));
    }
    let mut components = Path::new(name).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(first)), None) if first == name
    );
    if !plain || name.contains(['/', '\\']) {
        return Err(RelayError::Config(format!(
            "storage.{key} must be a plain file name, got {name:?}"
        )));
    }
    Ok(())
}
