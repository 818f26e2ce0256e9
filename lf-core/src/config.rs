//! Application configuration management.
//!
//! Holds the persisted storage backend choice, database settings, report
//! output location and logging preferences. Configuration is persisted as
//! TOML on disk.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use serde::{Deserialize, Serialize};

use crate::constants::{DB_FILE_NAME, DEFAULT_EVENT_CAPACITY, FILE_CACHE_NAME};
use crate::error::{LfError, LfResult};
use crate::paths;

/// Which storage provider backs the register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Embedded SQLite database, durable on this device.
    #[serde(alias = "indexeddb")]
    Database,
    /// In-memory tables with explicit save/load to a portable file.
    File,
}

impl StorageType {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Database => "database",
            StorageType::File => "file",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = LfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "database" | "db" | "indexeddb" | "local" => Ok(StorageType::Database),
            "file" | "cloud" => Ok(StorageType::File),
            other => Err(LfError::Config(format!("unsupported storage type: {other}"))),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storage backend selection and locations.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Embedded database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Change notification settings.
    #[serde(default)]
    pub events: EventConfig,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Active backend, persisted across restarts.
    #[serde(default = "default_backend")]
    pub backend: StorageType,

    /// Directory receiving generated reports. If empty, uses default location.
    #[serde(default)]
    pub reports_dir: String,

    /// Transient snapshot used by the file provider between sessions.
    /// If empty, uses default location.
    #[serde(default)]
    pub file_cache_path: String,
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. If empty, uses default location.
    #[serde(default)]
    pub path: String,

    /// Enable WAL (Write-Ahead Logging) mode.
    #[serde(default = "default_true")]
    pub wal_mode: bool,

    /// Maximum number of connections in the pool.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Run `PRAGMA integrity_check` when the provider connects.
    #[serde(default = "default_true")]
    pub integrity_check_on_connect: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

/// Change notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// Broadcast channel capacity.
    #[serde(default = "default_event_capacity")]
    pub channel_capacity: usize,
}

// Default value functions for serde

fn default_backend() -> StorageType {
    StorageType::Database
}

fn default_true() -> bool {
    true
}

fn default_pool_size() -> u32 {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            reports_dir: String::new(),
            file_cache_path: String::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            wal_mode: true,
            pool_size: default_pool_size(),
            integrity_check_on_connect: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_event_capacity(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> LfResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> LfResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> LfResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| LfError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> LfResult<PathBuf> {
        Ok(paths::config_dir()?.join("config.toml"))
    }

    /// Effective database path, using the configured path or the default.
    pub fn effective_db_path(&self) -> LfResult<PathBuf> {
        if self.database.path.is_empty() {
            Ok(paths::data_dir()?.join(DB_FILE_NAME))
        } else {
            Ok(PathBuf::from(&self.database.path))
        }
    }

    /// Effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> LfResult<PathBuf> {
        if self.logging.directory.is_empty() {
            Ok(paths::data_dir()?.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }

    /// Effective report output directory.
    pub fn effective_reports_dir(&self) -> LfResult<PathBuf> {
        if self.storage.reports_dir.is_empty() {
            Ok(paths::data_dir()?.join("reports"))
        } else {
            Ok(PathBuf::from(&self.storage.reports_dir))
        }
    }

    /// Effective location of the file provider's cache snapshot.
    pub fn effective_file_cache_path(&self) -> LfResult<PathBuf> {
        if self.storage.file_cache_path.is_empty() {
            Ok(paths::cache_dir()?.join(FILE_CACHE_NAME))
        } else {
            Ok(PathBuf::from(&self.storage.file_cache_path))
        }
    }

    /// Build a configuration whose every location lives under `root`.
    ///
    /// Used by tests and portable installs.
    pub fn rooted_at(root: &Path) -> Self {
        let mut config = Self::default();
        config.database.path = root.join(DB_FILE_NAME).display().to_string();
        config.logging.directory = root.join("logs").display().to_string();
        config.storage.reports_dir = root.join("reports").display().to_string();
        config.storage.file_cache_path = root.join(FILE_CACHE_NAME).display().to_string();
        config
    }
}

/// Thread-safe configuration holder for shared access.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<AppConfig>>,
    path: Option<PathBuf>,
}

impl ConfigHandle {
    /// Create a handle that saves to the default config path.
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path: None,
        }
    }

    /// Create a handle that saves to an explicit file.
    pub fn with_path(config: AppConfig, path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path: Some(path.into()),
        }
    }

    /// Read the configuration.
    pub async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, AppConfig> {
        self.inner.read().await
    }

    /// Write/update the configuration.
    pub async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, AppConfig> {
        self.inner.write().await
    }

    /// File this handle persists to.
    pub fn path(&self) -> LfResult<PathBuf> {
        match &self.path {
            Some(p) => Ok(p.clone()),
            None => AppConfig::default_config_path(),
        }
    }

    /// Save the current configuration to disk.
    pub async fn save(&self) -> LfResult<()> {
        let path = self.path()?;
        let config = self.inner.read().await;
        config.save_to_file(&path)
    }
}
