//! Configuration loading.
//!
//! Reads `~/.auditora/config.toml` (or `$AUDITORA_CONFIG_PATH`, or the path
//! given on the command line). Environment variables override file values;
//! file values override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where snapshots and the catalog live.
    pub paths: PathsConfig,
    /// Log level and optional file output.
    pub logging: LoggingConfig,
}

/// Filesystem locations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Snapshot directory. Defaults to `~/.auditora/data`.
    pub data_dir: Option<PathBuf>,
    /// Catalog TOML replacing the built-in one.
    pub catalog: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Also write daily-rotated JSON logs.
    pub file: bool,
    /// Directory for log files. Defaults to `~/.auditora/logs`.
    pub logs_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: false,
            logs_dir: None,
        }
    }
}

impl Config {
    /// Load configuration with precedence env > file > defaults.
    ///
    /// `explicit` wins over `$AUDITORA_CONFIG_PATH`. A missing file yields
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => Self::config_path_with(|key| std::env::var(key).ok())?,
        };
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from a TOML file only, no env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                Self::from_toml(&contents)
                    .with_context(|| format!("invalid config file {}", path.display()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "failed to read config file {}: {e}",
                path.display()
            )),
        }
    }

    /// Resolve the config path using a custom env resolver.
    ///
    /// Checks `$AUDITORA_CONFIG_PATH` first, then `~/.auditora/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn config_path_with(env: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
        if let Some(p) = env("AUDITORA_CONFIG_PATH") {
            return Ok(PathBuf::from(p));
        }
        Ok(app_dir()?.join("config.toml"))
    }

    /// Apply environment variable overrides.
    ///
    /// Takes a resolver function so tests need not touch the process env.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("AUDITORA_DATA_DIR") {
            self.paths.data_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = env("AUDITORA_CATALOG") {
            self.paths.catalog = Some(PathBuf::from(v));
        }
        if let Some(v) = env("AUDITORA_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = env("AUDITORA_LOG_FILE") {
            match v.parse() {
                Ok(b) => self.logging.file = b,
                Err(_) => tracing::warn!(
                    var = "AUDITORA_LOG_FILE",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
    }

    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or unexpected value types.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }

    /// Snapshot directory, falling back to `~/.auditora/data`.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the home directory
    /// cannot be determined.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.paths.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(app_dir()?.join("data")),
        }
    }

    /// Log directory, falling back to `~/.auditora/logs`.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the home directory
    /// cannot be determined.
    pub fn logs_dir(&self) -> Result<PathBuf> {
        match &self.logging.logs_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(app_dir()?.join("logs")),
        }
    }
}

/// Resolve `~/.auditora`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn app_dir() -> Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".auditora"))
}
