//! Shared configuration for the sentra console.
//!
//! A TOML file under the platform config directory, merged with
//! `SENTRA_`-prefixed environment variables, and translated to the
//! transport settings the gateway client needs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sentra_api::TransportConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level TOML configuration for the console.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Gateway base URL (e.g., "http://192.168.1.10:8080").
    #[serde(default = "default_gateway")]
    pub gateway: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Page size for the point list.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Directory for the log file. Defaults to the platform data dir.
    pub log_dir: Option<PathBuf>,

    /// Log filter, `tracing_subscriber::EnvFilter` syntax.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway: default_gateway(),
            timeout: default_timeout(),
            page_size: default_page_size(),
            log_dir: None,
            log_level: default_log_level(),
        }
    }
}

fn default_gateway() -> String {
    "http://127.0.0.1:8080".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    20
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Parse the configured gateway URL.
    pub fn gateway_url(&self) -> Result<url::Url, ConfigError> {
        self.gateway.parse().map_err(|_| ConfigError::Validation {
            field: "gateway".into(),
            reason: format!("invalid URL: {}", self.gateway),
        })
    }

    /// Transport settings for the gateway client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "sentra", "sentra")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default directory for the log file.
pub fn log_dir() -> PathBuf {
    project_dirs().map_or_else(dirs_fallback, |dirs| dirs.data_local_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("sentra");
    p
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the config from an explicit file path plus the environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SENTRA_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Serialize config to TOML and write it to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::{Config, load_config_from};

    #[test]
    fn defaults_apply_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.gateway, "http://127.0.0.1:8080");
        assert_eq!(cfg.timeout, 30);
        assert_eq!(cfg.page_size, 20);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "gateway = \"http://10.0.0.5:9000\"\ntimeout = 5\nlog_level = \"debug\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.gateway, "http://10.0.0.5:9000");
        assert_eq!(cfg.timeout, 5);
        assert_eq!(cfg.page_size, 20); // untouched default
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn gateway_url_validation() {
        let cfg = Config {
            gateway: "not a url".into(),
            ..Config::default()
        };
        assert!(cfg.gateway_url().is_err());
        assert!(Config::default().gateway_url().is_ok());
    }

    #[test]
    fn transport_carries_timeout() {
        let cfg = Config {
            timeout: 7,
            ..Config::default()
        };
        assert_eq!(cfg.transport().timeout.as_secs(), 7);
    }
}
