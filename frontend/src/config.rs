//! Client configuration.
//!
//! Values come from built-in defaults, then an optional YAML file, then
//! environment variables (highest precedence):
//!
//! | Variable | Field |
//! |---|---|
//! | `CREDIWISE_CONFIG` | path of the YAML file |
//! | `CREDIWISE_API_URL` | `api_base_url` |
//! | `CREDIWISE_TIMEOUT_SECS` | `request_timeout_secs` |
//! | `CREDIWISE_SESSION_PATH` | `session_path` |
//! | `CREDIWISE_LOG` | `log_level` |

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const APP_DIR: &str = "crediwise";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin every API path is joined onto
    pub api_base_url: String,
    /// Upper bound on a single request, connect through body
    pub request_timeout_secs: u64,
    /// Where the session file lives; defaults to the platform data directory
    pub session_path: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load defaults, the YAML file (if any) and environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("CREDIWISE_CONFIG")
            .ok()
            .map(PathBuf::from)
            .or_else(default_config_path);

        let mut config = match file {
            Some(path) if path.exists() => {
                info!("Loading configuration from {}", path.display());
                Self::from_yaml_file(&path)?
            }
            _ => {
                debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `CREDIWISE_*` overrides using `lookup` to read variables
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CREDIWISE_API_URL") {
            self.api_base_url = url;
        }
        if let Some(raw) = lookup("CREDIWISE_TIMEOUT_SECS") {
            self.request_timeout_secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: "CREDIWISE_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
        }
        if let Some(path) = lookup("CREDIWISE_SESSION_PATH") {
            self.session_path = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup("CREDIWISE_LOG") {
            self.log_level = level;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolved location of the persisted session
    pub fn session_file(&self) -> PathBuf {
        match &self.session_path {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("session.json"),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.session_file().ends_with("crediwise/session.json"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CREDIWISE_API_URL", "http://api.internal:9000"),
            ("CREDIWISE_TIMEOUT_SECS", "5"),
            ("CREDIWISE_SESSION_PATH", "/tmp/cw/session.json"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config
            .apply_env(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_base_url, "http://api.internal:9000");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.session_file(), PathBuf::from("/tmp/cw/session.json"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let mut config = ClientConfig::default();
        let result = config.apply_env(|key| {
            (key == "CREDIWISE_TIMEOUT_SECS").then(|| "soon".to_string())
        });

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "CREDIWISE_TIMEOUT_SECS", .. })
        ));
    }

    #[test]
    fn test_yaml_file_fills_missing_fields_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "api_base_url: http://127.0.0.1:8000\nlog_level: debug\n").unwrap();

        let config = ClientConfig::from_yaml_file(&path).unwrap();

        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.request_timeout_secs, 30);
    }
}
