//! Service configuration read from the environment.

use std::env;
use std::path::PathBuf;

const DEFAULT_ORIGIN: &str = "http://localhost:5173";

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// `*`: any origin, without credentials.
    Any,
    List(Vec<String>),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Cross-origin callers allowed by the CORS layer
    pub allowed_origins: AllowedOrigins,
    /// JSON snapshot of the collection; in-memory only when unset
    pub data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            allowed_origins: AllowedOrigins::List(vec![DEFAULT_ORIGIN.to_string()]),
            data_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Missing keys fall back to
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) => parse_origins(&raw)?,
            None => defaults.allowed_origins,
        };

        let data_file = lookup("TODO_DATA_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            allowed_origins,
            data_file,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Result<AllowedOrigins, ConfigError> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    if origins.iter().any(|origin| origin == "*") {
        return Ok(AllowedOrigins::Any);
    }
    if origins.is_empty() {
        return Err(ConfigError::NoOrigins);
    }
    if let Some(bad) = origins
        .iter()
        .find(|origin| axum::http::HeaderValue::from_str(origin).is_err())
    {
        return Err(ConfigError::InvalidOrigin(bad.clone()));
    }
    Ok(AllowedOrigins::List(origins))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT value: {0:?}")]
    InvalidPort(String),

    #[error("ALLOWED_ORIGINS is set but lists no origins")]
    NoOrigins,

    #[error("invalid origin in ALLOWED_ORIGINS: {0:?}")]
    InvalidOrigin(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr(), "127.0.0.1:5000");
        assert_eq!(
            config.allowed_origins,
            AllowedOrigins::List(vec!["http://localhost:5173".to_string()])
        );
        assert!(config.data_file.is_none());
    }

    #[test]
    fn reads_port_and_host() {
        let config = config_from(&[("HOST", "0.0.0.0"), ("PORT", "8080")]).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn rejects_bad_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(p) if p == "eighty"));
    }

    #[test]
    fn splits_origin_list() {
        let config = config_from(&[(
            "ALLOWED_ORIGINS",
            "https://todo.example.com, http://localhost:5173,",
        )])
        .unwrap();
        assert_eq!(
            config.allowed_origins,
            AllowedOrigins::List(vec![
                "https://todo.example.com".to_string(),
                "http://localhost:5173".to_string(),
            ])
        );
    }

    #[test]
    fn wildcard_origin_means_any() {
        let config = config_from(&[("ALLOWED_ORIGINS", "*")]).unwrap();
        assert_eq!(config.allowed_origins, AllowedOrigins::Any);
    }

    #[test]
    fn blank_origin_list_is_an_error() {
        let err = config_from(&[("ALLOWED_ORIGINS", " , ")]).unwrap_err();
        assert!(matches!(err, ConfigError::NoOrigins));
    }

    #[test]
    fn empty_data_file_is_ignored() {
        let config = config_from(&[("TODO_DATA_FILE", "  ")]).unwrap();
        assert!(config.data_file.is_none());

        let config = config_from(&[("TODO_DATA_FILE", "/tmp/todos.json")]).unwrap();
        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/todos.json")));
    }
}
