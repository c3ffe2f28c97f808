//! Server configuration read from the environment.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use barback_core::DEFAULT_TTL;
use barback_engine::{CatalogSettings, FetchSettings};
use barback_logging::{barback_info, LogDestination};
use log::LevelFilter;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {message}")]
    Invalid {
        key: &'static str,
        value: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Upstream document URL; `None` leaves the server up but every data query fails.
    pub csv_url: Option<String>,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub bind_addr: String,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = match var("BIND_ADDR") {
            Some(addr) => addr,
            None => {
                let port: u16 = parse_or("PORT", var("PORT"), DEFAULT_PORT)?;
                format!("0.0.0.0:{port}")
            }
        };

        Ok(Self {
            csv_url: var("CSV_URL"),
            cache_ttl: Duration::from_secs(parse_or(
                "CACHE_TTL_SECONDS",
                var("CACHE_TTL_SECONDS"),
                DEFAULT_TTL.as_secs(),
            )?),
            fetch_timeout: Duration::from_secs(parse_or(
                "FETCH_TIMEOUT_SECONDS",
                var("FETCH_TIMEOUT_SECONDS"),
                DEFAULT_FETCH_TIMEOUT_SECS,
            )?),
            bind_addr,
            log_level: parse_or("LOG_LEVEL", var("LOG_LEVEL"), LevelFilter::Info)?,
            log_file: var("LOG_FILE").map(PathBuf::from),
        })
    }

    pub fn catalog_settings(&self) -> CatalogSettings {
        CatalogSettings {
            source_url: self.csv_url.clone(),
            ttl: self.cache_ttl,
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: self.fetch_timeout,
            ..FetchSettings::default()
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::Both(path.clone()),
            None => LogDestination::Terminal,
        }
    }

    /// Logs the effective settings once the logger is up.
    pub fn log_summary(&self) {
        match &self.csv_url {
            Some(url) => barback_info!("CSV_URL set: {}", url),
            None => barback_info!("CSV_URL not set; recipe queries will fail until configured"),
        }
        barback_info!(
            "cache_ttl={}s fetch_timeout={}s bind={}",
            self.cache_ttl.as_secs(),
            self.fetch_timeout.as_secs(),
            self.bind_addr
        );
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|err: T::Err| ConfigError::Invalid {
            key,
            message: err.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use log::LevelFilter;

    use super::{ConfigError, ServerConfig};

    fn config(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.csv_url, None);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.fetch_timeout, Duration::from_secs(20));
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn values_are_trimmed_and_blank_means_unset() {
        let cfg = config(&[
            ("CSV_URL", "  https://example.com/r.csv \n"),
            ("PORT", "9000"),
            ("CACHE_TTL_SECONDS", "5"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FILE", " "),
        ])
        .unwrap();
        assert_eq!(cfg.csv_url.as_deref(), Some("https://example.com/r.csv"));
        assert_eq!(cfg.bind_addr, "0.0.0.0:9000");
        assert_eq!(cfg.cache_ttl, Duration::from_secs(5));
        assert_eq!(cfg.log_level, LevelFilter::Debug);
        assert_eq!(cfg.log_file, None);

        assert_eq!(config(&[("CSV_URL", "   ")]).unwrap().csv_url, None);
    }

    #[test]
    fn bind_addr_overrides_port() {
        let config = config(&[("BIND_ADDR", "127.0.0.1:3000"), ("PORT", "9000")]).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
    }

    #[test]
    fn invalid_numbers_are_errors() {
        let err = config(&[("CACHE_TTL_SECONDS", "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "CACHE_TTL_SECONDS",
                ..
            }
        ));
        assert!(config(&[("PORT", "99999")]).is_err());
    }
}
