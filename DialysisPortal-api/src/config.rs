//! Service configuration.
//!
//! Resolved once at startup from the environment (after `.env` is loaded) and
//! passed into the router; request handlers never read environment variables.

use std::time::Duration;

use thiserror::Error;

use dialysis_portal_data::repository::PortalApiConfig;
use dialysis_portal_domain::services::HistoryServiceConfig;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_SESSION_FETCH_LIMIT: usize = 500;
pub const DEFAULT_SYMPTOM_PAGE_SIZE: usize = 100;
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration of the HTTP service
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,

    /// Portal REST API base URL
    pub portal_base_url: String,

    pub portal_timeout: Duration,
    pub session_fetch_limit: usize,
    pub symptom_page_size: usize,

    /// Deployment environment name reported by the health endpoint
    pub environment: String,
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let portal_base_url = lookup("PORTAL_API_BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("PORTAL_API_BASE_URL"))?;
        if !(portal_base_url.starts_with("http://") || portal_base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "PORTAL_API_BASE_URL",
                value: portal_base_url,
            });
        }

        let timeout_secs: u64 = parse_or(&lookup, "PORTAL_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let session_fetch_limit = parse_or(&lookup, "SESSION_FETCH_LIMIT", DEFAULT_SESSION_FETCH_LIMIT)?;
        let symptom_page_size = parse_or(&lookup, "SYMPTOM_PAGE_SIZE", DEFAULT_SYMPTOM_PAGE_SIZE)?;
        if symptom_page_size == 0 {
            return Err(ConfigError::Invalid {
                name: "SYMPTOM_PAGE_SIZE",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            portal_base_url,
            portal_timeout: Duration::from_secs(timeout_secs),
            session_fetch_limit,
            symptom_page_size,
            environment: lookup("APP_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
        })
    }

    pub fn portal_api_config(&self) -> PortalApiConfig {
        PortalApiConfig::new(self.portal_base_url.clone(), self.portal_timeout)
    }

    pub fn history_config(&self) -> HistoryServiceConfig {
        HistoryServiceConfig {
            session_fetch_limit: self.session_fetch_limit,
            symptom_page_size: self.symptom_page_size,
            ..HistoryServiceConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = AppConfig::from_lookup(lookup(&[("PORTAL_API_BASE_URL", "https://portal.example.org/api")]))
            .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.portal_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.session_fetch_limit, 500);
        assert_eq!(config.symptom_page_size, 100);
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_base_url_required() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])),
            Err(ConfigError::Missing("PORTAL_API_BASE_URL"))
        );
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("PORTAL_API_BASE_URL", "portal.local")])),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let result = AppConfig::from_lookup(lookup(&[
            ("PORTAL_API_BASE_URL", "http://localhost:8080"),
            ("PORT", "abc"),
        ]));

        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                name: "PORT",
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_history_config_mapping() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORTAL_API_BASE_URL", "http://localhost:8080"),
            ("SESSION_FETCH_LIMIT", "200"),
            ("SYMPTOM_PAGE_SIZE", "25"),
        ]))
        .unwrap();

        let history = config.history_config();
        assert_eq!(history.session_fetch_limit, 200);
        assert_eq!(history.symptom_page_size, 25);
        assert_eq!(config.portal_api_config().base_url, "http://localhost:8080");
    }
}
