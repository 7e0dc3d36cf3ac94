//! Environment configuration
//!
//! Loaded once at startup after `dotenvy` has populated the process
//! environment from `.env`.

use anyhow::{anyhow, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the debate backend, without trailing slash
    pub api_url: String,
    /// Sent as `X-CSRFToken` on mutating calls
    pub csrf_token: Option<String>,
    /// Credentials for automatic login; both must be set
    pub username: Option<String>,
    pub password: Option<String>,
    pub http_timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment in
    /// production, a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = non_empty("DEBATO_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(anyhow!(
                "DEBATO_API_URL must start with http:// or https://, got '{}'",
                api_url
            ));
        }

        let http_timeout_secs = match non_empty("DEBATO_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow!("DEBATO_HTTP_TIMEOUT_SECS must be a whole number, got '{}'", raw))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let username = non_empty("DEBATO_USERNAME");
        let password = non_empty("DEBATO_PASSWORD");
        if username.is_some() != password.is_some() {
            return Err(anyhow!(
                "DEBATO_USERNAME and DEBATO_PASSWORD must be set together"
            ));
        }

        Ok(Config {
            api_url,
            csrf_token: non_empty("DEBATO_CSRF_TOKEN"),
            username,
            password,
            http_timeout: Duration::from_secs(http_timeout_secs),
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// Credentials for automatic login, if configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => Some((u.as_str(), p.as_str())),
            _ => None,
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
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.log_level, "info");
        assert!(config.csrf_token.is_none());
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = Config::from_lookup(lookup(&[("DEBATO_API_URL", "https://debato.example/")])).unwrap();
        assert_eq!(config.api_url, "https://debato.example");
    }

    #[test]
    fn test_rejects_bad_url_and_timeout() {
        assert!(Config::from_lookup(lookup(&[("DEBATO_API_URL", "ftp://nope")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DEBATO_HTTP_TIMEOUT_SECS", "soon")])).is_err());
    }

    #[test]
    fn test_credentials_must_be_paired() {
        assert!(Config::from_lookup(lookup(&[("DEBATO_USERNAME", "ana")])).is_err());

        let config = Config::from_lookup(lookup(&[
            ("DEBATO_USERNAME", "ana"),
            ("DEBATO_PASSWORD", "hunter22"),
            ("DEBATO_CSRF_TOKEN", "tok"),
        ]))
        .unwrap();
        assert_eq!(config.credentials(), Some(("ana", "hunter22")));
        assert_eq!(config.csrf_token.as_deref(), Some("tok"));
    }
}
