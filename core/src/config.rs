//! Client configuration: where the provider lives and how to authenticate.

use std::fmt;
use std::time::Duration;

use crate::error::{ApiError, Result};

/// Root of the provider's v2 API.
pub const DEFAULT_BASE_URL: &str = "https://api.digitalocean.com/v2";

pub const ENV_API_TOKEN: &str = "DNSHOST_API_TOKEN";
pub const ENV_BASE_URL: &str = "DNSHOST_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "DNSHOST_TIMEOUT_SECS";

/// Credentials and transport settings, read-only once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    api_token: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: api_token.into(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a configuration from `DNSHOST_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup(ENV_API_TOKEN)
            .ok_or_else(|| ApiError::config(format!("{ENV_API_TOKEN} is not set")))?;
        let mut config = Self::new(token);

        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&base_url);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs
                .parse()
                .map_err(|_| ApiError::config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(ApiError::config("API token must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::config(format!(
                "base URL must start with http:// or https://, got {}",
                self.base_url
            )));
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Full URL for a path relative to the API root.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_provider_api_root() {
        let config = ClientConfig::new("token");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), None);
        assert_eq!(config.url_for("domains/1"), "https://api.digitalocean.com/v2/domains/1");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("token").with_base_url("http://localhost:3000/");
        assert_eq!(config.url_for("/domains"), "http://localhost:3000/domains");
    }

    #[test]
    fn reads_environment() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_TOKEN, "secret"),
            (ENV_BASE_URL, "http://127.0.0.1:8080"),
            (ENV_TIMEOUT_SECS, "15"),
        ]))
        .unwrap();
        assert_eq!(config.api_token(), "secret");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ApiError::Config(ref msg) if msg.contains(ENV_API_TOKEN)));
    }

    #[test]
    fn bad_timeout_and_scheme_are_rejected() {
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_API_TOKEN, "t"), (ENV_TIMEOUT_SECS, "soon")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_API_TOKEN, "t"), (ENV_BASE_URL, "ftp://x")])).is_err());
        assert!(ClientConfig::new("  ").validate().is_err());
    }

    #[test]
    fn debug_hides_token() {
        let rendered = format!("{:?}", ClientConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
