//! Client configuration.

use std::time::Duration;

use reqwest::Url;

use crate::error::{Error, Result};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://rentahuman.ai/api";

/// Environment variable consulted when no API key is set explicitly.
pub const API_KEY_ENV: &str = "RENTAHUMAN_API_KEY";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Immutable configuration shared read-only by every request the client
/// issues. Built once, then handed to [`crate::Client::with_config`].
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
    pub(crate) timeout: Duration,
    pub(crate) max_retries: u32,
}

impl Default for Config {
    /// Defaults: production base URL, API key from `RENTAHUMAN_API_KEY`
    /// when present, 30 second timeout, 3 retries.
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty()),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Config {
    /// API key for write operations. Read-only operations work without
    /// one. Sent only as a request header, never in the URL.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the API base URL. Validated as HTTPS when the client is
    /// constructed.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-attempt request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Hard ceiling on retries after the initial attempt. Zero disables
    /// retrying entirely.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Parse and validate the base URL: HTTPS only, loopback hosts
    /// excepted so local test servers remain reachable. Trailing slashes
    /// are trimmed. Fails before any request is attempted.
    pub(crate) fn validated_base_url(&self) -> Result<String> {
        let trimmed = self.base_url.trim_end_matches('/');
        let url = Url::parse(trimmed).map_err(|error| {
            Error::Validation(format!("invalid base URL {trimmed:?}: {error}"))
        })?;
        match url.scheme() {
            "https" => {}
            "http" if is_loopback(&url) => {}
            scheme => {
                return Err(Error::Validation(format!(
                    "base URL must use https, got {scheme:?}"
                )));
            }
        }
        Ok(trimmed.to_string())
    }
}

fn is_loopback(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<std::net::IpAddr>()
        .map(|ip| ip.is_loopback())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_base_urls_validate_and_trim() {
        let config = Config::default().with_base_url("https://staging.rentahuman.ai/api/");
        assert_eq!(
            config.validated_base_url().ok().as_deref(),
            Some("https://staging.rentahuman.ai/api")
        );
    }

    #[test]
    fn plain_http_is_rejected_for_remote_hosts() {
        let config = Config::default().with_base_url("http://rentahuman.ai/api");
        assert!(matches!(
            config.validated_base_url(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn loopback_http_is_allowed_for_test_servers() {
        for base in ["http://127.0.0.1:8080", "http://localhost:8080/api"] {
            let config = Config::default().with_base_url(base);
            assert!(config.validated_base_url().is_ok(), "{base} should pass");
        }
    }

    #[test]
    fn garbage_urls_are_rejected() {
        let config = Config::default().with_base_url("not a url");
        assert!(matches!(
            config.validated_base_url(),
            Err(Error::Validation(_))
        ));
    }
}
