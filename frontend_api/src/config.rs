//! Client configuration: base URL, timeout, and default headers.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::Error;

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "VITE_API_BASE_URL";
/// Base URL used when the environment does not override it.
pub const DEFAULT_BASE_URL: &str = "/api";
/// Per-request timeout applied to every outbound request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);
/// Origin that relative base URLs are resolved against.
pub const DEFAULT_ORIGIN: &str = "http://localhost";

/// Picks the configured base URL, falling back to [`DEFAULT_BASE_URL`]
/// when the override is unset or empty.
pub fn resolve_base_url(env_override: Option<String>) -> String {
    match env_override {
        Some(url) if !url.is_empty() => url,
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub default_headers: HeaderMap,
    /// Origin for relative base URLs. Ignored when `base_url` is absolute.
    pub origin: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            default_headers,
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads the base URL override from the environment, loading a `.env`
    /// file from the working directory first when one exists.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Failed to load .env: {}", e);
            }
        }
        let base_url = resolve_base_url(std::env::var(BASE_URL_ENV).ok());
        tracing::debug!("API base URL: {}", base_url);
        Self::default().with_base_url(&base_url)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = origin.to_string();
        self
    }

    /// Adds or replaces a header sent on every request.
    pub fn with_default_header(mut self, name: &str, value: &str) -> Result<Self, Error> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// The base URL as an absolute URL string, without a trailing slash.
    pub(crate) fn absolute_base_url(&self) -> String {
        let base = if self.base_url.starts_with("http://") || self.base_url.starts_with("https://")
        {
            self.base_url.clone()
        } else {
            format!(
                "{}/{}",
                self.origin.trim_end_matches('/'),
                self.base_url.trim_start_matches('/')
            )
        };
        base.trim_end_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that mutate the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn from_env_reads_override() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var(BASE_URL_ENV, "https://example.com/api");
        let config = ClientConfig::from_env();
        std::env::remove_var(BASE_URL_ENV);

        assert_eq!(config.base_url, "https://example.com/api");
        assert_eq!(config.absolute_base_url(), "https://example.com/api");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn from_env_empty_override_falls_back() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var(BASE_URL_ENV, "");
        let config = ClientConfig::from_env();
        std::env::remove_var(BASE_URL_ENV);

        assert_eq!(config.base_url, "/api");
    }

    #[test]
    fn unset_override_uses_default() {
        assert_eq!(resolve_base_url(None), "/api");
        assert_eq!(resolve_base_url(Some(String::new())), "/api");
    }

    #[test]
    fn whitespace_override_kept() {
        assert_eq!(resolve_base_url(Some("  ".to_string())), "  ");
    }

    #[test]
    fn override_used_verbatim() {
        assert_eq!(
            resolve_base_url(Some("https://example.com/api".to_string())),
            "https://example.com/api"
        );
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "/api");
        assert_eq!(config.timeout, Duration::from_millis(10000));
        assert_eq!(
            config.default_headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn relative_base_resolves_against_origin() {
        let config = ClientConfig::default().with_origin("http://127.0.0.1:8080/");
        assert_eq!(config.absolute_base_url(), "http://127.0.0.1:8080/api");
    }

    #[test]
    fn absolute_base_ignores_origin() {
        let config = ClientConfig::default()
            .with_base_url("https://example.com/api/")
            .with_origin("http://ignored");
        assert_eq!(config.absolute_base_url(), "https://example.com/api");
    }

    #[test]
    fn default_header_validation() {
        let config = ClientConfig::default()
            .with_default_header("X-Client", "web")
            .unwrap();
        assert_eq!(config.default_headers.get("x-client").unwrap(), "web");

        let err = ClientConfig::default()
            .with_default_header("bad header", "v")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHeader(_)));
    }
}
