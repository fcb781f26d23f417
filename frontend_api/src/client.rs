//! Pre-configured HTTP client with request and response interception.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{
    config::ClientConfig,
    interceptor::{attach_bearer_token, handle_error, RequestConfig, SessionEffects},
    query::Query,
    session::{Navigator, TokenStore},
    Error,
};

/// HTTP client for the application API.
///
/// Every request gets the configured base URL, default headers, timeout,
/// and the stored bearer token. Failed requests run through the session
/// error handling before the error is returned.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    base_url: String,
    store: Arc<dyn TokenStore>,
    effects: SessionEffects,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::ClientBuild(e)
            })?;
        let base_url = config.absolute_base_url();
        Url::parse(&base_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        Ok(Self {
            http,
            effects: SessionEffects::new(store.clone(), navigator),
            config,
            base_url,
            store,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// Joins `path` onto the base URL with exactly one `/` between them.
    pub fn url_for(&self, path: &str) -> Result<Url, Error> {
        let joined = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::InvalidUrl(joined)
        })
    }

    pub fn request(&self, method: Method, path: &str) -> RequestBuilder<'_> {
        RequestBuilder {
            client: self,
            method,
            url: self.url_for(path),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder<'_> {
        self.request(Method::DELETE, path)
    }

    /// GETs `path` with optional query parameters and decodes the JSON body.
    pub async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Query,
    {
        let mut builder = self.get(path);
        if let Some(query) = query {
            builder = builder.query(query);
        }
        builder.send().await?.json()
    }

    /// POSTs `body` as JSON to `path` and decodes the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post(path).json(body).send().await?.json()
    }

    /// Builds the final request config: defaults, per-call headers, then the
    /// outbound hook.
    fn prepare(
        &self,
        method: Method,
        url: Url,
        overrides: Vec<(String, String)>,
        body: Option<serde_json::Value>,
    ) -> Result<RequestConfig, Error> {
        let mut headers = self.config.default_headers.clone();
        for (name, value) in overrides {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| Error::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(name, value);
        }
        let config = RequestConfig {
            method,
            url,
            headers,
            body,
        };
        attach_bearer_token(config, self.store.as_ref())
    }

    async fn dispatch(&self, config: RequestConfig) -> Result<HttpResponse, Error> {
        tracing::debug!("{} {}", config.method, config.url);
        let mut req = self
            .http
            .request(config.method, config.url)
            .headers(config.headers);
        if let Some(body) = config.body {
            req = req.json(&body);
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!("Request failed without response: {}", e);
                return Err(handle_error(Error::from_transport(e), &self.effects));
            }
        };

        let status = resp.status();
        let headers = resp.headers().clone();

        if !status.is_success() {
            // Status drives the session effects even if the body never arrives.
            let body = match resp.bytes().await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    tracing::warn!("Failed to read error body for status {}: {}", status, e);
                    String::new()
                }
            };
            tracing::debug!(
                "Request failed with status {}: {}",
                status,
                truncate_body(&body)
            );
            let error = Error::HttpStatus {
                status: status.as_u16(),
                body,
            };
            return Err(handle_error(error, &self.effects));
        }

        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Failed to read response body: {}", e);
                return Err(handle_error(Error::from_transport(e), &self.effects));
            }
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// A request being assembled against an [`ApiClient`].
pub struct RequestBuilder<'a> {
    client: &'a ApiClient,
    method: Method,
    url: Result<Url, Error>,
    headers: Vec<(String, String)>,
    body: Option<Result<serde_json::Value, Error>>,
}

impl RequestBuilder<'_> {
    /// Sets a header for this request only, replacing any default of the same name.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn query(mut self, query: &impl Query) -> Self {
        self.url = self.url.map(|url| query.add_to_url(&url));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = Some(
            serde_json::to_value(body).map_err(|e| Error::Decode(format!("request body: {}", e))),
        );
        self
    }

    /// Sends the request. Non-2xx statuses and transport failures come back
    /// as `Err` after the session error handling has run.
    pub async fn send(self) -> Result<HttpResponse, Error> {
        let url = self.url?;
        let body = self.body.transpose()?;
        let config = self.client.prepare(self.method, url, self.headers, body)?;
        self.client.dispatch(config).await
    }
}

/// A successful response, exactly as received.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Raw body bytes, untouched.
    pub body: Bytes,
}

impl HttpResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice::<T>(&self.body).map_err(|e| {
            tracing::error!(
                "Failed to parse resource: {} | body: {}",
                e,
                truncate_body(&self.text_lossy())
            );
            Error::Decode(e.to_string())
        })
    }

    /// The body as UTF-8, or [`Error::Decode`] if it is not valid UTF-8.
    pub fn text(&self) -> Result<&str, Error> {
        std::str::from_utf8(&self.body).map_err(|e| Error::Decode(e.to_string()))
    }

    fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryStorage, RecordingNavigator};

    fn client(config: ClientConfig) -> ApiClient {
        ApiClient::new(
            config,
            Arc::new(MemoryStorage::new()),
            Arc::new(RecordingNavigator::new()),
        )
        .unwrap()
    }

    #[test]
    fn joins_default_base_and_path() {
        let c = client(ClientConfig::default());
        assert_eq!(
            c.url_for("/widgets").unwrap().as_str(),
            "http://localhost/api/widgets"
        );
        assert_eq!(
            c.url_for("widgets").unwrap().as_str(),
            "http://localhost/api/widgets"
        );
    }

    #[test]
    fn joins_absolute_base_with_trailing_slash() {
        let c = client(ClientConfig::default().with_base_url("https://example.com/api/"));
        assert_eq!(
            c.url_for("/widgets/7").unwrap().as_str(),
            "https://example.com/api/widgets/7"
        );
    }

    #[test]
    fn invalid_base_url_rejected() {
        let result = ApiClient::new(
            ClientConfig::default().with_base_url("http://"),
            Arc::new(MemoryStorage::new()),
            Arc::new(RecordingNavigator::new()),
        );
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let body = "가".repeat(1000);
        let out = truncate_body(&body);
        assert!(out.ends_with("...[truncated]"));
    }

    #[test]
    fn prepare_applies_overrides_and_token() {
        let c = client(ClientConfig::default());
        c.token_store().set("accessToken", "abc123");
        let config = c
            .prepare(
                Method::POST,
                c.url_for("/upload").unwrap(),
                vec![("Content-Type".to_string(), "text/plain".to_string())],
                None,
            )
            .unwrap();
        assert_eq!(config.headers.get("content-type").unwrap(), "text/plain");
        assert_eq!(config.headers.get("authorization").unwrap(), "Bearer abc123");
    }
}
