//! Request and response interception.
//!
//! Outbound, [`attach_bearer_token`] adds the stored access token to each
//! request. Inbound, a failed request is first classified into an
//! [`ErrorKind`] (pure), then [`SessionEffects::apply`] performs the side
//! effects for that kind. The error itself is always handed back to the
//! caller unchanged.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use url::Url;

use crate::session::{Navigator, TokenStore, ACCESS_TOKEN_KEY, LOGIN_PATH, REFRESH_TOKEN_KEY};
use crate::Error;

/// An in-flight request, as seen by the outbound hook.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

/// Sets `Authorization: Bearer <token>` when an access token is stored.
///
/// Without a stored token the config is returned untouched. A token that
/// is not a valid header value fails the request before it is sent.
pub fn attach_bearer_token(
    mut config: RequestConfig,
    store: &dyn TokenStore,
) -> Result<RequestConfig, Error> {
    if let Some(token) = store.get(ACCESS_TOKEN_KEY) {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::InvalidHeader("stored access token".to_string()))?;
        value.set_sensitive(true);
        config.headers.insert(AUTHORIZATION, value);
    }
    Ok(config)
}

/// Classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// HTTP 401.
    Unauthorized,
    /// HTTP 403.
    Forbidden,
    /// HTTP 500.
    ServerError,
    /// Any other non-success status.
    OtherStatus(u16),
    /// No response at all: timeout, DNS, connection reset.
    Network,
    /// Failed locally, before or after the exchange (bad URL, decode error).
    Local,
}

impl ErrorKind {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ErrorKind::Unauthorized,
            StatusCode::FORBIDDEN => ErrorKind::Forbidden,
            StatusCode::INTERNAL_SERVER_ERROR => ErrorKind::ServerError,
            other => ErrorKind::OtherStatus(other.as_u16()),
        }
    }

    pub fn classify(error: &Error) -> Self {
        match error {
            Error::HttpStatus { status, .. } => match StatusCode::from_u16(*status) {
                Ok(status) => Self::from_status(status),
                Err(_) => ErrorKind::OtherStatus(*status),
            },
            Error::Timeout(_) | Error::Network(_) => ErrorKind::Network,
            _ => ErrorKind::Local,
        }
    }
}

/// Side effects applied for each [`ErrorKind`].
#[derive(Clone)]
pub struct SessionEffects {
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionEffects {
    pub fn new(store: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// Runs the side effect for `kind`:
    ///
    /// - `Unauthorized`: drop both tokens and navigate to the login page.
    /// - `Forbidden`, `ServerError`: log a notice.
    /// - anything else: nothing.
    pub fn apply(&self, kind: ErrorKind) {
        match kind {
            ErrorKind::Unauthorized => {
                tracing::warn!("Unauthorized response, ending session");
                self.store.remove(ACCESS_TOKEN_KEY);
                self.store.remove(REFRESH_TOKEN_KEY);
                self.navigator.replace_location(LOGIN_PATH);
            }
            ErrorKind::Forbidden => {
                tracing::error!("Access forbidden: insufficient permissions");
            }
            ErrorKind::ServerError => {
                tracing::error!("Server error occurred");
            }
            ErrorKind::OtherStatus(_) | ErrorKind::Network | ErrorKind::Local => {}
        }
    }
}

/// Inbound error hook: classify, apply effects, hand the error back.
pub fn handle_error(error: Error, effects: &SessionEffects) -> Error {
    effects.apply(ErrorKind::classify(&error));
    error
}
