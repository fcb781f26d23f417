//! Error types for the API client.

use reqwest::StatusCode;

use crate::types::ErrorResponse;

/// Errors that can occur when building or dispatching API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The underlying `reqwest::Client` could not be constructed.
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
    /// The base URL and path did not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// A header name or value could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    /// The request timed out before a response arrived.
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),
    /// The request failed without a response (DNS, connection reset, ...).
    #[error("Network error")]
    Network(#[source] reqwest::Error),
    /// The API returned a non-success status.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The response body could not be decoded into the expected type.
    #[error("Failed to decode response: {0}")]
    Decode(String),
    /// The API answered 2xx but flagged the operation as unsuccessful.
    #[error("Operation unsuccessful: {}", .message.as_deref().unwrap_or("no message"))]
    Unsuccessful { message: Option<String> },
}

impl Error {
    /// Maps a transport-level `reqwest` failure to the matching variant.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout(e)
        } else {
            Error::Network(e)
        }
    }

    /// The HTTP status carried by this error, if a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpStatus { status, .. } => StatusCode::from_u16(*status).ok(),
            _ => None,
        }
    }

    /// Parses the error body as the server's normalized [`ErrorResponse`].
    pub fn error_response(&self) -> Option<ErrorResponse> {
        match self {
            Error::HttpStatus { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}
