//! Pre-configured HTTP client for the application API.
//!
//! Resolves the base URL from the environment, applies default headers and
//! a fixed timeout, injects the stored bearer token into every request, and
//! centralizes handling of 401/403/500 responses. Also carries the shared
//! response, pagination, and error shapes used by the API.

mod client;
pub mod config;
mod errors;
pub mod interceptor;
mod query;
pub mod session;
pub mod types;
pub use self::client::{ApiClient, HttpResponse, RequestBuilder};
pub use self::config::ClientConfig;
pub use self::errors::Error;
pub use self::interceptor::ErrorKind;
pub use self::query::{PageParams, Query, SearchParams, SortDirection};
pub use self::session::{FileStorage, MemoryStorage, Navigator, RecordingNavigator, TokenStore};
