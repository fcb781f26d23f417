//! Session collaborators injected into the client: the token store and
//! the navigation target for forced logouts.

mod navigation;
mod storage;
pub use self::navigation::{Navigator, RecordingNavigator};
pub use self::storage::{FileStorage, MemoryStorage, TokenStore};

/// Store key holding the bearer token sent on every request.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Store key holding the refresh token. Only ever cleared here.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Where a 401 sends the user.
pub const LOGIN_PATH: &str = "/login";
