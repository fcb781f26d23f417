mod entity;
mod error;
mod response;
pub use self::entity::{parse_timestamp, BaseEntity};
pub use self::error::ErrorResponse;
pub use self::response::{ApiResponse, PageInvariantViolation, PageResponse};
