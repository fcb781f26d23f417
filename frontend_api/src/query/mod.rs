mod common;
mod page;
mod search;
pub use self::common::{Query, SortDirection};
pub use self::page::PageParams;
pub use self::search::SearchParams;
