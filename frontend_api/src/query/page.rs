use serde::{Deserialize, Serialize};
use url::Url;

use super::{Query, SortDirection};

/// Pagination parameters: zero-based page index, page size, and sort spec.
///
/// Unset fields are left out of the query string so the server applies
/// its own defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl Query for PageParams {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if let Some(page) = self.page {
            url.query_pairs_mut().append_pair("page", &page.to_string());
        }
        if let Some(size) = self.size {
            url.query_pairs_mut().append_pair("size", &size.to_string());
        }
        if let Some(sort) = &self.sort {
            url.query_pairs_mut().append_pair("sort", sort);
        }
        url
    }
}

impl PageParams {
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets a raw sort spec, e.g. `"createdDate,desc"`.
    pub fn with_sort(mut self, sort: &str) -> Self {
        self.sort = Some(sort.to_string());
        self
    }

    pub fn with_sort_by(self, field: &str, direction: SortDirection) -> Self {
        self.with_sort(&format!("{},{}", field, direction))
    }
}
