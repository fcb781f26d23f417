use serde::{Deserialize, Serialize};
use url::Url;

use super::{PageParams, Query, SortDirection};

/// [`PageParams`] plus an optional free-text keyword filter.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    #[serde(flatten)]
    pub page: PageParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl Query for SearchParams {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.page.add_to_url(url);
        if let Some(keyword) = &self.keyword {
            url.query_pairs_mut().append_pair("keyword", keyword);
        }
        url
    }
}

impl From<PageParams> for SearchParams {
    fn from(page: PageParams) -> Self {
        Self {
            page,
            keyword: None,
        }
    }
}

impl SearchParams {
    /// Sets the keyword filter. Blank keywords clear the filter.
    pub fn with_keyword(mut self, keyword: &str) -> Self {
        let keyword = keyword.trim();
        self.keyword = if keyword.is_empty() {
            None
        } else {
            Some(keyword.to_string())
        };
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = self.page.with_page(page);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.page = self.page.with_size(size);
        self
    }

    pub fn with_sort(mut self, sort: &str) -> Self {
        self.page = self.page.with_sort(sort);
        self
    }

    pub fn with_sort_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.page = self.page.with_sort_by(field, direction);
        self
    }
}
