use serde::{Deserialize, Serialize};

use crate::{query::PageParams, Error};

/// Standard success envelope: payload, optional message, and a success flag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// Returns the payload, or [`Error::Unsuccessful`] when the server
    /// reported that the operation failed.
    pub fn into_result(self) -> Result<T, Error> {
        if self.success {
            Ok(self.data)
        } else {
            Err(Error::Unsuccessful {
                message: self.message,
            })
        }
    }
}

/// One page of results with zero-based pagination metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    /// Zero-based page index.
    pub number: u32,
    pub first: bool,
    pub last: bool,
}

/// A pagination rule broken by a [`PageResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageInvariantViolation {
    /// More items than the page size.
    ContentExceedsSize,
    /// `first` disagrees with `number == 0`.
    FirstFlag,
    /// `last` disagrees with `number == totalPages - 1`.
    LastFlag,
}

impl<T> PageResponse<T> {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn has_next(&self) -> bool {
        !self.last
    }

    pub fn has_previous(&self) -> bool {
        !self.first
    }

    /// Params requesting the page after this one, keeping the page size.
    pub fn next_page_params(&self) -> Option<PageParams> {
        if !self.has_next() {
            return None;
        }
        let next = self.number.checked_add(1)?;
        Some(PageParams::default().with_page(next).with_size(self.size))
    }

    pub fn map<U, F>(self, f: F) -> PageResponse<U>
    where
        F: FnMut(T) -> U,
    {
        PageResponse {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
            first: self.first,
            last: self.last,
        }
    }

    /// Checks the pagination metadata for internal consistency.
    pub fn check_invariants(&self) -> Result<(), PageInvariantViolation> {
        if self.content.len() as u64 > u64::from(self.size) {
            return Err(PageInvariantViolation::ContentExceedsSize);
        }
        if self.first != (self.number == 0) {
            return Err(PageInvariantViolation::FirstFlag);
        }
        if self.total_pages > 0 && self.last != (self.number == self.total_pages - 1) {
            return Err(PageInvariantViolation::LastFlag);
        }
        Ok(())
    }
}
