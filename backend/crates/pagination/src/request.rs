//! Validated page-number requests.

use thiserror::Error;

/// Page size used when the client does not supply `limit`.
pub const DEFAULT_LIMIT: u32 = 6;

/// Largest page size a client may request.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised when a client supplies invalid paging parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Pages are numbered from one.
    #[error("page must be at least 1")]
    InvalidPage,
    /// The limit falls outside `1..=MAX_LIMIT`.
    #[error("limit must be between 1 and {max}, got {limit}")]
    InvalidLimit {
        /// Limit supplied by the client.
        limit: u32,
        /// Largest accepted limit.
        max: u32,
    },
}

/// A 1-based page number paired with a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Validate optional query parameters, falling back to the first page and
    /// [`DEFAULT_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidPage`] for page zero and
    /// [`PaginationError::InvalidLimit`] when the limit is zero or above
    /// [`MAX_LIMIT`].
    pub const fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, PaginationError> {
        let page = match page {
            Some(0) => return Err(PaginationError::InvalidPage),
            Some(value) => value,
            None => 1,
        };
        let limit = match limit {
            Some(value) if value == 0 || value > MAX_LIMIT => {
                return Err(PaginationError::InvalidLimit {
                    limit: value,
                    max: MAX_LIMIT,
                });
            }
            Some(value) => value,
            None => DEFAULT_LIMIT,
        };
        Ok(Self { page, limit })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    /// Whether items remain after this page given the total `count`.
    #[must_use]
    pub const fn has_next(&self, count: u64) -> bool {
        self.offset() + (self.limit as u64) < count
    }
}
