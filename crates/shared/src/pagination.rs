//! Page/limit pagination utilities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default page size used by the event listing.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Upper bound accepted for a page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Error type for page requests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Page numbers start at 1")]
    InvalidPage,
    #[error("Page size must be between 1 and {MAX_PAGE_SIZE}")]
    InvalidLimit,
}

/// A requested page (1-based) with a page size.
///
/// Only [`PageRequest::new`] and deserialization build one, and both enforce
/// the same bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

#[derive(Deserialize)]
struct RawPageRequest {
    page: u32,
    limit: u32,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(raw.page, raw.limit)
    }
}

impl PageRequest {
    /// Builds a page request, rejecting page 0 and out-of-range limits.
    pub fn new(page: u32, limit: u32) -> Result<Self, PageError> {
        if page == 0 {
            return Err(PageError::InvalidPage);
        }
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(PageError::InvalidLimit);
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> usize {
        (self.page as usize)
            .saturating_sub(1)
            .saturating_mul(self.limit as usize)
    }

    /// The following page with the same size, saturating at `u32::MAX`.
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            limit: self.limit,
        }
    }

    /// The preceding page, saturating at page 1.
    pub fn previous(&self) -> Self {
        Self {
            page: self.page.saturating_sub(1).max(1),
            limit: self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination metadata as returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

impl Pagination {
    /// Computes metadata for `total` items split into pages of `limit`.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: page_count(total, limit),
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Number of pages needed to hold `total` items (ceiling division).
///
/// A zero limit yields zero pages rather than dividing by zero.
pub fn page_count(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit as u64).min(u32::MAX as u64) as u32
}

/// Slices an already-fetched list into the requested page.
///
/// Pages past the end yield an empty slice.
pub fn paginate<'a, T>(items: &'a [T], request: &PageRequest) -> (&'a [T], Pagination) {
    let meta = Pagination::new(request.page, request.limit, items.len() as u64);
    let start = request.offset().min(items.len());
    let end = start.saturating_add(request.limit as usize).min(items.len());
    (&items[start..end], meta)
}
