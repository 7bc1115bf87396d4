use serde::Serialize;
use utoipa::ToSchema;

/// Page size used when the caller asks for a non-positive one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A clamped page request. Out-of-range input is coerced, never rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u64,
    page_size: u64,
}

impl PageRequest {
    /// `page_number < 1` becomes 1, `page_size < 1` becomes [`DEFAULT_PAGE_SIZE`].
    pub fn new(page_number: i64, page_size: i64) -> Self {
        let page_number = u64::try_from(page_number).ok().filter(|n| *n >= 1).unwrap_or(1);
        let page_size = u64::try_from(page_size)
            .ok()
            .filter(|n| *n >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self {
            page_number,
            page_size,
        }
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Rows to skip before the page starts, capped to what SQL `OFFSET` accepts.
    pub fn offset(&self) -> u64 {
        (self.page_number - 1)
            .saturating_mul(self.page_size)
            .min(i64::MAX as u64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE as i64)
    }
}

/// One page of records plus the metadata needed to navigate the rest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_number: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResult<T> {
    pub fn new(items: Vec<T>, total_count: u64, page: PageRequest) -> Self {
        Self {
            items,
            total_count,
            page_number: page.page_number(),
            page_size: page.page_size(),
            total_pages: total_count.div_ceil(page.page_size()),
        }
    }
}
