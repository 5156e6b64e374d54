use serde::{Deserialize, Serialize};

/// Page size used when the caller omits or sends a non-positive limit.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Normalized one-based offset pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Builds a request from raw transport values.
    ///
    /// Pages below one clamp to one. Missing or non-positive limits fall back to
    /// [`DEFAULT_PAGE_LIMIT`], larger limits clamp to [`MAX_PAGE_LIMIT`].
    #[must_use]
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page
            .filter(|value| *value >= 1)
            .map_or(1, |value| u32::try_from(value).unwrap_or(u32::MAX));
        let limit = match limit {
            Some(value) if value >= 1 => {
                u32::try_from(value.min(i64::from(MAX_PAGE_LIMIT))).unwrap_or(MAX_PAGE_LIMIT)
            }
            _ => DEFAULT_PAGE_LIMIT,
        };

        Self { page, limit }
    }

    /// Returns the one-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the number of rows skipped before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}
