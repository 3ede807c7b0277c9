use serde::Deserialize;

/// A normalised page request. `page` is 1-based and both fields are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Number of rows to skip before this page starts.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Raw `page`/`pageSize` query parameters as they arrive on the wire.
/// Missing values behave like `page=1&pageSize=0`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

/// Configured page-size limits consulted for every paged endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingLimits {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl PagingLimits {
    pub fn resolve(&self, params: PagingParams) -> PageRequest {
        let (page, page_size) = resolve(
            params.page.unwrap_or(1),
            params.page_size.unwrap_or(0),
            self.default_page_size,
            self.max_page_size,
        );
        PageRequest { page, page_size }
    }
}

/// Normalises a requested page against the configured limits.
///
/// Non-positive sizes take the default, positive sizes are capped at `max`,
/// and non-positive pages become page 1. Never fails.
pub fn resolve(page: i64, page_size: i64, default: u64, max: u64) -> (u64, u64) {
    let page_size = if page_size <= 0 {
        default
    } else {
        (page_size as u64).min(max)
    };
    let page = if page <= 0 { 1 } else { page as u64 };
    (page, page_size.max(1))
}
