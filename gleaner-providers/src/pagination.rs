//! Page-number pagination with an all-or-nothing result.

use std::future::Future;

use gleaner_core::ApiError;
use tracing::debug;

/// Page size and page ceiling for one paginated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Items requested per page; a shorter page marks the last one.
    pub per_page: usize,
    /// Hard ceiling on pages fetched.
    pub max_pages: u32,
}

impl PageLimits {
    /// Creates page limits.
    pub const fn new(per_page: usize, max_pages: u32) -> Self {
        Self {
            per_page,
            max_pages,
        }
    }

    /// Largest number of items a call can return.
    pub fn max_items(&self) -> usize {
        self.per_page.saturating_mul(self.max_pages as usize)
    }
}

/// Fetches 1-indexed pages sequentially and concatenates them in order.
///
/// Stops after a page shorter than `per_page` (including an empty page) or
/// after `max_pages`. The first failing page aborts the whole call; pages
/// fetched before it are dropped.
pub async fn collect_pages<T, F, Fut>(limits: PageLimits, mut fetch_page: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let mut items = Vec::new();

    for page in 1..=limits.max_pages {
        let batch = fetch_page(page).await?;
        let len = batch.len();
        debug!(page, len, total = items.len() + len, "Fetched page");

        items.extend(batch);
        if len < limits.per_page {
            break;
        }
    }

    Ok(items)
}
