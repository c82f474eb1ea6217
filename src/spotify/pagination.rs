//! Concurrent fan-out over the pages of one search.
//!
//! The first page (offset 0) is fetched by the caller, since its reported
//! total decides how many more pages are needed. [`fetch_all`] then requests
//! every remaining page at once and merges the items into one collection.
//!
//! A failing page is dropped and counted in [`FetchOutcome::failed_pages`].
//! The search as a whole still succeeds, so `total` is an upper bound on the
//! number of items returned rather than an exact count.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    error::{Result, SearchError},
    spotify::query::PAGE_SIZE,
    types::Page,
};

/// Highest offset + limit the upstream search endpoint will serve.
pub const MAX_TOTAL: u32 = 1000;

/// Additional pages after the first one, offsets 50..=950.
pub const MAX_EXTRA_PAGES: u32 = 19;

/// Which pages to request for a reported total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    pub capped_total: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub offsets: Vec<u32>,
}

impl SearchPlan {
    pub fn from_total(reported_total: u32) -> Self {
        let capped_total = reported_total.min(MAX_TOTAL);
        let page_count = (capped_total / PAGE_SIZE).min(MAX_EXTRA_PAGES);
        let offsets = (1..=page_count).map(|i| i * PAGE_SIZE).collect();

        Self {
            capped_total,
            page_size: PAGE_SIZE,
            page_count,
            offsets,
        }
    }
}

/// Anything that can fetch a page of a search by offset.
#[async_trait]
pub trait PageSource<T: Send + 'static>: Send + Sync {
    async fn fetch_page(&self, offset: u32) -> Result<Page<T>>;
}

/// Merged result of a fan-out.
#[derive(Debug, Clone)]
pub struct FetchOutcome<T> {
    pub items: Vec<T>,
    /// `min(first page total, 1000)`
    pub total: u32,
    pub failed_pages: usize,
}

/// Fetches all remaining pages of a search concurrently and merges them.
///
/// The merged collection starts out with `first_page.items`; every
/// additional page is appended under a lock once it arrives, so items end up
/// in arrival order. One task runs per page and all of them are awaited
/// before returning.
///
/// # Arguments
///
/// * `source` - Fetches one page per offset, shared by every task
/// * `first_page` - The page at offset 0, its `total` drives the plan
///
/// # Returns
///
/// The merged items, never more than `min(first_page.total, 1000)` of them,
/// with the capped total and the number of pages that failed.
///
/// # Example
///
/// ```
/// let source = Arc::new(UpstreamPages::new(http, api_url, token, "rock", SearchKind::Artist));
/// let outcome = fetch_all(source, first_page).await;
/// assert!(outcome.items.len() <= outcome.total as usize);
/// ```
pub async fn fetch_all<T, S>(source: Arc<S>, first_page: Page<T>) -> FetchOutcome<T>
where
    T: Send + 'static,
    S: PageSource<T> + 'static,
{
    let plan = SearchPlan::from_total(first_page.total);
    debug!(
        reported = first_page.total,
        capped = plan.capped_total,
        pages = plan.page_count,
        "search plan"
    );

    if plan.page_count == 0 {
        let mut items = first_page.items;
        items.truncate(plan.capped_total as usize);
        return FetchOutcome {
            items,
            total: plan.capped_total,
            failed_pages: 0,
        };
    }

    let mut seed = Vec::with_capacity(plan.capped_total as usize);
    seed.extend(first_page.items);
    let merged = Arc::new(Mutex::new(seed));

    let handles: Vec<_> = plan
        .offsets
        .iter()
        .map(|&offset| {
            let source = Arc::clone(&source);
            let merged = Arc::clone(&merged);
            tokio::spawn(async move {
                let page = source.fetch_page(offset).await?;
                let count = page.items.len();
                merged.lock().await.extend(page.items);
                Ok::<usize, SearchError>(count)
            })
        })
        .collect();

    let mut failed_pages = 0;
    for (offset, handle) in plan.offsets.iter().zip(handles) {
        match handle.await {
            Ok(Ok(count)) => debug!(offset, count, "merged page"),
            Ok(Err(e)) => {
                failed_pages += 1;
                warn!(offset, error = %e, "dropping page");
            }
            Err(e) => {
                failed_pages += 1;
                warn!(offset, error = %e, "page task did not complete");
            }
        }
    }

    let mut items = match Arc::try_unwrap(merged) {
        Ok(mutex) => mutex.into_inner(),
        Err(shared) => std::mem::take(&mut *shared.lock().await),
    };
    // upstream totals are estimates, pages may carry more than announced
    if items.len() > plan.capped_total as usize {
        debug!(
            merged = items.len(),
            capped = plan.capped_total,
            "truncating over-delivered results"
        );
        items.truncate(plan.capped_total as usize);
    }

    FetchOutcome {
        items,
        total: plan.capped_total,
        failed_pages,
    }
}
