use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use genredetector::error::{Result, SearchError};
use genredetector::spotify::pagination::*;
use genredetector::types::{Artist, Page};

// Serves fixed pages by offset and records which offsets were requested
struct MockPages {
    total: u32,
    pages: HashMap<u32, Vec<Artist>>,
    failing: HashSet<u32>,
    requested: Mutex<Vec<u32>>,
}

impl MockPages {
    fn new(total: u32, page_len: impl Fn(u32) -> usize) -> Self {
        let pages = (1..=MAX_EXTRA_PAGES)
            .map(|i| i * 50)
            .map(|offset| (offset, create_test_artists(offset, page_len(offset))))
            .collect();
        Self {
            total,
            pages,
            failing: HashSet::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn failing(mut self, offsets: &[u32]) -> Self {
        self.failing.extend(offsets.iter().copied());
        self
    }

    fn requested(&self) -> Vec<u32> {
        let mut offsets = self.requested.lock().unwrap().clone();
        offsets.sort();
        offsets
    }
}

#[async_trait]
impl PageSource<Artist> for MockPages {
    async fn fetch_page(&self, offset: u32) -> Result<Page<Artist>> {
        self.requested.lock().unwrap().push(offset);
        // stagger completion so pages arrive out of order
        tokio::time::sleep(Duration::from_millis(u64::from((1000 - offset) % 7))).await;

        if self.failing.contains(&offset) {
            return Err(SearchError::Status { status: 500 });
        }
        Ok(Page {
            items: self.pages.get(&offset).cloned().unwrap_or_default(),
            total: self.total,
        })
    }
}

fn create_test_artists(offset: u32, count: usize) -> Vec<Artist> {
    (0..count)
        .map(|i| Artist {
            id: format!("artist_{}_{}", offset, i),
            name: format!("Artist {} {}", offset, i),
            popularity: (offset as usize + i) as u32 % 101,
            ..Default::default()
        })
        .collect()
}

fn first_page(total: u32, count: usize) -> Page<Artist> {
    Page {
        items: create_test_artists(0, count),
        total,
    }
}

#[test]
fn test_plan_page_count_formula() {
    for total in 0..=2500u32 {
        let plan = SearchPlan::from_total(total);
        let capped = total.min(1000);
        assert_eq!(plan.capped_total, capped);
        assert_eq!(plan.page_count, (capped / 50).min(19));
        assert_eq!(plan.page_size, 50);

        let expected: Vec<u32> = (1..=plan.page_count).map(|i| i * 50).collect();
        assert_eq!(plan.offsets, expected, "total {}", total);
    }
}

#[test]
fn test_plan_below_one_page_has_no_fan_out() {
    for total in 0..50 {
        let plan = SearchPlan::from_total(total);
        assert_eq!(plan.page_count, 0);
        assert!(plan.offsets.is_empty());
    }
}

#[test]
fn test_plan_for_237() {
    let plan = SearchPlan::from_total(237);
    assert_eq!(plan.capped_total, 237);
    assert_eq!(plan.page_count, 4);
    assert_eq!(plan.offsets, vec![50, 100, 150, 200]);
}

#[test]
fn test_plan_for_1400() {
    let plan = SearchPlan::from_total(1400);
    assert_eq!(plan.capped_total, 1000);
    assert_eq!(plan.page_count, 19);
    assert_eq!(plan.offsets.first(), Some(&50));
    assert_eq!(plan.offsets.last(), Some(&950));
}

#[tokio::test]
async fn test_zero_total_returns_first_page_without_requests() {
    let source = Arc::new(MockPages::new(0, |_| 50));
    let outcome = fetch_all(Arc::clone(&source), first_page(0, 0)).await;

    assert_eq!(outcome.total, 0);
    assert!(outcome.items.is_empty());
    assert_eq!(outcome.failed_pages, 0);
    assert!(source.requested().is_empty());
}

#[tokio::test]
async fn test_small_total_does_not_fan_out() {
    let source = Arc::new(MockPages::new(30, |_| 50));
    let outcome = fetch_all(Arc::clone(&source), first_page(30, 30)).await;

    assert_eq!(outcome.total, 30);
    assert_eq!(outcome.items.len(), 30);
    assert!(source.requested().is_empty());
}

#[tokio::test]
async fn test_fetch_237_requests_four_more_pages() {
    // 50 + 50 + 50 + 50 + 37 items upstream
    let source = Arc::new(MockPages::new(237, |offset| if offset == 200 { 37 } else { 50 }));
    let outcome = fetch_all(Arc::clone(&source), first_page(237, 50)).await;

    assert_eq!(source.requested(), vec![50, 100, 150, 200]);
    assert_eq!(outcome.total, 237);
    assert_eq!(outcome.items.len(), 237);
    assert_eq!(outcome.failed_pages, 0);
}

#[tokio::test]
async fn test_fetch_1400_is_capped() {
    let source = Arc::new(MockPages::new(1400, |_| 50));
    let outcome = fetch_all(Arc::clone(&source), first_page(1400, 50)).await;

    let expected: Vec<u32> = (1..=19).map(|i| i * 50).collect();
    assert_eq!(source.requested(), expected);
    assert_eq!(outcome.total, 1000);
    assert_eq!(outcome.items.len(), 1000);
}

#[tokio::test]
async fn test_merge_keeps_every_item_once() {
    let source = Arc::new(MockPages::new(1000, |offset| (offset / 50) as usize + 10));
    let outcome = fetch_all(Arc::clone(&source), first_page(1000, 50)).await;

    let expected_len: usize = 50 + (1..=19).map(|i| i + 10).sum::<usize>();
    assert_eq!(outcome.items.len(), expected_len);

    let ids: HashSet<&str> = outcome.items.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids.len(), expected_len, "merged collection has duplicates");
}

#[tokio::test]
async fn test_failed_pages_are_dropped_and_counted() {
    let source = Arc::new(MockPages::new(237, |_| 50).failing(&[100, 200]));
    let outcome = fetch_all(Arc::clone(&source), first_page(237, 50)).await;

    assert_eq!(source.requested(), vec![50, 100, 150, 200]);
    assert_eq!(outcome.failed_pages, 2);
    assert_eq!(outcome.items.len(), 150);
    // total stays the upper bound reported upstream
    assert_eq!(outcome.total, 237);
    assert!(outcome.items.iter().all(|a| !a.id.starts_with("artist_100_")));
}

#[tokio::test]
async fn test_over_delivered_pages_are_capped_at_total() {
    // every page is full although only 237 items were announced
    let source = Arc::new(MockPages::new(237, |_| 50));
    let outcome = fetch_all(Arc::clone(&source), first_page(237, 50)).await;

    assert_eq!(source.requested(), vec![50, 100, 150, 200]);
    assert_eq!(outcome.total, 237);
    assert_eq!(outcome.items.len(), 237);
    assert!(outcome.items.iter().take(50).all(|a| a.id.starts_with("artist_0_")));
}

#[tokio::test]
async fn test_over_delivered_first_page_is_capped_at_total() {
    let source = Arc::new(MockPages::new(30, |_| 50));
    let outcome = fetch_all(Arc::clone(&source), first_page(30, 45)).await;

    assert!(source.requested().is_empty());
    assert_eq!(outcome.total, 30);
    assert_eq!(outcome.items.len(), 30);
}

#[tokio::test]
async fn test_all_pages_failing_still_returns_first_page() {
    let offsets: Vec<u32> = (1..=19).map(|i| i * 50).collect();
    let source = Arc::new(MockPages::new(1000, |_| 50).failing(&offsets));
    let outcome = fetch_all(Arc::clone(&source), first_page(1000, 50)).await;

    assert_eq!(outcome.failed_pages, 19);
    assert_eq!(outcome.items.len(), 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_merge_is_stable_across_runs() {
    for run in 0..25 {
        let source = Arc::new(MockPages::new(1000, |offset| 20 + (offset as usize % 31)));
        let expected: usize = 50 + source.pages.values().map(Vec::len).sum::<usize>();

        let outcome = fetch_all(Arc::clone(&source), first_page(1000, 50)).await;
        assert_eq!(outcome.items.len(), expected, "run {}", run);
        assert_eq!(outcome.failed_pages, 0);
    }
}
