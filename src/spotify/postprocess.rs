use crate::types::{Artist, Track};

/// An item that can be ranked and filtered after a search.
pub trait Ranked {
    fn popularity(&self) -> u32;

    /// Tag list compared by the exact genre filter.
    fn tags(&self) -> &[String] {
        &[]
    }

    fn tags_mut(&mut self) -> Option<&mut Vec<String>> {
        None
    }
}

impl Ranked for Artist {
    fn popularity(&self) -> u32 {
        self.popularity
    }

    fn tags(&self) -> &[String] {
        &self.genres
    }

    fn tags_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.genres)
    }
}

impl Ranked for Track {
    fn popularity(&self) -> u32 {
        self.popularity
    }
}

/// Keeps only items carrying `tag` verbatim (case-sensitive).
///
/// Items without tags, such as tracks, never match.
///
/// # Example
///
/// ```
/// let exact = filter_exact("soft rock", artists);
/// assert!(exact.iter().all(|a| a.genres.iter().any(|g| g == "soft rock")));
/// ```
pub fn filter_exact<T: Ranked>(tag: &str, items: Vec<T>) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| item.tags().iter().any(|t| t == tag))
        .collect()
}

/// Sorts by popularity, most popular first. Ties keep no particular order.
pub fn sort_by_popularity_desc<T: Ranked>(mut items: Vec<T>) -> Vec<T> {
    items.sort_unstable_by(|a, b| b.popularity().cmp(&a.popularity()));
    items
}

/// Moves `tag` to the front of each item's tag list where present.
pub fn promote_tag<T: Ranked>(tag: &str, items: &mut [T]) {
    for item in items.iter_mut() {
        if let Some(tags) = item.tags_mut() {
            if let Some(pos) = tags.iter().position(|t| t == tag) {
                tags.swap(0, pos);
            }
        }
    }
}
