//! Response-side page of results.

use serde::{Deserialize, Serialize};

/// One page of a filtered listing.
///
/// `count` always equals `elements.len()` and never exceeds `page_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginator<T> {
    /// Rows matching the filters across all pages.
    pub total: u64,
    /// Page number returned (1-based).
    pub page: u64,
    pub page_size: u64,
    /// Rows on this page.
    pub count: u64,
    pub elements: Vec<T>,
}

impl<T> Paginator<T> {
    /// Build a page. Extra elements beyond `page_size` are dropped, and a
    /// zero `total` always yields an empty page.
    pub fn new(total: u64, page: u64, page_size: u64, mut elements: Vec<T>) -> Self {
        if total == 0 {
            elements.clear();
        }
        elements.truncate(usize::try_from(page_size).unwrap_or(usize::MAX));
        Self {
            total,
            page,
            page_size,
            count: elements.len() as u64,
            elements,
        }
    }

    /// A page with no rows and a total of 0.
    pub fn empty(page: u64, page_size: u64) -> Self {
        Self::new(0, page, page_size, Vec::new())
    }

    /// Number of pages needed for `total` rows, never less than 1.
    pub fn total_pages(&self) -> u64 {
        if self.total == 0 || self.page_size == 0 {
            1
        } else {
            self.total.div_ceil(self.page_size)
        }
    }

    /// Returns `true` when a later page has rows.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Returns `true` for any page after the first.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Convert the elements, keeping the window.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginator<U> {
        Paginator {
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            count: self.count,
            elements: self.elements.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_last_page() {
        let page = Paginator::new(7, 1, 10, (0..7).collect());
        assert_eq!(page.count, 7);
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next());
    }

    #[test]
    fn test_zero_total_is_empty() {
        let page = Paginator::new(0, 1, 10, vec![1, 2]);
        assert_eq!(page.count, 0);
        assert!(page.is_empty());
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_count_never_exceeds_page_size() {
        let page = Paginator::new(50, 2, 5, (0..8).collect());
        assert_eq!(page.count, 5);
        assert_eq!(page.elements.len(), 5);
        assert_eq!(page.total_pages(), 10);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_map_keeps_window() {
        let page = Paginator::new(3, 1, 10, vec![1, 2, 3]).map(|n| n * 2);
        assert_eq!(page.elements, vec![2, 4, 6]);
        assert_eq!(page.count, 3);
    }
}
