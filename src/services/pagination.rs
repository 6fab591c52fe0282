//! Page arithmetic over a filtered view
//!
//! Nothing here is stored: page count and the displayed range are always
//! derived from the item count, page size and requested page.

use std::ops::Range;

/// Number of numbered page buttons shown at once
pub const PAGE_WINDOW: usize = 5;

/// One resolved page of a sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Clamped 1-based page number
    pub number: usize,
    /// Total pages; zero only when there are no items
    pub total_pages: usize,
    pub total_items: usize,
    /// Positions of this page's items in the sequence
    pub range: Range<usize>,
}

impl Page {
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// 1-based position of the first shown item, zero when empty
    pub fn display_start(&self) -> usize {
        if self.is_empty() { 0 } else { self.range.start + 1 }
    }

    pub fn display_end(&self) -> usize {
        self.range.end
    }

    /// Footer text, e.g. "Showing 51 to 100 of 120 results"
    pub fn summary(&self) -> String {
        format!(
            "Showing {} to {} of {} results",
            self.display_start(),
            self.display_end(),
            self.total_items
        )
    }
}

/// Slices a sequence of `total_items` into pages of `page_size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub total_items: usize,
    pub page_size: usize,
}

impl Paginator {
    pub fn new(total_items: usize, page_size: usize) -> Self {
        Self {
            total_items,
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Clamp a requested page into `[1, max(1, total_pages)]`
    pub fn clamp(&self, requested: usize) -> usize {
        requested.clamp(1, self.total_pages().max(1))
    }

    pub fn page(&self, requested: usize) -> Page {
        let number = self.clamp(requested);
        let start = ((number - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        Page {
            number,
            total_pages: self.total_pages(),
            total_items: self.total_items,
            range: start..end,
        }
    }
}

/// Page numbers for the numbered navigation buttons
///
/// Up to [`PAGE_WINDOW`] numbers, starting two before the current page and
/// pulled back from the end so the window never runs past the last page.
pub fn page_window(current: usize, total_pages: usize) -> Vec<usize> {
    if total_pages <= PAGE_WINDOW {
        return (1..=total_pages).collect();
    }
    let start = current.saturating_sub(2).max(1);
    let start = start.min(total_pages + 1 - PAGE_WINDOW);
    (start..start + PAGE_WINDOW).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_120_rows_page_size_50() {
        let paginator = Paginator::new(120, 50);
        assert_eq!(paginator.total_pages(), 3);
        assert_eq!(paginator.page(1).range, 0..50);
        assert_eq!(paginator.page(2).range, 50..100);
        assert_eq!(paginator.page(3).range, 100..120);

        let clamped = paginator.page(4);
        assert_eq!(clamped.number, 3);
        assert_eq!(clamped.range, 100..120);
        assert_eq!(clamped.summary(), "Showing 101 to 120 of 120 results");
    }

    #[test]
    fn test_empty_sequence() {
        let paginator = Paginator::new(0, 50);
        assert_eq!(paginator.total_pages(), 0);
        let page = paginator.page(7);
        assert_eq!(page.number, 1);
        assert!(page.is_empty());
        assert!(!page.has_prev());
        assert!(!page.has_next());
        assert_eq!(page.summary(), "Showing 0 to 0 of 0 results");
    }

    #[test]
    fn test_page_zero_clamps_to_first() {
        assert_eq!(Paginator::new(10, 3).page(0).number, 1);
    }

    #[test]
    fn test_pages_reconstruct_sequence() {
        for (n, size) in [(1, 1), (7, 3), (50, 50), (51, 50), (99, 10)] {
            let paginator = Paginator::new(n, size);
            let rebuilt: Vec<usize> = (1..=paginator.total_pages())
                .flat_map(|p| paginator.page(p).range)
                .collect();
            assert_eq!(rebuilt, (0..n).collect::<Vec<_>>(), "n={n} size={size}");
        }
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
        assert_eq!(page_window(1, 10), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(6, 10), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(10, 10), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(9, 10), vec![6, 7, 8, 9, 10]);
        assert!(page_window(1, 0).is_empty());
    }
}
