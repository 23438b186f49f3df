//! Pagination engine — pure window arithmetic for offset-paged lists.
//!
//! The engine computes navigation affordances from `(current page, page
//! size, total count)` and never fetches anything itself. Page selection
//! is expressed as a [`PageIntent`] that the view state resolves into a
//! concrete page number before triggering a reload.

/// Navigation affordances for one paged view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    /// `ceil(total / page_size)`; 0 when the collection is empty.
    pub total_pages: u32,
    /// At most five page numbers centered on `current`.
    pub pages: Vec<u32>,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageWindow {
    /// Compute the visible window.
    ///
    /// `lower = max(1, current - 2)`, `upper = min(total_pages, lower + 4)`.
    pub fn compute(current: u32, page_size: u32, total: u64) -> Self {
        assert!(page_size > 0, "page size must be positive");
        let total_pages = u32::try_from(total.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX);

        let pages = if total_pages == 0 {
            Vec::new()
        } else {
            let lower = current.saturating_sub(2).max(1);
            let upper = total_pages.min(lower + 4);
            (lower..=upper).collect()
        };

        Self {
            current,
            total_pages,
            pages,
            has_prev: current > 1,
            has_next: current < total_pages,
        }
    }

    /// Whether the list is empty and only the placeholder row renders.
    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }
}

/// A navigation intent raised by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageIntent {
    Goto(u32),
    Prev,
    Next,
}

impl PageIntent {
    /// Resolve this intent against the current window.
    ///
    /// Returns the new page number, or `None` when the intent is a no-op
    /// (prev on page 1, next on the last page, goto out of range).
    pub fn resolve(self, window: &PageWindow) -> Option<u32> {
        match self {
            Self::Goto(page) => {
                (page >= 1 && page <= window.total_pages && page != window.current).then_some(page)
            }
            Self::Prev => window.has_prev.then(|| window.current - 1),
            Self::Next => window.has_next.then(|| window.current + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{PageIntent, PageWindow};

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(PageWindow::compute(1, 20, 0).total_pages, 0);
        assert_eq!(PageWindow::compute(1, 20, 1).total_pages, 1);
        assert_eq!(PageWindow::compute(1, 20, 20).total_pages, 1);
        assert_eq!(PageWindow::compute(1, 20, 21).total_pages, 2);
        assert_eq!(PageWindow::compute(1, 20, 45).total_pages, 3);
    }

    #[test]
    fn empty_collection_shows_no_page_buttons() {
        let w = PageWindow::compute(1, 20, 0);
        assert!(w.is_empty());
        assert!(w.pages.is_empty());
        assert!(!w.has_prev);
        assert!(!w.has_next);
    }

    #[test]
    fn window_is_centered_and_capped_at_five() {
        // Far from both edges: centered on current.
        let w = PageWindow::compute(10, 10, 1000);
        assert_eq!(w.pages, vec![8, 9, 10, 11, 12]);

        // Near the start: window starts at 1.
        let w = PageWindow::compute(1, 10, 1000);
        assert_eq!(w.pages, vec![1, 2, 3, 4, 5]);

        // Near the end: window is clipped by total_pages.
        let w = PageWindow::compute(100, 10, 1000);
        assert_eq!(w.pages, vec![98, 99, 100]);
    }

    #[test]
    fn window_always_contains_current_page() {
        for total in [1u64, 19, 20, 45, 100, 999] {
            let window = PageWindow::compute(1, 20, total);
            for current in 1..=window.total_pages {
                let w = PageWindow::compute(current, 20, total);
                assert!(
                    w.pages.contains(&current),
                    "page {current} missing from window {:?} (total {total})",
                    w.pages
                );
                assert!(w.pages.len() <= 5);
                assert_eq!(w.pages.len() as u32, w.total_pages.min(5));
            }
        }
    }

    #[test]
    fn prev_next_affordances_at_boundaries() {
        let first = PageWindow::compute(1, 20, 45);
        assert!(!first.has_prev);
        assert!(first.has_next);

        let last = PageWindow::compute(3, 20, 45);
        assert!(last.has_prev);
        assert!(!last.has_next);

        let only = PageWindow::compute(1, 20, 5);
        assert!(!only.has_prev);
        assert!(!only.has_next);
    }

    #[test]
    fn intents_resolve_against_the_window() {
        let w = PageWindow::compute(2, 20, 45);
        assert_eq!(PageIntent::Prev.resolve(&w), Some(1));
        assert_eq!(PageIntent::Next.resolve(&w), Some(3));
        assert_eq!(PageIntent::Goto(3).resolve(&w), Some(3));
        assert_eq!(PageIntent::Goto(2).resolve(&w), None); // already there
        assert_eq!(PageIntent::Goto(4).resolve(&w), None); // out of range
        assert_eq!(PageIntent::Goto(0).resolve(&w), None);

        let last = PageWindow::compute(3, 20, 45);
        assert_eq!(PageIntent::Next.resolve(&last), None);

        let first = PageWindow::compute(1, 20, 45);
        assert_eq!(PageIntent::Prev.resolve(&first), None);
    }
}
