//! Fixed-size pagination.
//!
//! # Invariants
//! - Pages are 1-based.
//! - `total_pages = ceil(len / page_size)`; an empty list has zero pages.
//! - The requested page is clamped into `1..=max(total_pages, 1)`.

/// Rows shown by the registry table per page.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One rendered page of a filtered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<T> {
    pub items: Vec<T>,
    /// Effective 1-based page after clamping.
    pub page: usize,
    pub total_pages: usize,
    /// Number of rows across all pages.
    pub total_items: usize,
}

impl<T> PageView<T> {
    /// Prev is enabled on every page after the first.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Next is enabled until the last page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Returns `ceil(total_items / page_size)`. A zero page size yields zero pages.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Clamps a 1-based page number for a list with `total_pages` pages.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slices `items` into the requested page.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> PageView<T> {
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);
    let page = clamp_page(page, total_pages);
    let start = (page - 1).saturating_mul(page_size);
    let items = items.into_iter().skip(start).take(page_size).collect();

    PageView {
        items,
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::{clamp_page, paginate, total_pages};

    #[test]
    fn seven_items_make_two_pages_of_five() {
        let first = paginate((1..=7).collect::<Vec<_>>(), 1, 5);
        assert_eq!(first.items, vec![1, 2, 3, 4, 5]);
        assert_eq!(first.total_pages, 2);
        assert!(!first.has_prev());
        assert!(first.has_next());

        let second = paginate((1..=7).collect::<Vec<_>>(), 2, 5);
        assert_eq!(second.items, vec![6, 7]);
        assert!(second.has_prev());
        assert!(!second.has_next());
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        assert_eq!(paginate((1..=7).collect::<Vec<_>>(), 9, 5).page, 2);
        assert_eq!(paginate(Vec::<u32>::new(), 3, 5).page, 1);
        assert_eq!(clamp_page(0, 4), 1);
    }

    #[test]
    fn empty_list_has_zero_pages_and_no_navigation() {
        let view = paginate(Vec::<u32>::new(), 1, 5);
        assert_eq!(total_pages(0, 5), 0);
        assert!(view.items.is_empty());
        assert!(!view.has_prev());
        assert!(!view.has_next());
    }
}
