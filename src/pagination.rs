//! Page windows for listing templates.

use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Pages shown on each side of the current one.
const AROUND_CURRENT: usize = 2;

/// Number of pages needed for `total` items.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// Page links to render: the first and last page are always present,
/// neighbours of `current` are listed and gaps collapse into `None`.
fn page_window(total_pages: usize, current: usize) -> Vec<Option<usize>> {
    let mut pages = Vec::new();
    let mut previous = 0;

    for page in 1..=total_pages {
        let near_current = page.abs_diff(current) <= AROUND_CURRENT;
        if page == 1 || page == total_pages || near_current {
            if page > previous + 1 {
                pages.push(None);
            }
            pages.push(Some(page));
            previous = page;
        }
    }

    pages
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    /// `page` is clamped to at least 1.
    pub fn new(items: Vec<T>, page: usize, total: usize, per_page: usize) -> Self {
        let page = page.max(1);
        Self {
            items,
            pages: page_window(page_count(total, per_page), page),
            page,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_partial_last_page() {
        assert_eq!(page_count(0, 20), 0);
        assert_eq!(page_count(20, 20), 1);
        assert_eq!(page_count(21, 20), 2);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn small_totals_list_every_page() {
        assert_eq!(page_window(3, 2), vec![Some(1), Some(2), Some(3)]);
        assert!(page_window(0, 1).is_empty());
    }

    #[test]
    fn distant_pages_collapse() {
        assert_eq!(
            page_window(10, 5),
            vec![
                Some(1),
                None,
                Some(3),
                Some(4),
                Some(5),
                Some(6),
                Some(7),
                None,
                Some(10)
            ]
        );
    }

    #[test]
    fn zero_page_is_treated_as_first() {
        let paginated = Paginated::new(vec![1, 2], 0, 2, 20);
        assert_eq!(paginated.page, 1);
        assert_eq!(paginated.pages, vec![Some(1)]);
    }
}
