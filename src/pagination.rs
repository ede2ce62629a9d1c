use serde::Serialize;

/// Number of pages the server serves for `count` matching records.
///
/// This is the only page count the console trusts; a zero page size yields
/// zero pages.
pub fn page_count(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Page numbers to render in the navigation bar, with `None` standing for a gap.
fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// Navigation window around the current page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageWindow {
    pub fn new(current_page: usize, total_pages: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        Self {
            pages: get_pages(total_pages, current_page, 2, 2, 4, 2),
            page: current_page,
            has_prev: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}
