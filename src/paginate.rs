//! Local pagination over a fully fetched, ordered result set.

use crate::models::{Contact, PageResult};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 24;

/// Number of pages needed for `total` items at `page_size` per page.
///
/// `ceil(0 / p) == 0`, so an empty result set has zero pages.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Slices `records` down to the requested 1-based `page`.
///
/// Pages past the end produce an empty slice. `page == 0` is treated as the
/// first page and `page_size == 0` as [`DEFAULT_PAGE_SIZE`].
pub fn paginate(records: Vec<Contact>, page: usize, page_size: usize) -> PageResult {
    let page = page.max(1);
    let page_size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };

    let total_records = records.len();
    let start = (page - 1).saturating_mul(page_size).min(total_records);
    let end = start.saturating_add(page_size).min(total_records);

    let records = records
        .into_iter()
        .skip(start)
        .take(end - start)
        .collect();

    PageResult {
        records,
        total_records,
        current_page: page,
        total_pages: total_pages(total_records, page_size),
        page_size,
    }
}
