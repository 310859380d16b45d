//! Fixed-size page math for the warning log view.
//!
//! Pages are 1-based. A log of `n` records has `ceil(n / PAGE_SIZE)`
//! pages; an empty log has none.

/// Records per event-log page.
pub const PAGE_SIZE: usize = 10;

/// Number of pages needed for `total` records.
pub fn total_pages(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// Clamp a requested page into `[1, total_pages]`.
///
/// With no pages at all the result is `1`, whose slice is empty.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total_pages(total).max(1))
}

/// The slice for 1-based `page`. Out-of-range pages (including `0`) yield
/// an empty slice.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}
