use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// 1-based page after clamping
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total: usize,
    pub start: usize,
    pub end: usize,
}

/// Slice bounds for `requested` page, clamped into `[1, total_pages]`.
/// An empty list still has one (empty) page.
pub fn paginate(total: usize, requested: usize, page_size: usize) -> PageWindow {
    let page_size = page_size.max(1);
    let total_pages = total.div_ceil(page_size).max(1);
    let page = requested.clamp(1, total_pages);
    let start = ((page - 1) * page_size).min(total);
    let end = (start + page_size).min(total);

    PageWindow {
        page,
        total_pages,
        page_size,
        total,
        start,
        end,
    }
}

impl PageWindow {
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.start.min(items.len())..self.end.min(items.len())]
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}
