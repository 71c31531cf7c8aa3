//! # Pagination
//!
//! Page arithmetic for list views. Pages are 1-based. Links are produced
//! from a format string in which every `{0}` is replaced by the page
//! number.

use serde::Serialize;

/// Placeholder replaced by the page number in link formats.
pub const PAGE_PLACEHOLDER: &str = "{0}";

/// Link format used when none is given.
pub const DEFAULT_FORMAT: &str = "?page={0}";

/// A rendered page link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub url: String,
    pub page: u64,
    pub selected: bool,
}

/// Paging state for a list of `items` entries shown `max` at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub items: u64,
    /// Current page, 1-based.
    pub page: u64,
    /// Entries per page.
    pub max: u64,
    /// Number of pages.
    pub count: u64,
    /// Entries before the current page.
    pub skip: u64,
    /// Entries on a page.
    pub take: u64,
    pub is_prev: bool,
    pub is_next: bool,
    /// More than one page exists.
    pub visible: bool,
    pub format: String,
}

impl Pagination {
    /// Paging state for `items` entries, positioned on `page`, with `max`
    /// entries per page. `format` defaults to [`DEFAULT_FORMAT`].
    pub fn new(items: u64, page: u64, max: u64, format: Option<&str>) -> Self {
        let mut pagination = Self {
            items: 0,
            page: 1,
            max: 1,
            count: 0,
            skip: 0,
            take: 0,
            is_prev: false,
            is_next: false,
            visible: false,
            format: format.unwrap_or(DEFAULT_FORMAT).to_string(),
        };
        pagination.refresh(items, page, max);
        pagination
    }

    /// Recompute every derived field. A page below 1 is treated as 1 and a
    /// zero `max` as 1.
    pub fn refresh(&mut self, items: u64, page: u64, max: u64) -> &mut Self {
        let max = max.max(1);
        let page = page.max(1);

        self.items = items;
        self.max = max;
        self.count = items.div_ceil(max);
        self.page = page;
        self.skip = (page - 1).saturating_mul(max);
        self.take = max;
        self.is_prev = page > 1;
        self.is_next = page < self.count;
        self.visible = self.count > 1;
        self
    }

    /// Link to the previous page, wrapping to the last page from the first.
    pub fn prev(&self) -> PageLink {
        let page = if self.is_prev { self.page - 1 } else { self.count };
        self.link(page, false)
    }

    /// Link to the next page, wrapping to the first page from the last.
    pub fn next(&self) -> PageLink {
        let page = if self.is_next { self.page + 1 } else { 1 };
        self.link(page, false)
    }

    /// Links to every page.
    pub fn render(&self) -> Vec<PageLink> {
        self.render_range(1, self.count)
    }

    /// At most `max` links, centered on the current page where possible.
    /// Always `min(max, count)` contiguous links.
    pub fn render_window(&self, max: u64) -> Vec<PageLink> {
        let width = max.min(self.count);
        if width == 0 {
            return Vec::new();
        }

        // A page past the end anchors the window on the last page.
        let current = self.page.min(self.count);
        let mut from = current.saturating_sub(width / 2).max(1);
        let mut to = from + width - 1;
        if to > self.count {
            to = self.count;
            from = (self.count + 1).saturating_sub(width).max(1);
        }
        self.render_range(from, to)
    }

    /// Apply the format to `page`.
    pub fn url(&self, page: u64) -> String {
        self.format.replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    fn render_range(&self, from: u64, to: u64) -> Vec<PageLink> {
        (from..=to)
            .map(|page| self.link(page, page == self.page))
            .collect()
    }

    fn link(&self, page: u64, selected: bool) -> PageLink {
        PageLink {
            url: self.url(page),
            page,
            selected,
        }
    }
}
