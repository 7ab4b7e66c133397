use thiserror::Error;

/// Number of attendees the remote service returns per page.
pub const PAGE_SIZE: u64 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("page {page} is outside 1..={total_pages}")]
pub struct PageOutOfRange {
    pub page: u32,
    pub total_pages: u32,
}

/// One-based page position over a collection of `total` items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    total: u64,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self { page: 1, total: 0 }
    }
}

impl PageWindow {
    pub fn new(page: u32, total: u64) -> Self {
        Self {
            page: page.max(1),
            total,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        let pages = self.total.div_ceil(PAGE_SIZE);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn can_go_back(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_forward(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn first(&self) -> Option<u32> {
        self.can_go_back().then_some(1)
    }

    pub fn previous(&self) -> Option<u32> {
        self.can_go_back().then(|| self.page - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.can_go_forward().then(|| self.page + 1)
    }

    pub fn last(&self) -> Option<u32> {
        self.can_go_forward().then(|| self.total_pages())
    }

    /// Validates an explicit jump; the current page is not a valid target.
    pub fn go_to(&self, page: u32) -> Result<Option<u32>, PageOutOfRange> {
        let total_pages = self.total_pages();
        if page == 0 || page > total_pages {
            return Err(PageOutOfRange { page, total_pages });
        }
        Ok((page != self.page).then_some(page))
    }

    /// Page to move to when the current one fell beyond the last page.
    pub fn overflow_target(&self) -> Option<u32> {
        let total_pages = self.total_pages();
        (total_pages > 0 && self.page > total_pages).then_some(total_pages)
    }

    /// State of the first/prev/next/last controls.
    pub fn controls(&self) -> Controls {
        let at_start = self.page == 1;
        let at_end = self.page >= self.total_pages();
        Controls {
            first: !at_start,
            previous: !at_start,
            next: !at_end,
            last: !at_end,
        }
    }
}

/// Which navigation controls are enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Controls {
    pub first: bool,
    pub previous: bool,
    pub next: bool,
    pub last: bool,
}
