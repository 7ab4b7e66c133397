//! Screen location state.
//!
//! The page number lives in the `page` query parameter of the screen URL. The
//! controller reads it once when mounting and pushes a new history entry on
//! every explicit page change, so back/forward walk the visited pages.

use std::num::IntErrorKind;

use reqwest::Url;
use thiserror::Error;

pub const PAGE_PARAM: &str = "page";

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("invalid location '{location}'")]
    InvalidLocation { location: String },
}

pub trait Navigation {
    /// Page carried by the current location, if it names a valid one.
    fn current_page(&self) -> Option<u32>;

    /// Records `page` as a new history entry after the current one.
    fn push_page(&mut self, page: u32);

    /// Rewrites the current history entry to carry `page`.
    fn replace_page(&mut self, page: u32);

    /// Steps back in history, returning the page of the entry landed on.
    fn back(&mut self) -> Option<u32>;

    /// Steps forward in history, returning the page of the entry landed on.
    fn forward(&mut self) -> Option<u32>;
}

/// Parses a raw `page` value: positive integers only, saturating at
/// `u32::MAX` so oversized pages clamp like any other page past the end.
pub fn parse_page(raw: &str) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(page) => (page >= 1).then_some(page),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
        Err(_) => None,
    }
}

fn page_of(url: &Url) -> Option<u32> {
    url.query_pairs()
        .find(|(k, _)| k == PAGE_PARAM)
        .and_then(|(_, v)| parse_page(&v))
}

fn with_page(url: &Url, page: u32) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != PAGE_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut next = url.clone();
    next.set_query(None);
    {
        let mut pairs = next.query_pairs_mut();
        for (k, v) in kept.iter() {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(PAGE_PARAM, &page.to_string());
    }
    next
}

/// In-memory location with a browser-like history stack.
#[derive(Clone, Debug)]
pub struct Location {
    entries: Vec<Url>,
    cursor: usize,
}

impl Location {
    pub const DEFAULT: &'static str = "app:/attendees";

    pub fn parse(location: &str) -> Result<Self, NavigationError> {
        let url = Url::parse(location.trim()).map_err(|_| NavigationError::InvalidLocation {
            location: location.to_string(),
        })?;
        Ok(Self::from_url(url))
    }

    pub fn from_url(url: Url) -> Self {
        Self {
            entries: vec![url],
            cursor: 0,
        }
    }

    pub fn url(&self) -> &Url {
        &self.entries[self.cursor]
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }
}

impl Navigation for Location {
    fn current_page(&self) -> Option<u32> {
        page_of(self.url())
    }

    fn push_page(&mut self, page: u32) {
        let next = with_page(self.url(), page);
        // a push drops any entries ahead of the cursor
        self.entries.truncate(self.cursor + 1);
        self.entries.push(next);
        self.cursor = self.entries.len() - 1;
    }

    fn replace_page(&mut self, page: u32) {
        let next = with_page(self.url(), page);
        self.entries[self.cursor] = next;
    }

    fn back(&mut self) -> Option<u32> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current_page().unwrap_or(1))
    }

    fn forward(&mut self) -> Option<u32> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current_page().unwrap_or(1))
    }
}
