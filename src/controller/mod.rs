//! Attendee list state: current page, active search term and the last page of
//! attendees received.
//!
//! Every state change that needs fresh data hands back a [`FetchTicket`]; the
//! caller runs it against an [`AttendeeSource`](crate::api::AttendeeSource)
//! and feeds the outcome to [`AttendeeList::apply`]. Tickets are numbered and
//! only the newest one is applied, so a slow response for an old page or
//! search never overwrites a newer result.

use tracing::{debug, error};

use crate::api::{ApiError, Attendee, AttendeeQuery, AttendeesPage};
use crate::navigation::Navigation;
use crate::pagination::{Controls, PageOutOfRange, PageWindow};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// A fetch the list is waiting on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub query: AttendeeQuery,
}

/// Result of running a [`FetchTicket`].
#[derive(Debug)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: Result<AttendeesPage, ApiError>,
}

#[derive(Debug)]
pub struct AttendeeList<N> {
    navigation: N,
    window: PageWindow,
    search: String,
    attendees: Vec<Attendee>,
    status: FetchStatus,
    mounted: bool,
    issued: u64,
}

impl<N: Navigation> AttendeeList<N> {
    /// Seeds the page from the navigation location; nothing is fetched yet.
    pub fn new(navigation: N) -> Self {
        let page = navigation.current_page().unwrap_or(1);
        Self {
            navigation,
            window: PageWindow::new(page, 0),
            search: String::new(),
            attendees: Vec::new(),
            status: FetchStatus::Idle,
            mounted: false,
            issued: 0,
        }
    }

    /// Sets the initial search term without triggering a fetch.
    pub fn with_search(mut self, search: &str) -> Self {
        if !self.mounted {
            self.search = search.to_string();
        }
        self
    }

    pub fn page(&self) -> u32 {
        self.window.page()
    }

    pub fn total(&self) -> u64 {
        self.window.total()
    }

    pub fn total_pages(&self) -> u32 {
        self.window.total_pages()
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn controls(&self) -> Controls {
        self.window.controls()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn navigation(&self) -> &N {
        &self.navigation
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Sequence number of the newest ticket handed out.
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    /// Issues the single initial fetch. Mounting twice is a no-op.
    pub fn mount(&mut self) -> Option<FetchTicket> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        Some(self.issue())
    }

    /// Re-issues the request for the current page and search term.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        self.refetch()
    }

    /// Activates a debounced search term.
    pub fn commit_search(&mut self, term: &str) -> Option<FetchTicket> {
        if term == self.search {
            return None;
        }
        debug!(search = term, "search committed");
        self.search = term.to_string();
        self.refetch()
    }

    pub fn first_page(&mut self) -> Option<FetchTicket> {
        let page = self.window.first()?;
        self.set_current_page(page)
    }

    pub fn previous_page(&mut self) -> Option<FetchTicket> {
        let page = self.window.previous()?;
        self.set_current_page(page)
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        let page = self.window.next()?;
        self.set_current_page(page)
    }

    pub fn last_page(&mut self) -> Option<FetchTicket> {
        let page = self.window.last()?;
        self.set_current_page(page)
    }

    pub fn go_to(&mut self, page: u32) -> Result<Option<FetchTicket>, PageOutOfRange> {
        Ok(match self.window.go_to(page)? {
            Some(page) => self.set_current_page(page),
            None => None,
        })
    }

    pub fn back(&mut self) -> Option<FetchTicket> {
        let page = self.navigation.back()?;
        self.restore_page(page)
    }

    pub fn forward(&mut self) -> Option<FetchTicket> {
        let page = self.navigation.forward()?;
        self.restore_page(page)
    }

    /// Applies a finished fetch. Returns a follow-up ticket when the response
    /// shows the current page is past the end of the collection.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Option<FetchTicket> {
        if outcome.seq != self.issued {
            debug!(
                seq = outcome.seq,
                latest = self.issued,
                "discarding stale attendees response"
            );
            return None;
        }

        match outcome.result {
            Ok(page) => {
                debug!(
                    seq = outcome.seq,
                    received = page.attendees.len(),
                    total = page.total,
                    "attendees page applied"
                );
                self.attendees = page.attendees;
                self.window.set_total(page.total);
                self.status = FetchStatus::Ready;
                // a correction of the current entry, not a new visit
                let target = self.window.overflow_target()?;
                self.navigation.replace_page(target);
                self.restore_page(target)
            }
            Err(e) => {
                error!(seq = outcome.seq, error = %e, "failed to load attendees");
                self.status = FetchStatus::Failed(e.to_string());
                None
            }
        }
    }

    fn set_current_page(&mut self, page: u32) -> Option<FetchTicket> {
        self.navigation.push_page(page);
        self.restore_page(page)
    }

    fn restore_page(&mut self, page: u32) -> Option<FetchTicket> {
        if page == self.window.page() {
            return None;
        }
        self.window.set_page(page);
        self.refetch()
    }

    // before mounting, state changes only seed the initial request
    fn refetch(&mut self) -> Option<FetchTicket> {
        if !self.mounted {
            return None;
        }
        Some(self.issue())
    }

    fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        self.status = FetchStatus::Loading;
        let ticket = FetchTicket {
            seq: self.issued,
            query: AttendeeQuery::new(self.window.page(), &self.search),
        };
        debug!(seq = ticket.seq, query = ?ticket.query, "attendees fetch issued");
        ticket
    }
}
