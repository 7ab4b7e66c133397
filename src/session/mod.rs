use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::AttendeeSource;
use crate::controller::{AttendeeList, FetchOutcome, FetchTicket};
use crate::debounce::Debouncer;
use crate::navigation::Navigation;
use crate::output::PageView;

/// A user action on the attendee screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// The search box now holds this text.
    Search(String),
    First,
    Previous,
    Next,
    Last,
    GoTo(u32),
    Back,
    Forward,
    Refresh,
    Quit,
}

/// Where the session draws.
pub trait Screen {
    fn loading(&mut self, active: bool);
    fn draw(&mut self, view: &PageView);
    fn notice(&mut self, message: &str);
}

enum Event {
    Input(Option<Input>),
    Commit(String),
    Fetched(FetchOutcome),
}

pub struct Session<N, S> {
    list: AttendeeList<N>,
    source: Arc<dyn AttendeeSource>,
    debouncer: Debouncer<String>,
    in_flight: FuturesUnordered<BoxFuture<'static, FetchOutcome>>,
    screen: S,
}

impl<N: Navigation, S: Screen> Session<N, S> {
    pub fn new(
        list: AttendeeList<N>,
        source: Arc<dyn AttendeeSource>,
        debouncer: Debouncer<String>,
        screen: S,
    ) -> Self {
        Self {
            list,
            source,
            debouncer,
            in_flight: FuturesUnordered::new(),
            screen,
        }
    }

    pub fn list(&self) -> &AttendeeList<N> {
        &self.list
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Fetches the seeded page once, settles it and draws the result.
    pub async fn run_once(&mut self) {
        let ticket = self.list.mount();
        self.dispatch(ticket);
        while let Some(outcome) = self.in_flight.next().await {
            self.receive(outcome);
        }
        self.screen.loading(false);
        self.screen.draw(&PageView::from_list(&self.list));
    }

    /// Drives the screen until `Quit`, or until `inputs` closes and all
    /// pending searches and fetches have finished.
    pub async fn run(&mut self, mut inputs: mpsc::Receiver<Input>) {
        let ticket = self.list.mount();
        self.dispatch(ticket);
        self.redraw();

        let mut inputs_open = true;
        loop {
            if !inputs_open && !self.debouncer.is_pending() && self.in_flight.is_empty() {
                break;
            }

            let event = tokio::select! {
                input = inputs.recv(), if inputs_open => Event::Input(input),
                Some(term) = self.debouncer.next_commit() => Event::Commit(term),
                Some(outcome) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    Event::Fetched(outcome)
                }
                else => break,
            };

            match event {
                Event::Input(None) => {
                    debug!("input closed, finishing pending work");
                    inputs_open = false;
                }
                Event::Input(Some(Input::Quit)) => break,
                Event::Input(Some(input)) => self.handle(input),
                Event::Commit(term) => {
                    let ticket = self.list.commit_search(&term);
                    self.dispatch(ticket);
                }
                Event::Fetched(outcome) => {
                    if self.receive(outcome) {
                        self.screen.loading(false);
                        self.redraw();
                    }
                }
            }
        }
        self.debouncer.cancel();
        self.screen.loading(false);
        info!("attendee session finished");
    }

    pub fn handle(&mut self, input: Input) {
        let ticket = match input {
            Input::Search(text) => {
                self.debouncer.push(text);
                None
            }
            Input::First => self.list.first_page(),
            Input::Previous => self.list.previous_page(),
            Input::Next => self.list.next_page(),
            Input::Last => self.list.last_page(),
            Input::GoTo(page) => match self.list.go_to(page) {
                Ok(ticket) => ticket,
                Err(e) => {
                    self.screen.notice(&e.to_string());
                    None
                }
            },
            Input::Back => self.list.back(),
            Input::Forward => self.list.forward(),
            Input::Refresh => self.list.refresh(),
            Input::Quit => None,
        };
        self.dispatch(ticket);
    }

    fn dispatch(&mut self, ticket: Option<FetchTicket>) {
        let Some(ticket) = ticket else {
            return;
        };
        let source = Arc::clone(&self.source);
        self.screen.loading(true);
        self.in_flight.push(Box::pin(async move {
            let result = source.fetch(&ticket.query).await;
            FetchOutcome {
                seq: ticket.seq,
                result,
            }
        }));
    }

    // true when the outcome settled the newest request
    fn receive(&mut self, outcome: FetchOutcome) -> bool {
        let latest = outcome.seq == self.list.latest_seq();
        let follow_up = self.list.apply(outcome);
        let settled = latest && follow_up.is_none();
        self.dispatch(follow_up);
        settled
    }

    fn redraw(&mut self) {
        self.screen.draw(&PageView::from_list(&self.list));
    }
}
