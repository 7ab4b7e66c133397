use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::api::{ApiError, Attendee, AttendeeQuery, AttendeeSource, AttendeesPage};
use crate::controller::{AttendeeList, FetchStatus};
use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use crate::navigation::{Location, Navigation};
use crate::output::PageView;
use crate::pagination::PAGE_SIZE;
use crate::session::{Input, Screen, Session};

#[derive(Default)]
struct FakeSource {
    total: u64,
    fail: bool,
    delays: HashMap<u32, Duration>,
    queries: Mutex<Vec<AttendeeQuery>>,
}

impl FakeSource {
    fn with_total(total: u64) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    fn delay(mut self, page_index: u32, delay: Duration) -> Self {
        self.delays.insert(page_index, delay);
        self
    }

    fn queries(&self) -> Vec<AttendeeQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AttendeeSource for FakeSource {
    async fn fetch(&self, query: &AttendeeQuery) -> Result<AttendeesPage, ApiError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(delay) = self.delays.get(&query.page_index) {
            sleep(*delay).await;
        }
        if self.fail {
            return Err(ApiError::Status {
                url: "http://localhost:3333/events/e1/attendees".to_string(),
                status: 502,
            });
        }

        let start = u64::from(query.page_index) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(self.total);
        let attendees = (start..end)
            .map(|n| Attendee {
                id: format!("p{}-{}", query.page_index, n),
                name: format!("Attendee {n}"),
                email: format!("attendee{n}@example.com"),
                created_at: Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap(),
                checked_in_at: None,
            })
            .collect();
        Ok(AttendeesPage {
            attendees,
            total: self.total,
        })
    }
}

#[derive(Default)]
struct RecordingScreen {
    draws: Vec<PageView>,
    notices: Vec<String>,
}

impl Screen for RecordingScreen {
    fn loading(&mut self, _active: bool) {}

    fn draw(&mut self, view: &PageView) {
        self.draws.push(view.clone());
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

fn session(
    location: &str,
    source: Arc<FakeSource>,
) -> Session<Location, RecordingScreen> {
    let list = AttendeeList::new(Location::parse(location).unwrap());
    Session::new(
        list,
        source,
        Debouncer::new(DEFAULT_DEBOUNCE),
        RecordingScreen::default(),
    )
}

fn feed(inputs: Vec<(Duration, Input)>) -> mpsc::Receiver<Input> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        for (wait, input) in inputs {
            sleep(wait).await;
            if tx.send(input).await.is_err() {
                break;
            }
        }
    });
    rx
}

#[tokio::test(start_paused = true)]
async fn page_parameter_seeds_a_single_initial_fetch() {
    let source = Arc::new(FakeSource::with_total(25));
    let mut s = session("app:/attendees?page=2", source.clone());

    s.run(feed(vec![])).await;

    assert_eq!(
        source.queries(),
        vec![AttendeeQuery {
            page_index: 1,
            query: None
        }]
    );
    assert_eq!(s.list().page(), 2);
    assert_eq!(s.list().attendees()[0].id, "p1-10");
    assert_eq!(s.list().status(), &FetchStatus::Ready);
}

#[tokio::test(start_paused = true)]
async fn rapid_keystrokes_commit_one_search() {
    let source = Arc::new(FakeSource::with_total(25));
    let mut s = session("app:/attendees", source.clone());
    let step = Duration::from_millis(300);

    s.run(feed(vec![
        (step, Input::Search("a".to_string())),
        (step, Input::Search("ab".to_string())),
        (step, Input::Search("abc".to_string())),
    ]))
    .await;

    assert_eq!(
        source.queries(),
        vec![AttendeeQuery::new(1, ""), AttendeeQuery::new(1, "abc")]
    );
    assert_eq!(s.list().search(), "abc");
}

#[tokio::test(start_paused = true)]
async fn keystrokes_after_the_quiet_period_search_again() {
    let source = Arc::new(FakeSource::with_total(25));
    let mut s = session("app:/attendees", source.clone());

    s.run(feed(vec![
        (Duration::from_millis(10), Input::Search("an".to_string())),
        (Duration::from_secs(2), Input::Search("ana".to_string())),
    ]))
    .await;

    assert_eq!(
        source.queries(),
        vec![
            AttendeeQuery::new(1, ""),
            AttendeeQuery::new(1, "an"),
            AttendeeQuery::new(1, "ana"),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn slow_stale_page_does_not_overwrite_newer_page() {
    let source = Arc::new(
        FakeSource::with_total(25)
            .delay(1, Duration::from_secs(5))
            .delay(2, Duration::from_millis(100)),
    );
    let mut s = session("app:/attendees", source.clone());
    let tick = Duration::from_millis(10);

    s.run(feed(vec![(tick, Input::Next), (tick, Input::Next)]))
        .await;

    let indexes: Vec<u32> = source.queries().iter().map(|q| q.page_index).collect();
    assert_eq!(indexes, vec![0, 1, 2]);
    assert_eq!(s.list().page(), 3);
    assert!(s.list().attendees().iter().all(|a| a.id.starts_with("p2-")));
    let last = s.screen().draws.last().unwrap();
    assert_eq!(last.page, 3);
    assert_eq!(last.attendees.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn navigation_past_the_edges_is_a_no_op() {
    let source = Arc::new(FakeSource::with_total(25));
    let mut s = session("app:/attendees", source.clone());
    let tick = Duration::from_millis(10);

    s.run(feed(vec![
        (tick, Input::Previous),
        (tick, Input::First),
        (tick, Input::Last),
        (tick, Input::Next),
        (tick, Input::GoTo(4)),
    ]))
    .await;

    let indexes: Vec<u32> = source.queries().iter().map(|q| q.page_index).collect();
    assert_eq!(indexes, vec![0, 2]);
    assert_eq!(s.list().navigation().current_page(), Some(3));
    assert_eq!(s.screen().notices.len(), 1);
    assert!(s.screen().notices[0].contains("outside"));
}

#[tokio::test(start_paused = true)]
async fn back_restores_previous_page() {
    let source = Arc::new(FakeSource::with_total(25));
    let mut s = session("app:/attendees", source.clone());
    let tick = Duration::from_millis(10);

    s.run(feed(vec![
        (tick, Input::Next),
        (tick, Input::Next),
        (tick, Input::Back),
    ]))
    .await;

    let indexes: Vec<u32> = source.queries().iter().map(|q| q.page_index).collect();
    assert_eq!(indexes, vec![0, 1, 2, 1]);
    assert_eq!(s.list().page(), 2);
}

#[tokio::test(start_paused = true)]
async fn quit_abandons_pending_search() {
    let source = Arc::new(FakeSource::with_total(25));
    let mut s = session("app:/attendees", source.clone());
    let tick = Duration::from_millis(10);

    s.run(feed(vec![
        (tick, Input::Search("late".to_string())),
        (tick, Input::Quit),
    ]))
    .await;

    assert_eq!(source.queries(), vec![AttendeeQuery::new(1, "")]);
    assert_eq!(s.list().search(), "");
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_is_surfaced() {
    let source = Arc::new(FakeSource {
        fail: true,
        ..FakeSource::with_total(25)
    });
    let mut s = session("app:/attendees", source.clone());

    s.run(feed(vec![])).await;

    let last = s.screen().draws.last().unwrap();
    assert!(matches!(&last.status, FetchStatus::Failed(msg) if msg.contains("502")));
    assert!(s.list().attendees().is_empty());
}

#[tokio::test(start_paused = true)]
async fn run_once_settles_page_past_the_end() {
    let source = Arc::new(FakeSource::with_total(25));
    let mut s = session("app:/attendees?page=9", source.clone());

    s.run_once().await;

    let indexes: Vec<u32> = source.queries().iter().map(|q| q.page_index).collect();
    assert_eq!(indexes, vec![8, 2]);
    assert_eq!(s.screen().draws.len(), 1);
    assert_eq!(s.screen().draws[0].page, 3);
    assert_eq!(s.screen().draws[0].attendees.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn initial_search_goes_out_with_the_first_fetch() {
    let source = Arc::new(FakeSource::with_total(3));
    let list = AttendeeList::new(Location::parse(Location::DEFAULT).unwrap()).with_search("bo");
    let mut s = Session::new(
        list,
        source.clone(),
        Debouncer::new(DEFAULT_DEBOUNCE),
        RecordingScreen::default(),
    );

    s.run_once().await;

    assert_eq!(source.queries(), vec![AttendeeQuery::new(1, "bo")]);
    let view = &s.screen().draws[0];
    assert_eq!(view.total_pages, 1);
    assert!(!view.controls.next && !view.controls.last);
}
