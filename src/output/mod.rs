pub mod relative;
pub mod screen;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::api::Attendee;
use crate::controller::{AttendeeList, FetchStatus};
use crate::navigation::Navigation;
use crate::pagination::Controls;

pub use relative::time_since;
pub use screen::TerminalScreen;

pub const NOT_CHECKED_IN: &str = "Did not check in";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "table" | "text" | "txt" => Some(Self::Table),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Snapshot of what the attendee screen shows.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub attendees: Vec<Attendee>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub search: String,
    #[serde(skip)]
    pub controls: Controls,
    #[serde(skip)]
    pub status: FetchStatus,
}

impl PageView {
    pub fn from_list<N: Navigation>(list: &AttendeeList<N>) -> Self {
        Self {
            attendees: list.attendees().to_vec(),
            total: list.total(),
            page: list.page(),
            total_pages: list.total_pages(),
            search: list.search().to_string(),
            controls: list.controls(),
            status: list.status().clone(),
        }
    }
}

pub fn check_in_label(attendee: &Attendee, now: DateTime<Utc>) -> String {
    match attendee.checked_in_at {
        Some(at) => time_since(at, now),
        None => NOT_CHECKED_IN.to_string(),
    }
}

pub fn render_header() -> String {
    format!(
        "{}  {}\n",
        "Events".truecolor(212, 212, 216),
        "Attendees".bold()
    )
}

fn control(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{}]", label).bold().to_string()
    } else {
        format!("[{}]", label).dimmed().to_string()
    }
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        value.to_string()
    } else {
        format!("{}{}", value, " ".repeat(width - len))
    }
}

fn column_width(header: &str, cells: impl Iterator<Item = usize>) -> usize {
    cells.fold(header.len(), usize::max)
}

struct Row {
    code: String,
    name: String,
    email: String,
    registered: String,
    checked_in: String,
    attended: bool,
}

pub fn render_table(view: &PageView, now: DateTime<Utc>) -> String {
    let rows: Vec<Row> = view
        .attendees
        .iter()
        .map(|a| Row {
            code: a.id.clone(),
            name: a.name.clone(),
            email: a.email.clone(),
            registered: time_since(a.created_at, now),
            checked_in: check_in_label(a, now),
            attended: a.checked_in_at.is_some(),
        })
        .collect();

    let w_code = column_width("Code", rows.iter().map(|r| r.code.chars().count()));
    let w_name = column_width(
        "Attendee",
        rows.iter()
            .map(|r| r.name.chars().count().max(r.email.chars().count())),
    );
    let w_reg = column_width(
        "Registration",
        rows.iter().map(|r| r.registered.chars().count()),
    );

    let mut out = String::new();
    out.push_str(&format!(
        "  {}  {}  {}  {}\n",
        pad("Code", w_code).bold(),
        pad("Attendee", w_name).bold(),
        pad("Registration", w_reg).bold(),
        "Check-in".bold()
    ));
    let rule = w_code + w_name + w_reg + 16;
    out.push_str(&format!("  {}\n", "-".repeat(rule).dimmed()));

    for r in rows.iter() {
        let checked_in = if r.attended {
            r.checked_in.normal()
        } else {
            r.checked_in.truecolor(113, 113, 122)
        };
        out.push_str(&format!(
            "  {}  {}  {}  {}\n",
            pad(&r.code, w_code),
            pad(&r.name, w_name).bold().white(),
            pad(&r.registered, w_reg),
            checked_in
        ));
        out.push_str(&format!(
            "  {}  {}\n",
            " ".repeat(w_code),
            pad(&r.email, w_name).dimmed()
        ));
    }
    out.push_str(&format!("  {}\n", "-".repeat(rule).dimmed()));

    out.push_str(&render_footer(view));
    out
}

pub fn render_footer(view: &PageView) -> String {
    format!(
        "  Showing {} of {} items    Page {} of {}  {} {} {} {}\n",
        view.attendees.len(),
        view.total,
        view.page,
        view.total_pages,
        control("<<", view.controls.first),
        control("<", view.controls.previous),
        control(">", view.controls.next),
        control(">>", view.controls.last),
    )
}

pub fn render_status(status: &FetchStatus) -> Option<String> {
    match status {
        FetchStatus::Failed(message) => Some(format!(
            "{} {}\n",
            "Failed to load attendees:".bold().red(),
            message
        )),
        _ => None,
    }
}

pub fn render_json(view: &PageView) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(view).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}
