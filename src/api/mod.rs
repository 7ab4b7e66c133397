pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub use http::{HttpAttendeeSource, HttpOptions};

/// A registered participant as returned by the attendees endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub checked_in_at: Option<DateTime<Utc>>,
}

// ids are opaque, some deployments send them as integers
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Body of `GET /events/{eventId}/attendees`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttendeesPage {
    pub attendees: Vec<Attendee>,
    pub total: u64,
}

/// Parameters for one page request. `page_index` is zero-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttendeeQuery {
    pub page_index: u32,
    pub query: Option<String>,
}

impl AttendeeQuery {
    pub fn new(page: u32, search: &str) -> Self {
        let query = if search.is_empty() {
            None
        } else {
            Some(search.to_string())
        };
        Self {
            page_index: page.saturating_sub(1),
            query,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed attendees payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport { source, .. } => source.is_timeout() || source.is_connect(),
            ApiError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

/// Anything able to serve pages of attendees for one event.
#[async_trait]
pub trait AttendeeSource: Send + Sync {
    async fn fetch(&self, query: &AttendeeQuery) -> Result<AttendeesPage, ApiError>;
}
