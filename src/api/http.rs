use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use super::{ApiError, AttendeeQuery, AttendeeSource, AttendeesPage};

#[derive(Clone, Debug)]
pub struct HttpOptions {
    pub base_url: String,
    pub event_id: String,
    pub timeout_seconds: u64,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            event_id: String::new(),
            timeout_seconds: 10,
            retries: 2,
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// Fetches attendee pages from `{base}/events/{eventId}/attendees`.
#[derive(Clone, Debug)]
pub struct HttpAttendeeSource {
    client: reqwest::Client,
    endpoint: Url,
    retries: u32,
    retry_delay: Duration,
}

impl HttpAttendeeSource {
    pub fn new(options: &HttpOptions) -> Result<Self, ApiError> {
        let endpoint = attendees_endpoint(&options.base_url, &options.event_id)?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("attendees/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(options.timeout_seconds.max(1)))
            .build()
            .map_err(|e| ApiError::HttpClientBuild { source: e })?;

        Ok(Self {
            client,
            endpoint,
            retries: options.retries,
            retry_delay: options.retry_delay,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch_once(&self, url: &Url) -> Result<AttendeesPage, ApiError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<AttendeesPage>()
            .await
            .map_err(|e| ApiError::Decode {
                url: url.to_string(),
                source: e,
            })
    }
}

#[async_trait]
impl AttendeeSource for HttpAttendeeSource {
    async fn fetch(&self, query: &AttendeeQuery) -> Result<AttendeesPage, ApiError> {
        let url = request_url(&self.endpoint, query);
        let mut attempt = 0;
        loop {
            debug!(%url, attempt, "fetching attendees");
            match self.fetch_once(&url).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    let delay = self.retry_delay * attempt;
                    warn!(error = %e, attempt, ?delay, "transient failure, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Joins the event attendees path onto `base`, keeping any path prefix it has.
pub fn attendees_endpoint(base: &str, event_id: &str) -> Result<Url, ApiError> {
    let invalid = || ApiError::InvalidBaseUrl {
        url: base.to_string(),
    };
    let mut url = Url::parse(base.trim()).map_err(|_| invalid())?;
    if url.cannot_be_a_base() || event_id.trim().is_empty() {
        return Err(invalid());
    }
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url.path_segments_mut().map_err(|_| invalid())?;
        segments
            .pop_if_empty()
            .push("events")
            .push(event_id.trim())
            .push("attendees");
    }
    Ok(url)
}

pub fn request_url(endpoint: &Url, query: &AttendeeQuery) -> Url {
    let mut url = endpoint.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("pageIndex", &query.page_index.to_string());
        if let Some(search) = query.query.as_deref() {
            pairs.append_pair("query", search);
        }
    }
    url
}
