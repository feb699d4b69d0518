//! Page fetching capability
//!
//! `PageFetcher` is the transport seam: the controller hands it an
//! offset/limit window and expects a payload plus, optionally, an explicit
//! item count. `HttpPageFetcher` is the bundled implementation for plain
//! offset/limit HTTP endpoints.

use async_trait::async_trait;
use url::Url;

use crate::error::PagerError;

/// Offset/limit window of one page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u32,
}

/// One fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Raw payload, typically markup to append
    pub payload: String,
    /// Explicit item count. When absent the controller counts matches of
    /// the configured result selector in the payload.
    pub item_count: Option<usize>,
}

impl FetchedPage {
    /// Page with an explicit item count
    pub fn with_count(payload: impl Into<String>, item_count: usize) -> Self {
        Self {
            payload: payload.into(),
            item_count: Some(item_count),
        }
    }

    /// Markup-only page; the item count comes from the result selector
    pub fn markup(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            item_count: None,
        }
    }
}

/// Asynchronous page source
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &Url, window: PageWindow) -> Result<FetchedPage, PagerError>;
}

/// HTTP page fetcher: GET with `offset` and `limit` query parameters,
/// response body as the payload.
#[derive(Debug, Clone, Default)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, proxies, headers)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &Url, window: PageWindow) -> Result<FetchedPage, PagerError> {
        let response = self
            .client
            .get(url.clone())
            .query(&[
                ("offset", window.offset.to_string()),
                ("limit", window.limit.to_string()),
            ])
            .send()
            .await
            .map_err(PagerError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PagerError::Transport(format!("HTTP {status} from {url}")));
        }

        let payload = response.text().await.map_err(PagerError::transport)?;
        Ok(FetchedPage::markup(payload))
    }
}
