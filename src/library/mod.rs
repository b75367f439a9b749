//! Paginated listing of the photo library.
//!
//! The listing endpoint links pages through an opaque continuation cursor.
//! [`LibraryClient::pages`] walks that chain lazily: one request in flight
//! at a time, each page handed to the consumer as soon as it decodes, and
//! the full result set never buffered. The stream ends when a response
//! carries no continuation cursor, regardless of how many items it held.

mod error;
mod types;

pub use error::LibraryError;
pub use types::{MediaItem, MediaMetadata, Page, PhotoMetadata, VideoMetadata};

use futures_util::Stream;
use tokio::sync::Mutex;
use tracing::debug;

use crate::auth::{AuthError, Credential, OAuthFlow};
use types::PageBody;

/// Items requested per page. Fixed, not configurable.
pub const PAGE_SIZE: u32 = 100;

/// Production listing endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://photoslibrary.googleapis.com";

/// Authenticated client for the media-item listing endpoint.
#[derive(Debug)]
pub struct LibraryClient {
    http: reqwest::Client,
    flow: OAuthFlow,
    credential: Mutex<Credential>,
    base_url: String,
}

impl LibraryClient {
    /// Creates a client against the production endpoint.
    #[must_use]
    pub fn new(flow: OAuthFlow, credential: Credential) -> Self {
        Self::with_base_url(flow, credential, DEFAULT_BASE_URL)
    }

    /// Creates a client against an explicit endpoint base. Used by the
    /// integration tests to point at a mock server.
    #[must_use]
    pub fn with_base_url(
        flow: OAuthFlow,
        credential: Credential,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            flow,
            credential: Mutex::new(credential),
            base_url: base_url.into(),
        }
    }

    /// Returns a guaranteed-fresh bearer token, refreshing first when the
    /// credential is past its buffered expiry.
    async fn bearer(&self) -> Result<String, AuthError> {
        let mut credential = self.credential.lock().await;
        if credential.is_expired() {
            self.flow.refresh(&mut credential).await?;
        }
        Ok(credential.access_token().to_string())
    }

    /// Fetches one page, optionally continuing from a cursor.
    ///
    /// The returned [`Page`] records the cursor it was fetched with.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError` on transport failure, a non-success status,
    /// a body that does not match the declared schema, or a failed token
    /// refresh.
    pub async fn list_page(&self, page_token: Option<&str>) -> Result<Page, LibraryError> {
        let bearer = self.bearer().await?;

        let url = format!("{}/v1/mediaItems", self.base_url);
        let page_size = PAGE_SIZE.to_string();
        let mut query: Vec<(&str, &str)> = vec![("pageSize", page_size.as_str())];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .http
            .get(&url)
            .bearer_auth(&bearer)
            .query(&query)
            .send()
            .await
            .map_err(LibraryError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LibraryError::status(status.as_u16()));
        }

        let raw = response.text().await.map_err(LibraryError::transport)?;
        let body: PageBody = serde_json::from_str(&raw).map_err(LibraryError::parse)?;
        let page = Page::from_body(page_token.map(str::to_string), body);

        debug!(
            page_token = page.page_token.as_deref().unwrap_or("<first>"),
            items = page.media_items.len(),
            has_more = page.has_more(),
            "fetched page"
        );
        Ok(page)
    }

    /// Lazily walks the whole cursor chain, yielding one page per step.
    ///
    /// Exactly one request is in flight at any time; page N+1 is not
    /// prefetched while N is being consumed. An empty page that carries a
    /// continuation cursor does not end the stream; a page without one
    /// ends it unconditionally. Restartable only by calling `pages()`
    /// again, which starts over from the first page.
    pub fn pages(&self) -> impl Stream<Item = Result<Page, LibraryError>> + '_ {
        // State is the cursor for the next fetch: `Some(None)` fetches the
        // first page, `Some(Some(token))` continues, `None` terminates.
        futures_util::stream::try_unfold(Some(None::<String>), move |state| async move {
            let Some(cursor) = state else {
                return Ok(None);
            };
            let page = self.list_page(cursor.as_deref()).await?;
            let next_state = page.next_page_token.clone().map(Some);
            Ok(Some((page, next_state)))
        })
    }
}
