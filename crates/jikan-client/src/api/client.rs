//! Jikan API client with single-flight search.

use super::single_flight::SingleFlight;
use super::transport::{HttpTransport, RawResponse, ReqwestTransport};
use super::types::{AnimeResponse, SearchResponse};
use crate::error::CatalogError;
use anyhow::{bail, Context, Result};
use reqwest::Url;
use serde::de::DeserializeOwned;
use shared::config::CatalogConfig;
use shared::{AnimeDetail, SearchPage};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Jikan caps `limit` at 25 per page
const MAX_PAGE_LIMIT: u32 = 25;

/// Jikan API v4 client
///
/// Cloning is cheap and clones share the outstanding-search handle, so a
/// search started through any clone supersedes one started through another.
pub struct JikanClient<T = ReqwestTransport> {
    /// HTTP transport
    transport: Arc<T>,
    /// Base URL for Jikan API, without trailing slash
    base_url: String,
    /// Items requested per search page
    page_limit: u32,
    /// Outstanding search handle
    searches: Arc<SingleFlight>,
}

impl<T> Clone for JikanClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            base_url: self.base_url.clone(),
            page_limit: self.page_limit,
            searches: Arc::clone(&self.searches),
        }
    }
}

/// Which endpoint a response belongs to; only detail lookups map 404 to `NotFound`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Search,
    Detail,
}

impl JikanClient<ReqwestTransport> {
    /// Create a new Jikan client backed by reqwest
    pub fn new(
        base_url: impl Into<String>,
        page_limit: u32,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self> {
        let transport = ReqwestTransport::new(timeout, user_agent)?;
        Self::with_transport(transport, base_url, page_limit)
    }

    /// Create a client from the `[catalog]` config section
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.page_limit,
            config.request_timeout(),
            &config.user_agent,
        )
    }
}

impl<T: HttpTransport> JikanClient<T> {
    /// Create a client over any transport
    pub fn with_transport(transport: T, base_url: impl Into<String>, page_limit: u32) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url).with_context(|| format!("Invalid catalog base URL: {}", base_url))?;

        if page_limit == 0 {
            bail!("Search page limit must be at least 1");
        }
        if page_limit > MAX_PAGE_LIMIT {
            warn!(page_limit = page_limit, max = MAX_PAGE_LIMIT, "Page limit above API maximum, clamping");
        }

        Ok(Self {
            transport: Arc::new(transport),
            base_url,
            page_limit: page_limit.min(MAX_PAGE_LIMIT),
            searches: Arc::new(SingleFlight::default()),
        })
    }

    /// Search the catalog for `query`, returning one page of results.
    ///
    /// Any search still outstanding from this client is cancelled when this
    /// method is called, before the returned future is polled. That earlier
    /// search then resolves to [`CatalogError::Cancelled`].
    pub fn search_anime(
        &self,
        query: &str,
        page: u32,
    ) -> impl Future<Output = Result<SearchPage, CatalogError>> + Send + 'static {
        let flight = self.searches.begin();
        let url = self.endpoint(
            "/anime",
            &[
                ("q", query.to_string()),
                ("page", page.to_string()),
                ("limit", self.page_limit.to_string()),
            ],
        );
        let transport = Arc::clone(&self.transport);
        let searches = Arc::clone(&self.searches);

        info!(query = query, page = page, flight = flight.id(), "Searching anime");

        async move {
            let outcome = match url {
                Ok(url) => {
                    tokio::select! {
                        biased;
                        _ = flight.token().cancelled() => Err(CatalogError::Cancelled),
                        response = transport.get(url) => response
                            .and_then(|r| decode::<SearchResponse>(r, Lookup::Search))
                            .map(SearchResponse::into_page),
                    }
                }
                Err(e) => Err(e),
            };

            searches.finish(&flight);

            match &outcome {
                Ok(page) => debug!(
                    flight = flight.id(),
                    results = page.results.len(),
                    current_page = page.pagination.current_page,
                    "Search completed"
                ),
                Err(CatalogError::Cancelled) => debug!(flight = flight.id(), "Search cancelled"),
                Err(e) => warn!(flight = flight.id(), error = %e, "Search failed"),
            }

            outcome
        }
    }

    /// Fetch full anime details by MAL ID.
    ///
    /// Detail lookups are not single-flight; callers discard stale results.
    pub async fn get_anime_details(&self, id: u32) -> Result<AnimeDetail, CatalogError> {
        debug!(mal_id = id, "Fetching anime details");

        let url = self.endpoint(&format!("/anime/{}", id), &[])?;
        let response = self.transport.get(url).await.map_err(|e| {
            warn!(mal_id = id, error = %e, "Detail request error");
            e
        })?;

        let body: AnimeResponse = decode(response, Lookup::Detail)?;
        Ok(body.data.into_detail())
    }

    /// Cancel the outstanding search, if any. Idempotent; detail lookups are unaffected.
    pub fn cancel_outstanding(&self) {
        self.searches.cancel();
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, CatalogError> {
        let raw = format!("{}{}", self.base_url, path);
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|e| CatalogError::InvalidUrl(e.to_string()))
    }
}

/// Map a raw exchange onto the error taxonomy, or decode its body
fn decode<D: DeserializeOwned>(response: RawResponse, lookup: Lookup) -> Result<D, CatalogError> {
    if response.is_success() {
        return serde_json::from_str(&response.body).map_err(|e| {
            warn!(error = %e, "Failed to parse response");
            CatalogError::Decode(e.to_string())
        });
    }

    warn!(
        status = response.status,
        lookup = ?lookup,
        "Request failed"
    );

    match (lookup, response.status) {
        (Lookup::Detail, 404) => Err(CatalogError::NotFound),
        (_, status) => Err(CatalogError::Http { status }),
    }
}
