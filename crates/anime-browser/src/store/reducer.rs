//! Pure state transitions.
//!
//! `reduce` never performs I/O. It updates the [`Core`] and returns the
//! effects the runtime must carry out, in order.

use super::action::{Action, Effect, Intent, RequestToken};
use super::state::{AppState, DetailState, SearchState};
use crate::favorites::FavoritesSet;
use jikan_client::CatalogError;
use shared::{AnimeDetail, SearchPage};
use tracing::{debug, warn};

/// Search in flight, and what the search view showed before it started
#[derive(Debug, Clone)]
struct PendingSearch {
    token: RequestToken,
    /// Query and error on screen before the first of a run of superseding searches
    prior_query: String,
    prior_error: Option<String>,
}

/// Application state plus the bookkeeping needed to reject stale responses
#[derive(Debug, Clone)]
pub struct Core {
    pub state: AppState,
    search_request: Option<PendingSearch>,
    detail_request: Option<RequestToken>,
    next_token: u64,
}

impl Core {
    pub fn new(favorites: FavoritesSet) -> Self {
        Self {
            state: AppState::with_favorites(favorites),
            search_request: None,
            detail_request: None,
            next_token: 0,
        }
    }

    /// Token of the search whose outcome would currently be applied
    pub fn current_search(&self) -> Option<RequestToken> {
        self.search_request.as_ref().map(|pending| pending.token)
    }

    fn mint(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken::new(self.next_token)
    }
}

pub fn reduce(core: &mut Core, action: Action) -> Vec<Effect> {
    match action {
        Action::Intent(intent) => reduce_intent(core, intent),
        Action::SearchSettled { token, outcome } => settle_search(core, token, outcome),
        Action::DetailSettled { token, outcome } => settle_detail(core, token, outcome),
        Action::FavoritesPersistFailed { id } => {
            core.state.favorites.toggle(id);
            Vec::new()
        }
    }
}

fn reduce_intent(core: &mut Core, intent: Intent) -> Vec<Effect> {
    match intent {
        Intent::SetSearchQuery(query) => {
            if query.trim().is_empty() {
                core.search_request = None;
                core.state.search = SearchState::reset(query);
                vec![Effect::CancelSearch]
            } else {
                vec![start_search(core, query, 1)]
            }
        }
        Intent::ChangePage(page) => {
            if !core.state.search.has_query() {
                debug!(page = page, "Ignoring page change without a query");
                return Vec::new();
            }
            if page == 0 {
                warn!("Ignoring page change to page 0");
                return Vec::new();
            }
            let query = core.state.search.query.clone();
            vec![start_search(core, query, page), Effect::ScrollToTop]
        }
        Intent::CancelSearch => vec![Effect::CancelSearch],
        Intent::FetchDetail(id) => {
            let token = core.mint();
            core.detail_request = Some(token);
            core.state.detail = DetailState {
                requested_id: Some(id),
                selected: None,
                loading: true,
                error: None,
            };
            vec![Effect::FetchDetail { token, id }]
        }
        Intent::ClearDetail => {
            core.detail_request = None;
            core.state.detail = DetailState::default();
            Vec::new()
        }
        Intent::ToggleFavorite(id) => {
            core.state.favorites.toggle(id);
            vec![Effect::PersistFavorites {
                toggled: id,
                ids: core.state.favorites.ids(),
            }]
        }
    }
}

fn start_search(core: &mut Core, query: String, page: u32) -> Effect {
    let token = core.mint();
    let search = &mut core.state.search;

    // A superseded search never reached the screen, so keep what was there before it
    let (prior_query, prior_error) = match core.search_request.take() {
        Some(pending) => (pending.prior_query, pending.prior_error),
        None => (search.query.clone(), search.error.clone()),
    };
    core.search_request = Some(PendingSearch {
        token,
        prior_query,
        prior_error,
    });

    search.query = query.clone();
    search.loading = true;
    search.error = None;
    Effect::Search { token, query, page }
}

fn settle_search(core: &mut Core, token: RequestToken, outcome: Result<SearchPage, CatalogError>) -> Vec<Effect> {
    let pending = match core.search_request.take() {
        Some(pending) if pending.token == token => pending,
        other => {
            core.search_request = other;
            debug!(token = token.id(), "Discarding stale search outcome");
            return Vec::new();
        }
    };

    let search = &mut core.state.search;
    search.loading = false;
    match outcome {
        Ok(page) => {
            search.results = page.results;
            search.pagination = page.pagination;
            search.total_items = page.total_items;
            search.error = None;
        }
        Err(CatalogError::Cancelled) => {
            // Back to whatever the results on screen belong to
            debug!(token = token.id(), restored = %pending.prior_query, "Search cancelled");
            search.query = pending.prior_query;
            search.error = pending.prior_error;
        }
        Err(e) => {
            search.error = Some(e.to_string());
        }
    }
    Vec::new()
}

fn settle_detail(core: &mut Core, token: RequestToken, outcome: Result<AnimeDetail, CatalogError>) -> Vec<Effect> {
    if core.detail_request != Some(token) {
        debug!(token = token.id(), "Discarding stale detail outcome");
        return Vec::new();
    }
    core.detail_request = None;

    let detail = &mut core.state.detail;
    detail.loading = false;
    match outcome {
        Ok(anime) => {
            detail.selected = Some(anime);
            detail.error = None;
        }
        Err(CatalogError::Cancelled) => {}
        Err(e) => {
            detail.error = Some(e.to_string());
        }
    }
    Vec::new()
}
