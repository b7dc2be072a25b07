//! Read-only snapshot of everything the view renders.

use crate::favorites::FavoritesSet;
use shared::{AnimeDetail, AnimeSummary, Pagination};

/// Where the search slice is in its request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Success,
    Failure,
}

/// Search results slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Last debounced query, as typed
    pub query: String,
    pub results: Vec<AnimeSummary>,
    pub pagination: Pagination,
    pub total_items: Option<u32>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SearchState {
    /// Blank state carrying `query`
    pub(crate) fn reset(query: String) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Page a `ChangePage` may target right now, if paging is possible at all.
    ///
    /// Pagination is only meaningful for results on screen, so nothing pages
    /// while a search is loading.
    pub fn page_target(&self, page: u32) -> Option<u32> {
        let in_range = page >= 1 && page <= self.pagination.total_pages.max(1);
        (self.has_query() && !self.loading && in_range).then_some(page)
    }

    pub fn next_page(&self) -> Option<u32> {
        if self.pagination.has_next_page {
            self.page_target(self.pagination.current_page + 1)
        } else {
            None
        }
    }

    pub fn previous_page(&self) -> Option<u32> {
        if self.pagination.has_previous_page() {
            self.page_target(self.pagination.current_page - 1)
        } else {
            None
        }
    }

    pub fn phase(&self) -> SearchPhase {
        if self.loading {
            SearchPhase::Loading
        } else if self.error.is_some() {
            SearchPhase::Failure
        } else if self.has_query() {
            SearchPhase::Success
        } else {
            SearchPhase::Idle
        }
    }
}

/// Detail view slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    /// Id the view asked for; `None` when the detail view is not shown
    pub requested_id: Option<u32>,
    pub selected: Option<AnimeDetail>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DetailState {
    pub fn is_active(&self) -> bool {
        self.requested_id.is_some()
    }
}

/// Complete application state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub search: SearchState,
    pub detail: DetailState,
    pub favorites: FavoritesSet,
}

impl AppState {
    pub fn with_favorites(favorites: FavoritesSet) -> Self {
        Self {
            favorites,
            ..Self::default()
        }
    }

    /// Global busy flag for a progress indicator
    pub fn is_loading(&self) -> bool {
        self.search.loading || self.detail.loading
    }
}
