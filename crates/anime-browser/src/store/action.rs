//! Messages into the reducer and the effects it asks the runtime to perform.

use jikan_client::CatalogError;
use shared::{AnimeDetail, SearchPage};

/// Identifies one search or detail request; a fresh token supersedes older ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// What the view can ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Debounced search text; blank text resets the search view
    SetSearchQuery(String),
    ChangePage(u32),
    FetchDetail(u32),
    ClearDetail,
    ToggleFavorite(u32),
    /// The search view is going away; abandon the outstanding search
    CancelSearch,
}

/// Everything the reducer reacts to
#[derive(Debug, Clone)]
pub enum Action {
    Intent(Intent),
    SearchSettled {
        token: RequestToken,
        outcome: Result<SearchPage, CatalogError>,
    },
    DetailSettled {
        token: RequestToken,
        outcome: Result<AnimeDetail, CatalogError>,
    },
    /// Writing favorites failed; undo the toggle of `id`
    FavoritesPersistFailed { id: u32 },
}

impl From<Intent> for Action {
    fn from(intent: Intent) -> Self {
        Action::Intent(intent)
    }
}

/// Side effects requested by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Search {
        token: RequestToken,
        query: String,
        page: u32,
    },
    CancelSearch,
    FetchDetail {
        token: RequestToken,
        id: u32,
    },
    PersistFavorites {
        toggled: u32,
        ids: Vec<u32>,
    },
    ScrollToTop,
}

/// One-shot notifications for the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSignal {
    ScrollToTop,
}
