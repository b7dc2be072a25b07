//! Application store: the single owner of browser state.
//!
//! Every change goes through [`reducer::reduce`] under one lock, so
//! transitions never interleave. Effects run while the lock is still held,
//! which keeps the order of catalog calls identical to the order of the
//! intents that caused them. Catalog calls run as tokio tasks and report back
//! through the same path.

pub mod action;
pub mod input;
pub mod reducer;
pub mod state;

pub use action::{Action, Effect, Intent, RequestToken, ViewSignal};
pub use input::QueryInput;
pub use reducer::Core;
pub use state::{AppState, DetailState, SearchPhase, SearchState};

use crate::favorites::FavoritesStore;
use anyhow::Result;
use jikan_client::{HttpTransport, JikanClient, ReqwestTransport};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info};

const SIGNAL_CAPACITY: usize = 16;

struct Shared<T> {
    client: JikanClient<T>,
    favorites: FavoritesStore,
    core: Mutex<Core>,
    snapshot: watch::Sender<AppState>,
    signals: broadcast::Sender<ViewSignal>,
}

/// Handle to the application store. Clones share the same state.
///
/// Intent methods spawn catalog requests and must be called from within a
/// tokio runtime.
pub struct Store<T = ReqwestTransport> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: HttpTransport> Store<T> {
    /// Create the store, loading favorites once from storage
    pub fn new(client: JikanClient<T>, favorites: FavoritesStore) -> Self {
        let core = Core::new(favorites.load());
        let (snapshot, _) = watch::channel(core.state.clone());
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);

        info!(favorites = core.state.favorites.len(), "Store initialized");

        Self {
            shared: Arc::new(Shared {
                client,
                favorites,
                core: Mutex::new(core),
                snapshot,
                signals,
            }),
        }
    }

    /// Current state
    pub fn snapshot(&self) -> AppState {
        self.shared.snapshot.borrow().clone()
    }

    /// Receiver that observes every published state
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.shared.snapshot.subscribe()
    }

    /// Receiver for one-shot view notifications such as scroll-to-top
    pub fn signals(&self) -> broadcast::Receiver<ViewSignal> {
        self.shared.signals.subscribe()
    }

    pub fn set_search_query(&self, text: impl Into<String>) {
        self.dispatch_infallible(Intent::SetSearchQuery(text.into()));
    }

    pub fn change_page(&self, page: u32) {
        self.dispatch_infallible(Intent::ChangePage(page));
    }

    pub fn fetch_detail(&self, id: u32) {
        self.dispatch_infallible(Intent::FetchDetail(id));
    }

    pub fn clear_detail(&self) {
        self.dispatch_infallible(Intent::ClearDetail);
    }

    pub fn cancel_search(&self) {
        self.dispatch_infallible(Intent::CancelSearch);
    }

    /// Toggle a favorite and persist the full set before returning.
    ///
    /// Returns whether `id` is now a favorite. When the write fails the toggle
    /// is undone and the error returned.
    pub fn toggle_favorite(&self, id: u32) -> Result<bool> {
        self.dispatch(Intent::ToggleFavorite(id))?;
        Ok(self.snapshot().favorites.contains(id))
    }

    /// Apply an intent. Only favorites persistence can fail.
    pub fn dispatch(&self, intent: Intent) -> Result<()> {
        debug!(intent = ?intent, "Dispatching intent");
        self.apply(Action::Intent(intent))
    }

    fn dispatch_infallible(&self, intent: Intent) {
        if let Err(e) = self.dispatch(intent) {
            error!(error = %e, "Intent failed");
        }
    }

    fn apply(&self, action: Action) -> Result<()> {
        let mut core = self.lock();
        let effects = reducer::reduce(&mut core, action);

        let mut outcome = Ok(());
        for effect in effects {
            if let Err(e) = self.run_effect(&mut core, effect) {
                outcome = Err(e);
            }
        }

        // Discarded outcomes leave the state alone; don't wake the view for them
        self.shared.snapshot.send_if_modified(|published| {
            if *published == core.state {
                false
            } else {
                *published = core.state.clone();
                true
            }
        });
        outcome
    }

    fn run_effect(&self, core: &mut Core, effect: Effect) -> Result<()> {
        match effect {
            Effect::Search { token, query, page } => {
                // Cancels the previous search right here, in reduction order
                let request = self.shared.client.search_anime(&query, page);
                let store = self.clone();
                tokio::spawn(async move {
                    let outcome = request.await;
                    store.settle(Action::SearchSettled { token, outcome });
                });
            }
            Effect::CancelSearch => {
                self.shared.client.cancel_outstanding();
            }
            Effect::FetchDetail { token, id } => {
                let client = self.shared.client.clone();
                let store = self.clone();
                tokio::spawn(async move {
                    let outcome = client.get_anime_details(id).await;
                    store.settle(Action::DetailSettled { token, outcome });
                });
            }
            Effect::PersistFavorites { toggled, ids } => {
                if let Err(e) = self.shared.favorites.save(&ids) {
                    error!(id = toggled, error = %e, "Failed to persist favorites, reverting");
                    reducer::reduce(core, Action::FavoritesPersistFailed { id: toggled });
                    return Err(e.context(format!("Failed to persist favorite {}", toggled)));
                }
                debug!(id = toggled, count = ids.len(), "Favorites persisted");
            }
            Effect::ScrollToTop => {
                // No receivers just means no view is listening
                let _ = self.shared.signals.send(ViewSignal::ScrollToTop);
            }
        }
        Ok(())
    }

    fn settle(&self, action: Action) {
        if let Err(e) = self.apply(action) {
            error!(error = %e, "Failed to settle request");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Core> {
        self.shared.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
