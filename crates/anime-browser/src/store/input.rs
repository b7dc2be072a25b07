//! Search box wiring: raw keystroke text in, debounced queries into the store.

use super::Store;
use crate::debounce::debounce;
use jikan_client::HttpTransport;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Sender side of the search box
#[derive(Debug, Clone)]
pub struct QueryInput {
    tx: mpsc::UnboundedSender<String>,
}

impl QueryInput {
    /// Start forwarding debounced text into `store.set_search_query`.
    ///
    /// The forwarding task ends once every `QueryInput` clone is dropped and
    /// the last pending text has been delivered.
    pub fn attach<T: HttpTransport>(store: Store<T>, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut queries = debounce(rx, delay);

        tokio::spawn(async move {
            while let Some(query) = queries.recv().await {
                debug!(query = %query, "Debounced query");
                store.set_search_query(query);
            }
        });

        Self { tx }
    }

    /// Report the current contents of the search box
    pub fn type_text(&self, text: impl Into<String>) {
        let text = text.into();
        trace!(text = %text, "Search text changed");
        // The receiver only goes away with the runtime
        let _ = self.tx.send(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::FavoritesStore;
    use crate::storage::LocalStorage;
    use jikan_client::testing::{search_body, ScriptedTransport};
    use jikan_client::JikanClient;
    use tempfile::TempDir;

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_issues_one_search() {
        let temp_dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::new();
        let client = JikanClient::with_transport(transport.clone(), "http://catalog.test/v4", 20).unwrap();
        let store = Store::new(client, FavoritesStore::new(LocalStorage::open(temp_dir.path()).unwrap()));

        let input = QueryInput::attach(store.clone(), Duration::from_millis(250));
        for text in ["b", "be", "beb", "bebo", "bebop"] {
            input.type_text(text);
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(transport.issued().is_empty());

        // Last keystroke at 200ms, so the query lands at 450ms
        tokio::time::sleep(Duration::from_millis(300)).await;
        transport.wait_for("q=bebop").await;
        assert_eq!(transport.issued().len(), 1);
        assert_eq!(store.snapshot().search.query, "bebop");

        transport.reply_ok("q=bebop", search_body(&[1], 1, 1, false));
        let mut updates = store.subscribe();
        while updates.borrow_and_update().search.loading {
            updates.changed().await.unwrap();
        }
        assert_eq!(store.snapshot().search.results.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_the_box_resets_results() {
        let temp_dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::new();
        let client = JikanClient::with_transport(transport.clone(), "http://catalog.test/v4", 20).unwrap();
        let store = Store::new(client, FavoritesStore::new(LocalStorage::open(temp_dir.path()).unwrap()));

        let input = QueryInput::attach(store.clone(), Duration::from_millis(250));
        input.type_text("x");
        input.type_text("");
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(transport.issued().is_empty());
        assert!(!store.snapshot().search.has_query());
        assert!(!store.snapshot().search.loading);
    }
}
