//! Scripted in-memory transport for tests.
//!
//! Requests park until the test replies to them, so tests decide the order in
//! which responses arrive.

use crate::api::transport::{HttpTransport, RawResponse};
use crate::error::CatalogError;
use reqwest::Url;
use serde_json::json;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

type Reply = Result<RawResponse, CatalogError>;

/// How many scheduler turns [`ScriptedTransport::wait_for`] grants before giving up
const WAIT_TURNS: usize = 1_000;

struct PendingRequest {
    url: Url,
    reply: oneshot::Sender<Reply>,
}

#[derive(Default)]
struct Script {
    issued: Vec<Url>,
    pending: Vec<PendingRequest>,
}

/// Transport whose responses are supplied by the test
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every URL requested so far, in order
    pub fn issued(&self) -> Vec<Url> {
        self.lock().issued.clone()
    }

    /// Requests still waiting for a reply whose caller is still listening
    pub fn pending(&self) -> Vec<Url> {
        let mut script = self.lock();
        script.pending.retain(|p| !p.reply.is_closed());
        script.pending.iter().map(|p| p.url.clone()).collect()
    }

    /// Complete the oldest live request whose URL contains `needle`.
    ///
    /// Returns false when no such request is waiting.
    pub fn reply(&self, needle: &str, reply: Reply) -> bool {
        let mut script = self.lock();
        script.pending.retain(|p| !p.reply.is_closed());

        let Some(index) = script
            .pending
            .iter()
            .position(|p| p.url.as_str().contains(needle))
        else {
            return false;
        };

        let request = script.pending.remove(index);
        request.reply.send(reply).is_ok()
    }

    pub fn reply_ok(&self, needle: &str, body: impl Into<String>) -> bool {
        self.reply(needle, Ok(RawResponse::new(200, body)))
    }

    pub fn reply_status(&self, needle: &str, status: u16) -> bool {
        self.reply(
            needle,
            Ok(RawResponse::new(status, json!({ "status": status }).to_string())),
        )
    }

    /// Yield to the scheduler until a live request matching `needle` is waiting.
    ///
    /// Panics if none shows up, which means the code under test never issued it.
    pub async fn wait_for(&self, needle: &str) {
        for _ in 0..WAIT_TURNS {
            if self.pending().iter().any(|url| url.as_str().contains(needle)) {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("no request matching '{}' was issued; pending: {:?}", needle, self.pending());
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HttpTransport for ScriptedTransport {
    fn get(&self, url: Url) -> impl Future<Output = Reply> + Send {
        let script = Arc::clone(&self.script);

        async move {
            let (tx, rx) = oneshot::channel();
            {
                let mut script = script.lock().unwrap_or_else(PoisonError::into_inner);
                script.issued.push(url.clone());
                script.pending.push(PendingRequest { url, reply: tx });
            }

            rx.await
                .unwrap_or_else(|_| Err(CatalogError::Network("scripted transport dropped".to_string())))
        }
    }
}

/// Jikan-shaped anime record
pub fn anime_json(id: u32) -> serde_json::Value {
    json!({
        "mal_id": id,
        "url": format!("https://myanimelist.net/anime/{}", id),
        "images": {
            "jpg": {
                "image_url": format!("https://cdn.myanimelist.net/images/anime/{}.jpg", id),
                "small_image_url": null,
                "large_image_url": null
            }
        },
        "title": format!("Anime {}", id),
        "title_english": null,
        "type": "TV",
        "episodes": 12,
        "status": "Finished Airing",
        "aired": { "from": "2020-01-10T00:00:00+00:00", "to": "2020-03-27T00:00:00+00:00" },
        "duration": "24 min per ep",
        "rating": "PG-13 - Teens 13 or older",
        "score": 7.5,
        "synopsis": format!("Synopsis of anime {}.", id),
        "year": 2020,
        "genres": [{ "mal_id": 1, "type": "anime", "name": "Action", "url": "" }],
        "studios": [{ "mal_id": 7, "type": "anime", "name": "Studio Test", "url": "" }]
    })
}

/// Search response body holding `ids` with the given pagination
pub fn search_body(ids: &[u32], current_page: u32, last_visible_page: u32, has_next_page: bool) -> String {
    json!({
        "pagination": {
            "last_visible_page": last_visible_page,
            "has_next_page": has_next_page,
            "current_page": current_page,
            "items": { "count": ids.len(), "total": ids.len(), "per_page": 20 }
        },
        "data": ids.iter().map(|id| anime_json(*id)).collect::<Vec<_>>()
    })
    .to_string()
}

/// Detail response body for `id`
pub fn detail_body(id: u32) -> String {
    json!({ "data": anime_json(id) }).to_string()
}
