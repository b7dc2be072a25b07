//! At-most-one-in-flight bookkeeping for search requests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle owned by one outstanding request
#[derive(Debug, Clone)]
pub(crate) struct Flight {
    id: u64,
    token: CancellationToken,
}

impl Flight {
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Tracks the single outstanding search; starting a new one cancels the old.
#[derive(Debug, Default)]
pub(crate) struct SingleFlight {
    next_id: AtomicU64,
    current: Mutex<Option<Flight>>,
}

impl SingleFlight {
    /// Register a new flight, cancelling whichever one was outstanding
    pub(crate) fn begin(&self) -> Flight {
        let flight = Flight {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            token: CancellationToken::new(),
        };

        if let Some(previous) = self.lock().replace(flight.clone()) {
            debug!(superseded = previous.id, by = flight.id, "Cancelling outstanding search");
            previous.token.cancel();
        }

        flight
    }

    /// Forget the flight if it is still the current one
    pub(crate) fn finish(&self, flight: &Flight) {
        let mut current = self.lock();
        if current.as_ref().map(Flight::id) == Some(flight.id) {
            *current = None;
        }
    }

    /// Cancel the outstanding flight, if any. Idempotent.
    pub(crate) fn cancel(&self) {
        if let Some(previous) = self.lock().take() {
            debug!(flight = previous.id, "Cancelling outstanding search");
            previous.token.cancel();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_outstanding(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Flight>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
