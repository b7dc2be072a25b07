//! Debouncing of rapidly changing values.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

/// Forward the latest value from `input` once `delay` passes without a newer one.
///
/// Each new value restarts the timer and drops the value it supersedes. If
/// `input` closes while a value is pending, that value is still delivered at
/// its deadline before the output closes. Must be called within a tokio runtime.
pub fn debounce<T: Send + 'static>(
    mut input: mpsc::UnboundedReceiver<T>,
    delay: Duration,
) -> mpsc::UnboundedReceiver<T> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut pending: Option<(T, Instant)> = None;

        loop {
            match pending.take() {
                None => match input.recv().await {
                    Some(value) => pending = Some((value, Instant::now() + delay)),
                    None => break,
                },
                Some((value, deadline)) => {
                    tokio::select! {
                        next = input.recv() => match next {
                            Some(newer) => {
                                trace!("Debounced value superseded");
                                pending = Some((newer, Instant::now() + delay));
                            }
                            None => {
                                sleep_until(deadline).await;
                                let _ = tx.send(value);
                                break;
                            }
                        },
                        _ = sleep_until(deadline) => {
                            if tx.send(value).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        }
    });

    rx
}
