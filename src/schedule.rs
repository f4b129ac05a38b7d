//! Bounded-concurrency scheduling with order-stable results.
//!
//! Pages are translated as interleaved I/O-bound futures, never more than
//! `limit` at a time — the ceiling is what protects the remote service's
//! rate limit (together with the retry backoff in [`crate::retry`]). Results
//! are written into index-addressed slots, so output order always matches
//! input order no matter which worker finishes first.
//!
//! Failure model: the first worker failure wins. No new workers are
//! dispatched after it; workers already in flight are left to finish (there
//! is no cancellation token) but their results are discarded.

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;

/// Run `worker` over `items` with at most `limit` futures in flight.
///
/// Returns the results in the same order as `items`, or the first error.
/// `worker` receives each item's original index alongside the item; the
/// index also addresses the result slot.
pub async fn run_bounded<T, R, E, F, Fut>(
    items: Vec<T>,
    limit: usize,
    mut worker: F,
) -> Result<Vec<R>, E>
where
    F: FnMut(usize, T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let total = items.len();
    let limit = limit.max(1);
    let mut slots: Vec<Option<R>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    let mut pending = items.into_iter().enumerate();
    let mut in_flight = FuturesUnordered::new();
    let mut first_error: Option<E> = None;

    // Tag each worker future with its slot index. A single closure keeps the
    // future type identical at both dispatch sites below.
    let tagged = |index: usize, fut: Fut| async move { (index, fut.await) };

    // Fill the initial window.
    for (index, item) in pending.by_ref().take(limit) {
        in_flight.push(tagged(index, worker(index, item)));
    }

    while let Some((index, result)) = in_flight.next().await {
        match result {
            Ok(value) => {
                if first_error.is_none() {
                    slots[index] = Some(value);
                }
                // After a failure, late successes are discarded.
            }
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        // A slot freed: dispatch the next item, unless the run is aborting.
        if first_error.is_none() {
            if let Some((index, item)) = pending.next() {
                in_flight.push(tagged(index, worker(index, item)));
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    debug_assert!(slots.iter().all(Option::is_some));
    Ok(slots.into_iter().flatten().collect())
}
