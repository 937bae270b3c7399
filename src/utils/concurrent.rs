//! Bounded concurrent mapping

use std::future::Future;

use futures::stream::{self, StreamExt};

/// Apply `f` to every item with at most `limit` calls in flight,
/// returning results in input order.
///
/// Completion order does not leak into the output: the result of item
/// `i` always lands at index `i`. A `limit` of zero is treated as one,
/// which degrades to strictly sequential processing.
pub async fn map_ordered<I, T, F, Fut, R>(items: I, limit: usize, f: F) -> Vec<R>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items)
        .map(f)
        .buffered(limit.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;

    #[tokio::test]
    async fn test_results_keep_input_order() {
        // Later items finish first; the output must not reorder
        let results = map_ordered(vec![30u64, 20, 10], 3, |delay| async move {
            sleep(Duration::from_millis(delay)).await;
            delay
        })
        .await;

        assert_eq!(results, vec![30, 20, 10]);
    }

    #[tokio::test]
    async fn test_in_flight_work_is_bounded() {
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = map_ordered(0..16usize, 3, |i| {
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            async move {
                let running = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(running, Ordering::SeqCst);
                sleep(Duration::from_millis(10)).await;
                current.fetch_sub(1, Ordering::SeqCst);
                i
            }
        })
        .await;

        assert_eq!(results, (0..16).collect::<Vec<_>>());
        let peak = peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "saw {peak} tasks in flight");
        assert!(peak >= 2, "work never overlapped");
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_output() {
        let results: Vec<u8> = map_ordered(Vec::new(), 4, |x: u8| async move { x }).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_zero_limit_still_makes_progress() {
        let results = map_ordered(vec![1, 2, 3], 0, |x| async move { x * 2 }).await;
        assert_eq!(results, vec![2, 4, 6]);
    }
}
