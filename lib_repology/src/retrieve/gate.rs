//! # Request Gate
//!
//! Repology asks clients to keep to roughly one request per second. The gate
//! enforces a minimum delay between the *starts* of two requests issued
//! through the same client.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Enforces a minimum spacing between request starts.
///
/// The timestamp read, the wait and the timestamp write happen under one
/// async mutex, so callers sharing a gate queue up in arrival order instead of
/// all computing their wait from the same stale timestamp.
#[derive(Debug)]
pub struct RequestGate {
    /// Minimum time between two request starts.
    min_interval: Duration,
    /// Start of the most recent request, `None` before the first one.
    last_start: Mutex<Option<Instant>>,
}

impl RequestGate {
    /// Creates a gate; a zero interval never waits.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: Mutex::new(None),
        }
    }

    /// The configured minimum interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until a request may start, then records the start.
    pub async fn acquire(&self) {
        let mut last_start = self.last_start.lock().await;

        if let Some(previous) = *last_start {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(wait_ms = wait.as_millis() as u64, "rate-limit gate holding request");
                sleep(wait).await;
            }
        }

        *last_start = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn first_acquire_does_not_wait() {
        let gate = RequestGate::new(Duration::from_secs(5));
        let before = Instant::now();
        gate.acquire().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn back_to_back_acquires_are_spaced() {
        let gate = RequestGate::new(Duration::from_millis(1100));

        gate.acquire().await;
        let first = Instant::now();
        gate.acquire().await;
        let second = Instant::now();
        gate.acquire().await;
        let third = Instant::now();

        assert!(second - first >= Duration::from_millis(1100));
        assert!(third - second >= Duration::from_millis(1100));
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_remainder_is_waited() {
        let gate = RequestGate::new(Duration::from_secs(1));
        gate.acquire().await;
        let first = Instant::now();

        tokio::time::sleep(Duration::from_millis(700)).await;
        gate.acquire().await;

        // 700ms of the interval had already passed
        let spacing = first.elapsed();
        assert!(spacing >= Duration::from_secs(1));
        assert!(spacing < Duration::from_millis(1010));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_never_waits() {
        let gate = RequestGate::new(Duration::ZERO);
        let before = Instant::now();
        for _ in 0..5 {
            gate.acquire().await;
        }
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_are_serialized() {
        let gate = Arc::new(RequestGate::new(Duration::from_millis(500)));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gate = Arc::clone(&gate);
                tokio::spawn(async move {
                    gate.acquire().await;
                    Instant::now()
                })
            })
            .collect();

        let mut starts = Vec::new();
        for handle in handles {
            starts.push(handle.await.unwrap());
        }
        starts.sort();

        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(500));
        }
    }
}
