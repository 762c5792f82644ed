//! Per-domain probe pacing
//!
//! Interposes a randomized delay between consecutive probe requests to the
//! same domain so a page full of links to one host does not hammer it. The
//! delay is sampled uniformly from `0..=max` for every request, matching the
//! random-delay rate limit the analyzer advertises.

use rand::Rng;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Tracks last-request times per domain and enforces randomized gaps
pub struct DomainThrottle {
    max_delay: Duration,
    last_request: Mutex<HashMap<String, Instant>>,
}

impl DomainThrottle {
    /// Creates a throttle with the given maximum inter-request delay
    pub fn new(max_delay: Duration) -> Self {
        Self {
            max_delay,
            last_request: Mutex::new(HashMap::new()),
        }
    }

    /// Waits until this probe may contact `domain`, then records the request
    ///
    /// The required gap since the domain's previous request is sampled
    /// uniformly from `0..=max_delay`. First contact with a domain only pays
    /// its own sampled delay's remainder, which is zero.
    pub async fn acquire(&self, domain: &str) {
        let delay = self.sample_delay();

        let wait = {
            let mut last = self.last_request.lock().await;
            let now = Instant::now();
            let wait = match last.get(domain) {
                Some(previous) => (*previous + delay).saturating_duration_since(now),
                None => Duration::ZERO,
            };
            // Reserve the slot before sleeping so concurrent probes to the
            // same domain queue up behind each other.
            last.insert(domain.to_string(), now + wait);
            wait
        };

        if !wait.is_zero() {
            tracing::trace!("Throttling probe to {} for {:?}", domain, wait);
            tokio::time::sleep(wait).await;
        }
    }

    // Sampled outside any await: ThreadRng is not Send.
    fn sample_delay(&self) -> Duration {
        let max_ms = self.max_delay.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_delay_returns_immediately() {
        let throttle = DomainThrottle::new(Duration::ZERO);
        let start = Instant::now();
        throttle.acquire("example.com").await;
        throttle.acquire("example.com").await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_first_contact_is_not_delayed() {
        let throttle = DomainThrottle::new(Duration::from_secs(5));
        let start = Instant::now();
        throttle.acquire("fresh.example").await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_domains_are_independent() {
        let throttle = DomainThrottle::new(Duration::from_secs(5));
        let start = Instant::now();
        throttle.acquire("a.example").await;
        throttle.acquire("b.example").await;
        throttle.acquire("c.example").await;
        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_sample_within_bounds() {
        let throttle = DomainThrottle::new(Duration::from_millis(500));
        for _ in 0..100 {
            assert!(throttle.sample_delay() <= Duration::from_millis(500));
        }
    }
}
