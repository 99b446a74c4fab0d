//! # Rate Limiter Module
//!
//! This module provides request-admission control for the advodir service.
//! Every incoming request is gated by client identity before any query work
//! is done, using a sliding-window log of request timestamps per client.
//!
//! ## Features
//!
//! - **Sliding Window Rate Limiting**: Uses actual request timestamps rather than fixed time buckets
//! - **Per-Client Limiting**: Timestamps are tracked per opaque client key (typically an IP address)
//! - **Lazy Pruning**: Stale timestamps are dropped on each check, no background sweep required
//! - **Per-Key Locking**: Client entries live in a `DashMap`, so distinct clients never
//!   serialize against each other and each read-prune-append runs atomically under
//!   that client's shard guard
//! - **Integration Ready**: `check_rate_limit` returns an HTTP 429 response for denied requests
//!
//! ## Rate Limiting Strategy
//!
//! - On each check, timestamps older than the window are pruned from the client's log
//! - If the remaining count has reached the ceiling, the request is denied and
//!   the denied request is NOT recorded
//! - Otherwise the current instant is appended and the request is allowed
//! - An unseen client key behaves as an empty log, so a first request is always allowed
//!
//! Verdicts are fully determined by the sequence of `(client_key, now)` calls;
//! there is no randomness and no hidden global state. Counters reset on process
//! restart, and pruning bounds each client's log at the request ceiling.

use axum::body::Body;
use axum::response::Response;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Admission verdict for a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The request is admitted and its timestamp has been recorded
    Allowed,
    /// The client is over its ceiling for the current window; nothing was recorded
    Denied,
}

/// Sliding-window rate limiter keyed by client identity
///
/// Each instance owns its own per-client state, so limiters can be created
/// per test without cross-test interference.
pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    clients: DashMap<String, Vec<Instant>>, // client key -> timestamps of admitted requests
}

impl RateLimiter {
    /// Create a limiter with an explicit window and per-window request ceiling.
    ///
    /// Zero values are rejected during environment validation before a
    /// limiter is ever constructed on the serving path.
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            window,
            max_requests,
            clients: DashMap::new(),
        }
    }

    /// Create a limiter with the service defaults: 60 requests per 60 seconds
    pub fn with_defaults() -> Self {
        Self::new(Duration::from_secs(60), 60)
    }

    /// Window length in seconds, used for the `Retry-After` response header
    pub fn window_secs(&self) -> u64 {
        self.window.as_secs()
    }

    /// Check whether a request from `client_key` is admitted, using the current time
    pub fn check(&self, client_key: &str) -> Verdict {
        self.check_and_record(client_key, Instant::now())
    }

    /// Check whether a request from `client_key` at `now` is admitted,
    /// recording its timestamp when it is.
    ///
    /// The prune-count-append sequence runs while holding the entry guard,
    /// so concurrent requests from the same client cannot both observe a
    /// stale count.
    pub fn check_and_record(&self, client_key: &str, now: Instant) -> Verdict {
        let mut timestamps = self
            .clients
            .entry(client_key.to_string())
            .or_insert_with(Vec::new);

        // Drop timestamps that have slid out of the window
        timestamps.retain(|&ts| now.duration_since(ts) < self.window);

        if timestamps.len() >= self.max_requests {
            debug!(
                client_key = %client_key,
                max_requests = self.max_requests,
                "Rate limit ceiling reached"
            );
            return Verdict::Denied;
        }

        timestamps.push(now);
        Verdict::Allowed
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Check rate limits for a request
/// Returns Ok(()) if allowed, Err(response) if rate limited
pub fn check_rate_limit(
    client_key: &str,
    request_id: &str,
    rate_limiter: &Arc<RateLimiter>,
) -> Result<(), Response> {
    if rate_limiter.check(client_key) == Verdict::Denied {
        warn!(
            request_id = %request_id,
            client_key = %client_key,
            "Rate limit exceeded"
        );

        return Err(Response::builder()
            .status(429)
            .header("Retry-After", rate_limiter.window_secs().to_string())
            .body(Body::from("Too Many Requests"))
            .unwrap());
    }

    debug!(
        request_id = %request_id,
        client_key = %client_key,
        "Rate limit check passed"
    );

    Ok(())
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn requests_under_ceiling_are_all_allowed() {
        let limiter = RateLimiter::new(secs(60), 5);
        let base = Instant::now();

        for i in 0..4 {
            assert_eq!(
                limiter.check_and_record("1.2.3.4", base + secs(i)),
                Verdict::Allowed,
                "request {} should be allowed under the ceiling",
                i + 1
            );
        }
    }

    #[test]
    fn request_over_ceiling_is_denied() {
        let limiter = RateLimiter::new(secs(60), 3);
        let base = Instant::now();

        assert_eq!(limiter.check_and_record("c", base), Verdict::Allowed);
        assert_eq!(limiter.check_and_record("c", base + secs(1)), Verdict::Allowed);
        assert_eq!(limiter.check_and_record("c", base + secs(2)), Verdict::Allowed);
        assert_eq!(
            limiter.check_and_record("c", base + secs(3)),
            Verdict::Denied,
            "4th request within the window should be denied"
        );
    }

    #[test]
    fn denied_request_is_not_recorded() {
        let limiter = RateLimiter::new(secs(60), 1);
        let base = Instant::now();

        assert_eq!(limiter.check_and_record("c", base), Verdict::Allowed);
        // A burst of denials must not extend the client's log
        for i in 1..10 {
            assert_eq!(limiter.check_and_record("c", base + secs(i)), Verdict::Denied);
        }
        // Once the single recorded timestamp ages out, the client is allowed again
        assert_eq!(
            limiter.check_and_record("c", base + secs(61)),
            Verdict::Allowed
        );
    }

    #[test]
    fn stale_timestamps_are_pruned_and_client_readmitted() {
        let limiter = RateLimiter::new(secs(60), 2);
        let base = Instant::now();

        assert_eq!(limiter.check_and_record("c", base), Verdict::Allowed);
        assert_eq!(limiter.check_and_record("c", base + secs(10)), Verdict::Allowed);
        assert_eq!(limiter.check_and_record("c", base + secs(20)), Verdict::Denied);

        // base has slid out of the window: one slot frees up
        assert_eq!(
            limiter.check_and_record("c", base + secs(61)),
            Verdict::Allowed
        );
        // base + 10s is still inside the window ending at base + 62s
        assert_eq!(
            limiter.check_and_record("c", base + secs(62)),
            Verdict::Denied
        );
    }

    #[test]
    fn distinct_clients_do_not_influence_each_other() {
        let limiter = RateLimiter::new(secs(60), 1);
        let base = Instant::now();

        assert_eq!(limiter.check_and_record("a", base), Verdict::Allowed);
        assert_eq!(limiter.check_and_record("a", base + secs(1)), Verdict::Denied);
        // A different key has its own empty log
        assert_eq!(limiter.check_and_record("b", base + secs(1)), Verdict::Allowed);
        assert_eq!(limiter.check_and_record("b", base + secs(2)), Verdict::Denied);
    }

    #[test]
    fn unseen_client_is_always_allowed_first() {
        let limiter = RateLimiter::with_defaults();
        assert_eq!(limiter.check("fresh-client"), Verdict::Allowed);
    }

    #[test]
    fn verdicts_are_deterministic_for_a_fixed_call_sequence() {
        let base = Instant::now();
        let calls: Vec<(&str, Duration)> = vec![
            ("x", secs(0)),
            ("x", secs(1)),
            ("y", secs(1)),
            ("x", secs(2)),
            ("x", secs(3)),
            ("y", secs(4)),
        ];

        let run = || -> Vec<Verdict> {
            let limiter = RateLimiter::new(secs(60), 2);
            calls
                .iter()
                .map(|(key, offset)| limiter.check_and_record(key, base + *offset))
                .collect()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn denial_maps_to_429_with_retry_after() {
        let limiter = Arc::new(RateLimiter::new(secs(60), 1));

        assert!(check_rate_limit("1.2.3.4", "req-1", &limiter).is_ok());
        let response = check_rate_limit("1.2.3.4", "req-2", &limiter)
            .expect_err("second request should be rate limited");
        assert_eq!(response.status(), 429);
        assert_eq!(
            response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok()),
            Some("60")
        );
    }

    #[tokio::test]
    async fn concurrent_requests_never_overshoot_the_ceiling() {
        let limiter = Arc::new(RateLimiter::new(secs(60), 50));
        let now = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..100 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                limiter.check_and_record("same-client", now)
            }));
        }

        let mut allowed = 0;
        for handle in handles {
            if handle.await.unwrap() == Verdict::Allowed {
                allowed += 1;
            }
        }
        assert_eq!(allowed, 50, "exactly the ceiling should be admitted");
    }
}
