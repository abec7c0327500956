//! Per-client rate limiting for the credential endpoints.

use crate::{
    config::RateLimitConfig,
    error::ApiError,
    models::{AuthAuditEvent, AuthEventOutcome, AuthEventType},
    services::audit::record_auth_event,
    utils::http::extract_client_ip,
};
use actix_web::HttpRequest;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// Simple in-memory fixed-window rate limiter
///
/// Tracks a request count per key (the client IP) and resets it once the
/// window has elapsed. Clones share the same counters.
#[derive(Clone)]
pub struct SimpleRateLimiter {
    config: RateLimitConfig,
    storage: Arc<Mutex<HashMap<String, (usize, Instant)>>>,
}

impl SimpleRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns `true` if the request should be allowed, `false` if rate limited.
    pub fn check_rate_limit(&self, key: &str) -> bool {
        let window = Duration::from_secs(self.config.period_seconds);
        let now = Instant::now();
        // Counters stay usable even if another thread panicked mid-update
        let mut storage = self.storage.lock().unwrap_or_else(|e| e.into_inner());

        storage.retain(|_, (_, started)| now.duration_since(*started) < window);

        let (count, _) = storage.entry(key.to_string()).or_insert((0, now));
        if *count >= self.config.requests_per_minute {
            return false;
        }
        *count += 1;
        true
    }
}

/// Reject the request with 429 when the client IP is over its limit
pub fn enforce_rate_limit(req: &HttpRequest, limiter: &SimpleRateLimiter) -> Result<(), ApiError> {
    let ip = extract_client_ip(req);
    if limiter.check_rate_limit(&ip) {
        return Ok(());
    }

    record_auth_event(
        req,
        AuthAuditEvent::from_request(req, AuthEventType::RateLimitExceeded, AuthEventOutcome::Failure),
    );
    Err(ApiError::TooManyRequests)
}
