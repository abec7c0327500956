//! Tracking of repeated login failures per client IP.

use crate::config::SuspiciousActivityConfig;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// Counts failed logins per IP inside a sliding window
///
/// Reaching the threshold only flags the IP; callers decide what to do.
#[derive(Clone)]
pub struct SuspiciousActivityTracker {
    failed_attempts: Arc<Mutex<HashMap<String, (usize, Instant)>>>,
    max_failures: usize,
    window: Duration,
}

impl Default for SuspiciousActivityTracker {
    fn default() -> Self {
        Self::new(&SuspiciousActivityConfig::default())
    }
}

impl SuspiciousActivityTracker {
    pub fn new(config: &SuspiciousActivityConfig) -> Self {
        Self {
            failed_attempts: Arc::new(Mutex::new(HashMap::new())),
            max_failures: config.max_failures,
            window: Duration::from_secs(config.window_seconds),
        }
    }

    /// Record a failed attempt; returns `true` once the IP reaches the threshold
    pub fn record_failure(&self, ip: &str) -> bool {
        let now = Instant::now();
        let mut attempts = self.failed_attempts.lock().unwrap_or_else(|e| e.into_inner());

        attempts.retain(|_, (_, first_seen)| now.duration_since(*first_seen) < self.window);

        let (count, _) = attempts.entry(ip.to_string()).or_insert((0, now));
        *count += 1;
        *count >= self.max_failures
    }

    #[cfg(test)]
    fn is_suspicious(&self, ip: &str) -> bool {
        let attempts = self.failed_attempts.lock().unwrap_or_else(|e| e.into_inner());
        attempts.get(ip).is_some_and(|(count, first_seen)| {
            first_seen.elapsed() < self.window && *count >= self.max_failures
        })
    }

    /// Forget the failures of an IP after it logs in successfully
    pub fn clear(&self, ip: &str) {
        self.failed_attempts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(ip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_reached_on_fifth_failure() {
        let tracker = SuspiciousActivityTracker::default();
        let ip = "192.168.1.100";

        assert!(!tracker.is_suspicious(ip));
        for attempt in 1..5 {
            assert!(!tracker.record_failure(ip), "Not suspicious after {attempt} failures");
        }
        assert!(tracker.record_failure(ip), "Suspicious after 5 failures");
        assert!(tracker.is_suspicious(ip));
        assert!(!tracker.is_suspicious("192.168.1.101"));
    }

    #[test]
    fn test_clear_resets_ip() {
        let tracker = SuspiciousActivityTracker::new(&SuspiciousActivityConfig {
            max_failures: 1,
            window_seconds: 300,
        });
        assert!(tracker.record_failure("10.0.0.1"));
        tracker.clear("10.0.0.1");
        assert!(!tracker.is_suspicious("10.0.0.1"));
    }
}
