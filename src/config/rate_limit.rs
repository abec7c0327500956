//! Rate limiting configuration for the credential endpoints.

use super::env_parse;

/// Fixed-window limit applied per client IP
#[derive(Clone)]
pub struct RateLimitConfig {
    pub requests_per_minute: usize,
    pub period_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 100,
            period_seconds: 60,
        }
    }
}

impl RateLimitConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            requests_per_minute: env_parse("RATE_LIMIT_RPM").unwrap_or(defaults.requests_per_minute),
            period_seconds: env_parse("RATE_LIMIT_PERIOD").unwrap_or(defaults.period_seconds),
        }
    }
}

/// Thresholds for flagging repeated login failures from one IP
#[derive(Clone)]
pub struct SuspiciousActivityConfig {
    pub max_failures: usize,
    pub window_seconds: u64,
}

impl Default for SuspiciousActivityConfig {
    fn default() -> Self {
        Self {
            max_failures: 5,
            window_seconds: 300, // 5 minutes
        }
    }
}

impl SuspiciousActivityConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_failures: env_parse("AUTH_MAX_FAILURES").unwrap_or(defaults.max_failures),
            window_seconds: env_parse("AUTH_FAILURE_WINDOW").unwrap_or(defaults.window_seconds),
        }
    }
}
