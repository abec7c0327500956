//! Configuration structures and loading utilities.
//!
//! Every concern gets its own struct with a `Default` impl and a `from_env()`
//! constructor. Missing or unparsable variables fall back to the defaults.

pub mod auth;
pub mod metrics;
pub mod rate_limit;
pub mod security;
pub mod server;

pub use auth::*;
pub use metrics::*;
pub use rate_limit::*;
pub use security::*;
pub use server::*;

use std::{env, str::FromStr};

/// Every configuration section the application reads at startup
#[derive(Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub admin_seed: AdminSeedConfig,
    pub rate_limit: RateLimitConfig,
    pub suspicious_activity: SuspiciousActivityConfig,
    pub metrics: MetricsConfig,
    pub security: SecurityHeadersConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            auth: AuthConfig::from_env(),
            admin_seed: AdminSeedConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            suspicious_activity: SuspiciousActivityConfig::from_env(),
            metrics: MetricsConfig::from_env(),
            security: SecurityHeadersConfig::from_env(),
        }
    }
}

/// Read and parse an environment variable, returning `None` when it is unset or invalid
pub(crate) fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Read a boolean flag; only a case-insensitive `true` enables it
pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

/// Read a string variable, treating an empty value as unset
pub(crate) fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
