//! Token signing and administrator bootstrap configuration.

use super::{env_parse, env_string};

const DEV_JWT_SECRET: &str = "insecure-development-secret-change-me";

/// Configuration for signed access/refresh tokens
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_lifetime_seconds: i64,
    pub refresh_token_lifetime_seconds: i64,
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            access_token_lifetime_seconds: 300,    // 5 minutes
            refresh_token_lifetime_seconds: 86400, // 1 day
            issuer: "quill-api".to_string(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt_secret = env_string("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using the development signing secret");
            defaults.jwt_secret
        });

        Self {
            jwt_secret,
            access_token_lifetime_seconds: env_parse("ACCESS_TOKEN_LIFETIME_SECONDS")
                .filter(|v: &i64| *v > 0)
                .unwrap_or(defaults.access_token_lifetime_seconds),
            refresh_token_lifetime_seconds: env_parse("REFRESH_TOKEN_LIFETIME_SECONDS")
                .filter(|v: &i64| *v > 0)
                .unwrap_or(defaults.refresh_token_lifetime_seconds),
            issuer: env_string("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }
}

/// Credentials for the administrator account created at startup
#[derive(Clone, Default)]
pub struct AdminSeedConfig {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl AdminSeedConfig {
    pub fn from_env() -> Self {
        Self {
            username: env_string("ADMIN_USERNAME"),
            email: env_string("ADMIN_EMAIL"),
            password: env_string("ADMIN_PASSWORD"),
        }
    }
}
