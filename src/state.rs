//! Shared application state.
//!
//! Everything here is cheap to clone and shares its storage between clones,
//! so one `AppState` can back every worker of the HTTP server.

use crate::{
    config::{AdminSeedConfig, AppConfig},
    error::{ApiError, StoreError},
    models::{NewUser, Role, User},
    services::{
        AppMetrics, PostStore, SimpleRateLimiter, SuspiciousActivityTracker, TokenService,
        UserStore, passwords::hash_password_blocking, validation::normalize_email,
    },
};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub posts: PostStore,
    pub tokens: TokenService,
    pub rate_limiter: SimpleRateLimiter,
    pub activity: SuspiciousActivityTracker,
    pub metrics: AppMetrics,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, prometheus::Error> {
        Ok(Self {
            users: UserStore::new(),
            posts: PostStore::new(),
            tokens: TokenService::new(&config.auth),
            rate_limiter: SimpleRateLimiter::new(config.rate_limit.clone()),
            activity: SuspiciousActivityTracker::new(&config.suspicious_activity),
            metrics: AppMetrics::new()?,
        })
    }

    /// Create the configured administrator account unless the username is taken
    ///
    /// Returns the new account, or `None` when seeding is not configured or
    /// the account already exists. An existing account is left untouched.
    pub async fn seed_admin(&self, seed: &AdminSeedConfig) -> Result<Option<User>, ApiError> {
        let (Some(username), Some(password)) = (&seed.username, &seed.password) else {
            return Ok(None);
        };

        if self.users.username_exists(username)? {
            info!(username = %username, "Administrator account already present, skipping seed");
            return Ok(None);
        }

        let password_hash = hash_password_blocking(password.clone()).await?;
        let inserted = self.users.insert(NewUser {
            username: username.clone(),
            email: seed.email.as_deref().map(normalize_email).unwrap_or_default(),
            password_hash,
            role: Role::Admin,
        });

        match inserted {
            Ok(user) => {
                info!(username = %user.username, user_id = user.id, "Seeded administrator account");
                Ok(Some(user))
            }
            // Lost a race with a registration of the same name
            Err(StoreError::DuplicateUsername) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
