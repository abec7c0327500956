//! Shared helpers for the integration tests.
#![allow(dead_code)]

use actix_web::{body::MessageBody, dev::ServiceResponse, test};
use quill_api::{AppConfig, AppState, NewUser, Role, User, services::passwords::hash_password};

pub struct TestContext {
    pub config: AppConfig,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(&config).expect("Failed to create app state");
        Self { config, state }
    }

    /// Insert an account directly into the store
    pub fn create_user(&self, username: &str, password: &str, role: Role) -> User {
        self.state
            .users
            .insert(NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: hash_password(password).expect("Failed to hash password"),
                role,
            })
            .expect("Failed to insert user")
    }

    /// `Authorization` header value carrying a fresh access token for `user`
    pub fn bearer(&self, user: &User) -> String {
        let pair = self
            .state
            .tokens
            .issue_pair(user)
            .expect("Failed to issue tokens");
        format!("Bearer {}", pair.access)
    }
}

/// Read a response body as JSON
pub async fn read_json<B: MessageBody>(resp: ServiceResponse<B>) -> serde_json::Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("Response body should be JSON")
}
