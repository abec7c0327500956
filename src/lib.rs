//! Quill API - a minimal blogging backend with token authentication
//!
//! Built with Actix Web and Paperclip:
//! - Account registration, login and token refresh (Argon2 + HS256 JWT)
//! - Admin-only CRUD over blog posts
//! - Structured audit logging of authentication events
//! - Prometheus metrics, request ids and security headers
//! - OpenAPI documentation at `/api/spec/v2`
//!
//! ## Architecture
//!
//! - `models/` - Domain rows and request/response bodies
//! - `handlers/` - HTTP handlers and the app factory
//! - `services/` - Stores, credentials, validation, guards, rate limiting, metrics
//! - `middleware/` - Request id, security headers and metrics middleware
//! - `config/` - Configuration structures and environment loading
//! - `utils/` - Request inspection helpers
//!
//! ## Quick Start
//!
//! ```no_run
//! use quill_api::{AppConfig, AppState, create_app};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = AppConfig::default();
//!     let state = AppState::new(&config).expect("metrics registry");
//!     let _app = create_app(state, &config);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use config::{
    AdminSeedConfig, AppConfig, AuthConfig, MetricsConfig, RateLimitConfig, SecurityHeadersConfig,
    ServerConfig, SuspiciousActivityConfig,
};
pub use error::{ApiError, FieldErrors, StoreError};
pub use handlers::{create_app, create_base_app, create_openapi_spec};
pub use middleware::{MetricsMiddleware, RequestId, RequestIdMiddleware, SecurityHeaders};
pub use models::{
    AccessTokenResponse, AuthAuditEvent, AuthEventOutcome, AuthEventType, HealthResponse,
    LoginRequest, NewUser, Post, PostRequest, RefreshRequest, RegisterRequest, RegisterResponse,
    Role, TokenPair, User, VersionResponse,
};
pub use services::{
    AppMetrics, PostStore, SimpleRateLimiter, SuspiciousActivityTracker, TokenService, TokenType,
    UserStore,
};
pub use state::AppState;
