//! Business logic and service layer modules.
//!
//! Stores, credential handling, request guards, validation, rate limiting
//! and metrics collection.

pub mod audit;
pub mod auth;
pub mod metrics;
pub mod passwords;
pub mod posts;
pub mod rate_limit;
pub mod suspicious_activity;
pub mod tokens;
pub mod users;
pub mod validation;

pub use audit::*;
pub use auth::*;
pub use metrics::*;
pub use posts::*;
pub use rate_limit::*;
pub use suspicious_activity::*;
pub use tokens::*;
pub use users::*;
