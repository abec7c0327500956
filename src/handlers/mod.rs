//! HTTP request handlers for API endpoints.
//!
//! Blog endpoints (`auth`, `posts`) plus the operational endpoints and the
//! app factory that wires them together.

pub mod app;
pub mod auth;
pub mod health;
pub mod metrics;
pub mod posts;
pub mod version;

pub use app::*;
pub use auth::*;
pub use health::*;
pub use metrics::*;
pub use posts::*;
pub use version::*;
