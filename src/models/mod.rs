//! Data models and schemas for the blog API.
//!
//! Domain rows (users and posts), request/response bodies and the audit
//! event types shared by handlers and services.

pub mod api;
pub mod audit;
pub mod auth;
pub mod post;
pub mod user;

pub use api::*;
pub use audit::*;
pub use auth::*;
pub use post::*;
pub use user::*;
