//! Request inspection helpers shared by handlers, middleware and audit logging.

pub mod http;
pub mod route;

pub use http::*;
pub use route::*;
