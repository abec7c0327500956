//! Blog post rows and the bodies used to create and modify them.

use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// A blog post as stored and as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Apiv2Schema)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_published: bool,
}

/// Body accepted by create (`POST /posts/`) and full update (`PUT /posts/{id}/`)
///
/// Every field is optional at the deserialization layer so that missing
/// fields are reported per field instead of as a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct PostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
}

/// Validated replacement values for a post
#[derive(Debug, Clone, PartialEq)]
pub struct PostFields {
    pub title: String,
    pub content: String,
    pub is_published: bool,
}

/// Validated subset of fields for a partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
}

/// Path parameters of `/posts/{id}/`
#[derive(Debug, Clone, Copy, Deserialize, Apiv2Schema)]
pub struct PostPath {
    pub id: i64,
}
