//! API error taxonomy and its HTTP mapping.
//!
//! Handlers return `Result<_, actix_web::Error>` and convert an [`ApiError`]
//! with `?`. Each variant owns its status code and JSON body shape.

use actix_web::{
    HttpMessage, HttpRequest, HttpResponse, ResponseError,
    error::JsonPayloadError,
    http::{StatusCode, header},
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name to the list of messages describing what is wrong with it
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const NOT_AUTHENTICATED_DETAIL: &str = "Authentication credentials were not provided.";
pub const PERMISSION_DENIED_DETAIL: &str = "You do not have permission to perform this action.";
pub const NOT_FOUND_DETAIL: &str = "Not found.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed for fields: {}", field_names(.0))]
    Validation(FieldErrors),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("authentication credentials were not provided")]
    NotAuthenticated,

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("permission denied")]
    PermissionDenied,

    #[error("resource not found")]
    NotFound,

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("too many requests")]
    TooManyRequests,

    #[error("internal error: {0}")]
    Internal(String),
}

fn field_names(errors: &FieldErrors) -> String {
    errors.keys().cloned().collect::<Vec<_>>().join(", ")
}

impl ApiError {
    /// Single-field validation error
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        ApiError::Validation(errors)
    }

    /// 415 naming the content type the request carried
    pub fn unsupported_media_type(req: &HttpRequest) -> Self {
        ApiError::UnsupportedMediaType(req.content_type().to_string())
    }

    fn detail(&self) -> String {
        match self {
            ApiError::BadRequest(detail) | ApiError::AuthenticationFailed(detail) => detail.clone(),
            ApiError::NotAuthenticated => NOT_AUTHENTICATED_DETAIL.to_string(),
            ApiError::PermissionDenied => PERMISSION_DENIED_DETAIL.to_string(),
            ApiError::NotFound => NOT_FOUND_DETAIL.to_string(),
            ApiError::UnsupportedMediaType(content_type) => {
                format!("Unsupported media type \"{content_type}\" in request.")
            }
            ApiError::TooManyRequests => {
                "Rate limit exceeded. Please try again later.".to_string()
            }
            ApiError::Internal(_) => "Internal server error".to_string(),
            ApiError::Validation(_) => "Invalid input.".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotAuthenticated | ApiError::AuthenticationFailed(_) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        match self {
            ApiError::Validation(errors) => return builder.json(errors),
            ApiError::NotAuthenticated | ApiError::AuthenticationFailed(_) => {
                builder.insert_header((header::WWW_AUTHENTICATE, r#"Bearer realm="api""#));
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Request failed with an internal error");
            }
            _ => {}
        }

        builder.json(json!({ "detail": self.detail() }))
    }
}

/// Failures raised by the in-process user and post stores
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("username already taken")]
    DuplicateUsername,

    #[error("store lock poisoned")]
    Poisoned,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => {
                ApiError::field("username", "A user with that username already exists.")
            }
            StoreError::Poisoned => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<argon2::password_hash::Error> for ApiError {
    fn from(err: argon2::password_hash::Error) -> Self {
        ApiError::Internal(format!("password hashing failed: {err}"))
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        ApiError::Internal(format!("blocking task failed: {err}"))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("JSON parse error - {err}"))
    }
}

/// `JsonConfig` error handler so malformed bodies produce the JSON error shape
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::ContentType => ApiError::unsupported_media_type(req),
        JsonPayloadError::Deserialize(e) => ApiError::from(e),
        other => ApiError::BadRequest(other.to_string()),
    }
    .into()
}
