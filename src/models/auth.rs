//! Registration, login and token refresh bodies.

use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};

/// Request model for account registration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public projection of a freshly registered account
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct RegisteredUser {
    pub username: String,
    pub email: String,
}

/// Response model for a successful registration
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct RegisterResponse {
    pub user: RegisteredUser,
    pub access: String,
    pub refresh: String,
}

/// Request model for user login
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Access/refresh pair issued at login and registration
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Request model for exchanging a refresh token
#[derive(Debug, Clone, Default, Serialize, Deserialize, Apiv2Schema)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

/// Response model for a successful refresh
#[derive(Debug, Clone, Serialize, Deserialize, Apiv2Schema)]
pub struct AccessTokenResponse {
    pub access: String,
}
