//! Bearer authentication and the admin capability guard.

use crate::{
    error::ApiError,
    models::{AuthAuditEvent, AuthEventOutcome, AuthEventType, User},
    services::{TokenService, UserStore, audit::record_auth_event, tokens::TokenType},
    utils::http::{BearerCredentials, extract_bearer_token},
};
use actix_web::HttpRequest;

const BEARER_INVALID_DETAIL: &str = "Given token not valid for any token type";
const UNKNOWN_USER_DETAIL: &str = "User not found";
const MALFORMED_HEADER_DETAIL: &str = "Authorization header must contain two space-delimited values";

/// Resolve the caller from an access token in the `Authorization` header
///
/// The role is read from the stored account, not from the token.
pub fn authenticate(
    req: &HttpRequest,
    tokens: &TokenService,
    users: &UserStore,
) -> Result<User, ApiError> {
    let token = match extract_bearer_token(req) {
        BearerCredentials::Token(token) => token,
        BearerCredentials::Missing => return Err(ApiError::NotAuthenticated),
        BearerCredentials::Malformed => {
            return Err(reject(req, MALFORMED_HEADER_DETAIL, None));
        }
    };

    let claims = tokens.verify(token, TokenType::Access).map_err(|err| {
        tracing::debug!(error = %err, "Rejected bearer token");
        reject(req, BEARER_INVALID_DETAIL, None)
    })?;

    users
        .get(claims.user_id)?
        .ok_or_else(|| reject(req, UNKNOWN_USER_DETAIL, Some(format!("user_id={}", claims.user_id))))
}

fn reject(req: &HttpRequest, detail: &str, context: Option<String>) -> ApiError {
    record_auth_event(
        req,
        AuthAuditEvent::from_request(req, AuthEventType::AuthenticationFailure, AuthEventOutcome::Failure)
            .with_details(context.or_else(|| Some(detail.to_string()))),
    );
    ApiError::AuthenticationFailed(detail.to_string())
}

/// Capability guard for admin-only endpoints
///
/// Unauthenticated callers get 401; authenticated non-admins get 403.
pub fn require_admin(
    req: &HttpRequest,
    tokens: &TokenService,
    users: &UserStore,
) -> Result<User, ApiError> {
    let user = authenticate(req, tokens, users)?;
    if user.is_admin() {
        return Ok(user);
    }

    record_auth_event(
        req,
        AuthAuditEvent::from_request(req, AuthEventType::PermissionDenied, AuthEventOutcome::Failure)
            .with_username(Some(user.username.clone())),
    );
    Err(ApiError::PermissionDenied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AuthConfig,
        models::{NewUser, Role},
    };
    use actix_web::test::TestRequest;

    fn setup() -> (TokenService, UserStore, User, User) {
        let tokens = TokenService::new(&AuthConfig::default());
        let users = UserStore::new();
        let admin = users
            .insert(NewUser {
                username: "adminuser".to_string(),
                email: "admin@example.com".to_string(),
                password_hash: String::new(),
                role: Role::Admin,
            })
            .unwrap();
        let regular = users
            .insert(NewUser {
                username: "regularuser".to_string(),
                email: "user@example.com".to_string(),
                password_hash: String::new(),
                role: Role::Regular,
            })
            .unwrap();
        (tokens, users, admin, regular)
    }

    fn bearer(token: &str) -> HttpRequest {
        TestRequest::default()
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request()
    }

    #[test]
    fn test_admin_passes_guard() {
        let (tokens, users, admin, _) = setup();
        let pair = tokens.issue_pair(&admin).unwrap();

        let user = require_admin(&bearer(&pair.access), &tokens, &users).unwrap();
        assert_eq!(user.id, admin.id);
    }

    #[test]
    fn test_regular_user_is_forbidden() {
        let (tokens, users, _, regular) = setup();
        let pair = tokens.issue_pair(&regular).unwrap();

        let err = require_admin(&bearer(&pair.access), &tokens, &users).unwrap_err();
        assert!(matches!(err, ApiError::PermissionDenied));
    }

    #[test]
    fn test_missing_header_is_unauthenticated() {
        let (tokens, users, _, _) = setup();
        let req = TestRequest::default().to_http_request();

        let err = require_admin(&req, &tokens, &users).unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated));
    }

    #[test]
    fn test_refresh_token_is_not_a_bearer_credential() {
        let (tokens, users, admin, _) = setup();
        let pair = tokens.issue_pair(&admin).unwrap();

        let err = authenticate(&bearer(&pair.refresh), &tokens, &users).unwrap_err();
        assert!(matches!(err, ApiError::AuthenticationFailed(_)));
    }

    #[test]
    fn test_token_for_unknown_account_is_rejected() {
        let (tokens, users, _, _) = setup();
        let access = tokens.issue_access(999).unwrap();

        let err = authenticate(&bearer(&access), &tokens, &users).unwrap_err();
        assert!(matches!(err, ApiError::AuthenticationFailed(detail) if detail == UNKNOWN_USER_DETAIL));
    }
}
