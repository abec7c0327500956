//! Registration, login and token refresh handlers.

use crate::{
    error::ApiError,
    models::{
        AccessTokenResponse, AuthAuditEvent, AuthEventOutcome, AuthEventType, ErrorDetail,
        LoginRequest, NewUser, RefreshRequest, RegisterRequest, RegisterResponse, RegisteredUser,
        Role, TokenPair, User,
    },
    services::{
        TokenType, UserStore, enforce_rate_limit,
        audit::record_auth_event,
        passwords::{hash_password_blocking, verify_password_blocking},
        validation::{validate_login, validate_refresh, validate_registration},
    },
    state::AppState,
    utils::http::extract_client_ip,
};
use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;

pub const LOGIN_FAILED_DETAIL: &str = "No active account found with the given credentials";
pub const REFRESH_UNKNOWN_USER_DETAIL: &str = "No active account found for the given token.";

/// Account registration endpoint
///
/// Creates a regular account and immediately issues a token pair for it.
#[api_v2_operation(
    summary = "Register",
    description = "Create a user account and return it together with an access/refresh token pair",
    tags("Authentication"),
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Validation failed; body maps field names to messages"),
        (status = 429, description = "Too many requests", body = ErrorDetail)
    )
)]
pub async fn register(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, Error> {
    enforce_rate_limit(&req, &state.rate_limiter)?;

    let registration = validate_registration(&payload, &state.users).inspect_err(|err| {
        record_auth_event(
            &req,
            AuthAuditEvent::from_request(&req, AuthEventType::RegisterFailure, AuthEventOutcome::Failure)
                .with_username(payload.username.clone())
                .with_details(Some(err.to_string())),
        );
    })?;

    let password_hash = hash_password_blocking(registration.password).await?;

    let user = create_account(
        &req,
        &state.users,
        registration.username,
        registration.email,
        password_hash,
    )?;

    let tokens = state.tokens.issue_pair(&user).map_err(ApiError::from)?;

    record_auth_event(
        &req,
        AuthAuditEvent::from_request(&req, AuthEventType::RegisterSuccess, AuthEventOutcome::Success)
            .with_username(Some(user.username.clone())),
    );

    Ok(HttpResponse::Created().json(RegisterResponse {
        user: RegisteredUser {
            username: user.username,
            email: user.email,
        },
        access: tokens.access,
        refresh: tokens.refresh,
    }))
}

/// Insert a regular account, auditing a username lost to a concurrent registration
///
/// Uniqueness is re-checked under the store lock.
fn create_account(
    req: &HttpRequest,
    users: &UserStore,
    username: String,
    email: String,
    password_hash: String,
) -> Result<User, ApiError> {
    users
        .insert(NewUser {
            username: username.clone(),
            email,
            password_hash,
            role: Role::Regular,
        })
        .map_err(|err| {
            record_auth_event(
                req,
                AuthAuditEvent::from_request(req, AuthEventType::RegisterFailure, AuthEventOutcome::Failure)
                    .with_username(Some(username))
                    .with_details(Some(err.to_string())),
            );
            ApiError::from(err)
        })
}

/// User login endpoint
///
/// Unknown usernames and wrong passwords fail identically.
#[api_v2_operation(
    summary = "Login",
    description = "Exchange username and password for an access/refresh token pair",
    tags("Authentication"),
    responses(
        (status = 200, description = "Login successful", body = TokenPair),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid credentials", body = ErrorDetail),
        (status = 429, description = "Too many requests", body = ErrorDetail)
    )
)]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<web::Json<TokenPair>, Error> {
    enforce_rate_limit(&req, &state.rate_limiter)?;

    let credentials = validate_login(&payload)?;
    let ip_address = extract_client_ip(&req);

    let account = state
        .users
        .find_by_username(&credentials.username)
        .map_err(ApiError::from)?;
    let stored_hash = account.as_ref().map(|user| user.password_hash.clone());
    let password_matches = verify_password_blocking(credentials.password, stored_hash).await?;

    let Some(user) = account.filter(|_| password_matches) else {
        record_auth_event(
            &req,
            AuthAuditEvent::from_request(&req, AuthEventType::LoginFailure, AuthEventOutcome::Failure)
                .with_username(Some(credentials.username.clone())),
        );

        if state.activity.record_failure(&ip_address) {
            record_auth_event(
                &req,
                AuthAuditEvent::from_request(&req, AuthEventType::SuspiciousActivity, AuthEventOutcome::Failure)
                    .with_username(Some(credentials.username))
                    .with_details(Some("Repeated login failures from this address".to_string())),
            );
        }

        return Err(ApiError::AuthenticationFailed(LOGIN_FAILED_DETAIL.to_string()).into());
    };

    let tokens = state.tokens.issue_pair(&user).map_err(ApiError::from)?;
    state.activity.clear(&ip_address);

    record_auth_event(
        &req,
        AuthAuditEvent::from_request(&req, AuthEventType::LoginSuccess, AuthEventOutcome::Success)
            .with_username(Some(user.username)),
    );

    Ok(web::Json(tokens))
}

/// Token refresh endpoint
///
/// Issues a new access token; the refresh token itself is not rotated.
#[api_v2_operation(
    summary = "Refresh access token",
    description = "Exchange a valid refresh token for a new access token",
    tags("Authentication"),
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 400, description = "Missing refresh field"),
        (status = 401, description = "Invalid, expired or malformed token", body = ErrorDetail),
        (status = 429, description = "Too many requests", body = ErrorDetail)
    )
)]
pub async fn refresh_token(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Json<RefreshRequest>,
) -> Result<web::Json<AccessTokenResponse>, Error> {
    enforce_rate_limit(&req, &state.rate_limiter)?;

    let refresh = validate_refresh(&payload)?;

    let refresh_failed = |details: String| {
        record_auth_event(
            &req,
            AuthAuditEvent::from_request(&req, AuthEventType::TokenRefreshFailure, AuthEventOutcome::Failure)
                .with_details(Some(details)),
        );
    };

    let claims = state
        .tokens
        .verify(&refresh, TokenType::Refresh)
        .map_err(|err| {
            refresh_failed(err.to_string());
            ApiError::from(err)
        })?;

    let Some(user) = state.users.get(claims.user_id).map_err(ApiError::from)? else {
        refresh_failed(format!("user_id={} no longer exists", claims.user_id));
        return Err(ApiError::AuthenticationFailed(REFRESH_UNKNOWN_USER_DETAIL.to_string()).into());
    };

    let access = state.tokens.issue_access(user.id).map_err(ApiError::from)?;

    record_auth_event(
        &req,
        AuthAuditEvent::from_request(&req, AuthEventType::TokenRefreshSuccess, AuthEventOutcome::Success)
            .with_username(Some(user.username)),
    );

    Ok(web::Json(AccessTokenResponse { access }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::AppMetrics;
    use actix_web::test::TestRequest;

    fn register_once(req: &HttpRequest, users: &UserStore) -> Result<User, ApiError> {
        create_account(
            req,
            users,
            "testuser".to_string(),
            "testuser@example.com".to_string(),
            "hash".to_string(),
        )
    }

    #[test]
    fn test_create_account_audits_lost_username_race() {
        let metrics = AppMetrics::new().unwrap();
        let req = TestRequest::post()
            .uri("/register/")
            .app_data(web::Data::new(metrics.clone()))
            .to_http_request();
        let users = UserStore::new();

        // A concurrent registration claims the name after validation passed
        register_once(&req, &users).unwrap();
        let err = register_once(&req, &users).unwrap_err();

        assert!(matches!(&err, ApiError::Validation(fields) if fields.contains_key("username")));
        assert_eq!(users.count().unwrap(), 1);
        let failures = metrics
            .auth_events_total
            .with_label_values(&["register_failure"])
            .get();
        assert_eq!(failures, 1.0);
    }
}
