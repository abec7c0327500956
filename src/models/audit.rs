//! Audit logging data structures and types.

use crate::{
    middleware::RequestId,
    utils::http::{extract_client_ip, extract_user_agent},
};
use actix_web::{HttpMessage, HttpRequest};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Types of authentication and authorization events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventType {
    RegisterSuccess,
    RegisterFailure,
    LoginSuccess,
    LoginFailure,
    TokenRefreshSuccess,
    TokenRefreshFailure,
    AuthenticationFailure,
    PermissionDenied,
    SuspiciousActivity,
    RateLimitExceeded,
}

impl AuthEventType {
    /// Label used for the `auth_events_total` metric
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEventType::RegisterSuccess => "register_success",
            AuthEventType::RegisterFailure => "register_failure",
            AuthEventType::LoginSuccess => "login_success",
            AuthEventType::LoginFailure => "login_failure",
            AuthEventType::TokenRefreshSuccess => "token_refresh_success",
            AuthEventType::TokenRefreshFailure => "token_refresh_failure",
            AuthEventType::AuthenticationFailure => "authentication_failure",
            AuthEventType::PermissionDenied => "permission_denied",
            AuthEventType::SuspiciousActivity => "suspicious_activity",
            AuthEventType::RateLimitExceeded => "rate_limit_exceeded",
        }
    }
}

/// Outcomes of authentication events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventOutcome {
    Success,
    Failure,
}

/// Structured audit log entry. Never carries passwords or tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAuditEvent {
    pub event_type: AuthEventType,
    pub outcome: AuthEventOutcome,
    pub timestamp: DateTime<Utc>,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub username: Option<String>,
    pub method: String,
    pub endpoint: String,
    pub request_id: Option<String>,
    pub details: Option<String>,
}

impl AuthAuditEvent {
    /// Create a new audit event with basic information
    pub fn new(
        event_type: AuthEventType,
        outcome: AuthEventOutcome,
        ip_address: String,
        method: String,
        endpoint: String,
    ) -> Self {
        Self {
            event_type,
            outcome,
            timestamp: Utc::now(),
            ip_address,
            user_agent: None,
            username: None,
            method,
            endpoint,
            request_id: None,
            details: None,
        }
    }

    /// Create an event populated from the request's connection and headers
    pub fn from_request(req: &HttpRequest, event_type: AuthEventType, outcome: AuthEventOutcome) -> Self {
        let request_id = req.extensions().get::<RequestId>().map(|id| id.0.clone());

        Self::new(
            event_type,
            outcome,
            extract_client_ip(req),
            req.method().to_string(),
            req.path().to_string(),
        )
        .with_user_agent(extract_user_agent(req))
        .with_request_id(request_id)
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    /// Log the audit event using structured logging
    pub fn log(&self) {
        info!(
            target: "auth_audit",
            event_type = self.event_type.as_str(),
            outcome = ?self.outcome,
            timestamp = %self.timestamp,
            ip_address = %self.ip_address,
            user_agent = ?self.user_agent,
            username = ?self.username,
            method = %self.method,
            endpoint = %self.endpoint,
            request_id = ?self.request_id,
            details = ?self.details,
            "Authentication audit event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_from_request_carries_request_context() {
        let req = TestRequest::post()
            .uri("/login/")
            .insert_header(("User-Agent", "test-agent/1.0"))
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .to_http_request();
        req.extensions_mut().insert(RequestId("req-123".to_string()));

        let event = AuthAuditEvent::from_request(&req, AuthEventType::LoginFailure, AuthEventOutcome::Failure)
            .with_username(Some("testuser".to_string()));

        assert_eq!(event.request_id.as_deref(), Some("req-123"));
        assert_eq!(event.ip_address, "203.0.113.7");
        assert_eq!(event.user_agent.as_deref(), Some("test-agent/1.0"));
        assert_eq!(event.method, "POST");
        assert_eq!(event.endpoint, "/login/");
        assert_eq!(event.event_type.as_str(), "login_failure");
    }
}
