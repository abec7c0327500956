//! HTTP utility functions for extracting request information.

use crate::error::ApiError;
use actix_web::{HttpMessage, HttpRequest, http::header};
use serde::de::DeserializeOwned;

/// Outcome of reading the `Authorization` header
#[derive(Debug, PartialEq, Eq)]
pub enum BearerCredentials<'a> {
    /// No `Authorization` header, or one using a different scheme
    Missing,
    /// `Bearer` scheme present but the header is unreadable or has no token
    Malformed,
    Token(&'a str),
}

/// Extract client IP address, honouring `Forwarded`/`X-Forwarded-For` before the peer address
pub fn extract_client_ip(req: &HttpRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|addr| addr.split(',').next().unwrap_or(addr).trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Extract user agent from request headers
pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// Read a `Bearer` token from the `Authorization` header
pub fn extract_bearer_token(req: &HttpRequest) -> BearerCredentials<'_> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return BearerCredentials::Missing;
    };
    let Ok(value) = value.to_str() else {
        return BearerCredentials::Malformed;
    };

    let mut parts = value.split_whitespace();
    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {}
        _ => return BearerCredentials::Missing,
    }

    match (parts.next(), parts.next()) {
        (Some(token), None) => BearerCredentials::Token(token),
        _ => BearerCredentials::Malformed,
    }
}

/// Deserialize a JSON request body read as raw bytes
///
/// Handlers that must authorize the caller before looking at the body take
/// `web::Bytes` and call this afterwards. An empty body reads as `T::default()`.
pub fn parse_json_body<T: DeserializeOwned + Default>(
    req: &HttpRequest,
    body: &[u8],
) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let content_type = req.content_type();
    if content_type != "application/json" && !content_type.ends_with("+json") {
        return Err(ApiError::unsupported_media_type(req));
    }

    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_bearer_token(&req), BearerCredentials::Missing);

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), BearerCredentials::Missing);

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer"))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), BearerCredentials::Malformed);

        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc def"))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), BearerCredentials::Malformed);

        let req = TestRequest::default()
            .insert_header(("Authorization", "bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(extract_bearer_token(&req), BearerCredentials::Token("abc.def.ghi"));
    }

    #[test]
    fn test_client_ip_prefers_forwarded_header() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "203.0.113.7");
    }

    #[derive(Debug, Default, serde::Deserialize)]
    struct Body {
        title: Option<String>,
    }

    #[test]
    fn test_json_body_parsing() {
        let json = TestRequest::default()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .to_http_request();
        let parsed: Body = parse_json_body(&json, br#"{"title":"Hello"}"#).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Hello"));

        let empty: Body = parse_json_body(&json, b"").unwrap();
        assert!(empty.title.is_none());

        let err = parse_json_body::<Body>(&json, b"{not json").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(detail) if detail.starts_with("JSON parse error")));

        let form = TestRequest::default()
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .to_http_request();
        let err = parse_json_body::<Body>(&form, b"title=Hello").unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedMediaType(ct) if ct == "application/x-www-form-urlencoded"));
    }
}
