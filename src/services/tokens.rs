//! Signed access/refresh token issuance and verification.
//!
//! Tokens are HS256 JWTs. The `token_type` claim keeps access and refresh
//! tokens from being used in each other's place.

use crate::{
    config::AuthConfig,
    error::ApiError,
    models::{TokenPair, User},
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims carried by every token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub token_type: TokenType,
    pub user_id: i64,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token could not be signed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("token is invalid or expired: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("expected a {expected:?} token")]
    WrongType { expected: TokenType },
}

pub const INVALID_TOKEN_DETAIL: &str = "Token is invalid or expired";

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(e) => ApiError::Internal(format!("token signing failed: {e}")),
            TokenError::Invalid(_) | TokenError::WrongType { .. } => {
                ApiError::AuthenticationFailed(INVALID_TOKEN_DETAIL.to_string())
            }
        }
    }
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_lifetime_seconds: i64,
    refresh_lifetime_seconds: i64,
    issuer: String,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            access_lifetime_seconds: config.access_token_lifetime_seconds,
            refresh_lifetime_seconds: config.refresh_token_lifetime_seconds,
            issuer: config.issuer.clone(),
        }
    }

    fn sign(&self, user_id: i64, token_type: TokenType) -> Result<String, TokenError> {
        let lifetime = match token_type {
            TokenType::Access => self.access_lifetime_seconds,
            TokenType::Refresh => self.refresh_lifetime_seconds,
        };
        let issued_at = Utc::now().timestamp();

        let claims = Claims {
            token_type,
            user_id,
            jti: Uuid::new_v4().simple().to_string(),
            iat: issued_at,
            exp: issued_at + lifetime,
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Issue a fresh access/refresh pair for an account
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.sign(user.id, TokenType::Access)?,
            refresh: self.sign(user.id, TokenType::Refresh)?,
        })
    }

    pub fn issue_access(&self, user_id: i64) -> Result<String, TokenError> {
        self.sign(user_id, TokenType::Access)
    }

    /// Check signature, issuer, expiry and token type
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?;

        if data.claims.token_type != expected {
            return Err(TokenError::WrongType { expected });
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn service() -> TokenService {
        TokenService::new(&AuthConfig::default())
    }

    fn user() -> User {
        User {
            id: 7,
            username: "testuser".to_string(),
            email: "testuser@example.com".to_string(),
            password_hash: String::new(),
            role: Role::Regular,
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn test_pair_round_trips_with_correct_types() {
        let tokens = service();
        let pair = tokens.issue_pair(&user()).unwrap();

        let access = tokens.verify(&pair.access, TokenType::Access).unwrap();
        let refresh = tokens.verify(&pair.refresh, TokenType::Refresh).unwrap();
        assert_eq!(access.user_id, 7);
        assert_eq!(refresh.user_id, 7);
        assert_eq!(refresh.exp - refresh.iat, 86400);
        assert_ne!(access.jti, refresh.jti);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let tokens = service();
        let pair = tokens.issue_pair(&user()).unwrap();

        assert!(matches!(
            tokens.verify(&pair.access, TokenType::Refresh),
            Err(TokenError::WrongType { expected: TokenType::Refresh })
        ));
        assert!(matches!(
            tokens.verify(&pair.refresh, TokenType::Access),
            Err(TokenError::WrongType { expected: TokenType::Access })
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            service().verify("invalidtoken123", TokenType::Refresh),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let foreign = TokenService::new(&AuthConfig {
            jwt_secret: "another-secret".to_string(),
            ..AuthConfig::default()
        });
        let pair = foreign.issue_pair(&user()).unwrap();
        assert!(service().verify(&pair.refresh, TokenType::Refresh).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = TokenService::new(&AuthConfig {
            access_token_lifetime_seconds: -10,
            ..AuthConfig::default()
        });
        let access = tokens.issue_access(1).unwrap();
        assert!(matches!(
            tokens.verify(&access, TokenType::Access),
            Err(TokenError::Invalid(_))
        ));
    }
}
