//! Issuing and verifying session tokens.
//!
//! [`TokenService`] is built once from a [`JwtConfig`] and shared through the
//! application state. It never reads the environment; the secret and the
//! lifetime are fixed for the lifetime of the service.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use coursehub_config::JwtConfig;
use coursehub_core::AppError;

use crate::claims::Claims;

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Bad signature, malformed token, or a subject that is not a user id.
    #[error("Invalid token.")]
    Invalid,
    #[error("Token expired.")]
    Expired,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::unauthorized(err.to_string())
    }
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl_seconds: config.access_token_expiry,
        }
    }

    /// Creates a signed token for `subject`, valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns an internal error if encoding fails.
    pub fn issue(&self, subject: Uuid) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now as usize,
            exp: (now + self.ttl_seconds).max(0) as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
    }

    /// Checks signature and expiry and returns the full claim set.
    ///
    /// No leeway is applied: a token is expired from its `exp` second on.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    /// Checks signature and expiry and returns the subject user id.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let claims = self.decode(token)?;
        Uuid::parse_str(&claims.sub).map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new(get_test_jwt_config());
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).unwrap();
        assert!(!token.is_empty());
        assert_eq!(service.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_expiry_uses_configured_lifetime() {
        let service = TokenService::new(get_test_jwt_config());
        let token = service.issue(Uuid::new_v4()).unwrap();

        let claims = service.decode(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_verify_garbage() {
        let service = TokenService::new(get_test_jwt_config());
        assert_eq!(service.verify("invalid-token"), Err(TokenError::Invalid));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let service = TokenService::new(get_test_jwt_config());
        let token = service.issue(Uuid::new_v4()).unwrap();

        let other = TokenService::new(JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: 3600,
        });
        assert_eq!(other.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_verify_expired() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = sign(&claims, &config.secret);

        let service = TokenService::new(config);
        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_verify_just_expired() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: now - 3600,
            exp: now - 5,
        };
        let token = sign(&claims, &config.secret);

        let service = TokenService::new(config);
        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_verify_non_uuid_subject() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "not-a-user-id".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = sign(&claims, &config.secret);

        let service = TokenService::new(config);
        assert_eq!(service.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_token_error_becomes_unauthorized() {
        let err = AppError::from(TokenError::Expired);
        assert_eq!(err.status.as_u16(), 401);
        assert_eq!(err.error.to_string(), "Token expired.");
    }
}
