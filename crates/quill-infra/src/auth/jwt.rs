//! HS256 bearer tokens.
//!
//! Accounts live with an external identity provider. Quill only needs to
//! know which user a request speaks for, so a token carries the user id in
//! `sub`, optional roles and the usual time claims.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::ports::{AuthError, TokenClaims, TokenService};

pub const DEFAULT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Negative values issue already-expired tokens.
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: 24,
            issuer: "quill".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BearerClaims {
    sub: Uuid,
    #[serde(default)]
    roles: Vec<String>,
    exp: i64,
    iat: i64,
    iss: String,
}

impl From<BearerClaims> for TokenClaims {
    fn from(claims: BearerClaims) -> Self {
        Self {
            user_id: claims.sub,
            roles: claims.roles,
            exp: claims.exp,
        }
    }
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    lifetime: TimeDelta,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        if config.secret == DEFAULT_SECRET {
            tracing::warn!("JWT_SECRET not set; bearer tokens use the built-in development secret");
        }

        let mut validation = Validation::default();
        validation.set_issuer(&[&config.issuer]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer,
            lifetime: TimeDelta::hours(config.expiration_hours),
        }
    }
}

fn rejection(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::InvalidToken(err.to_string()),
    }
}

impl TokenService for JwtTokenService {
    fn issue_token(&self, user_id: Uuid, roles: Vec<String>) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = BearerClaims {
            sub: user_id,
            roles,
            exp: (now + self.lifetime).timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<BearerClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.into())
            .map_err(rejection)
    }

    fn expiration_seconds(&self) -> i64 {
        self.lifetime.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(issuer: &str, expiration_hours: i64) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: "quill-test-secret".to_string(),
            expiration_hours,
            issuer: issuer.to_string(),
        })
    }

    #[test]
    fn test_token_names_its_user() {
        let tokens = service("quill", 1);
        let user_id = Uuid::new_v4();

        let token = tokens.issue_token(user_id, vec!["author".to_string()]).unwrap();
        let claims = tokens.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.roles, ["author"]);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = service("quill", 1).validate_token("not.a.jwt").unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_stale_token_is_expired() {
        let tokens = service("quill", -2);
        let token = tokens.issue_token(Uuid::new_v4(), vec![]).unwrap();

        assert!(matches!(
            tokens.validate_token(&token).unwrap_err(),
            AuthError::TokenExpired
        ));
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let token = service("elsewhere", 1)
            .issue_token(Uuid::new_v4(), vec![])
            .unwrap();

        assert!(service("quill", 1).validate_token(&token).is_err());
    }

    #[test]
    fn test_lifetime_in_seconds() {
        assert_eq!(JwtTokenService::new(JwtConfig::default()).expiration_seconds(), 86_400);
    }
}
