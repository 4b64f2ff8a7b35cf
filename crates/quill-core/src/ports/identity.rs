//! Identity provider port.
//!
//! Users are authenticated elsewhere; the service only verifies the bearer
//! token it is handed and trusts the user id inside.

use uuid::Uuid;

/// Claims carried by a verified token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub roles: Vec<String>,
    pub exp: i64,
}

/// Token verification (and issuance, for tooling and tests).
pub trait TokenService: Send + Sync {
    /// Issue a token for a user.
    fn issue_token(&self, user_id: Uuid, roles: Vec<String>) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
