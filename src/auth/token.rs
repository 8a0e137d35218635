use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The only token purpose this service recognizes. Tokens issued for any
/// other purpose are rejected by the authentication guard.
pub const AUTH_PURPOSE: &str = "auth";

/// Claims embedded in a signed auth token: the user it identifies, the
/// purpose it was issued for, and its expiry.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The user's unique identifier.
    pub sub: Uuid,
    /// Purpose tag distinguishing the token's intended use.
    pub purpose: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Signs a token binding `user_id` to `purpose` with the given secret.
///
/// The token expires 24 hours after issue. Verification is stateless, so
/// possession of a validly signed token is necessary but not sufficient:
/// the guard additionally requires the token string to be present in the
/// user's stored token list.
pub fn issue_token(secret: &str, user_id: Uuid, purpose: &str) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        purpose: purpose.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Store(format!("Failed to issue token: {}", e)))
}

/// Verifies a token's signature and expiry and returns its claims.
///
/// Tampered, expired or otherwise malformed tokens yield
/// `AppError::Unauthorized`. The caller is responsible for checking the
/// embedded purpose and the stored token list.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}
