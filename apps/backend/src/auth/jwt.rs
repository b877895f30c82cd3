use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::domain::{AuthErrorKind, DomainError};
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Claims included in our backend-issued access tokens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User id (users.uid)
    pub sub: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

fn unix_seconds(t: SystemTime) -> Option<i64> {
    t.duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs() as i64)
}

/// Mint a HS256 JWT access token valid for `security.token_ttl`.
pub fn mint_access_token(
    sub: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat =
        unix_seconds(now).ok_or_else(|| AppError::internal("Failed to get current time"))?;
    let exp = i64::try_from(security.token_ttl.as_secs())
        .ok()
        .and_then(|ttl| iat.checked_add(ttl))
        .ok_or_else(|| AppError::internal("Token lifetime out of range"))?;

    let claims = Claims {
        sub: sub.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify JWT and return claims.
///
/// A token is accepted only while the current time is strictly before `exp`.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, DomainError> {
    let mut validation = Validation::new(security.algorithm);
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => {
            DomainError::unauthorized(AuthErrorKind::ExpiredToken, "Token expired")
        }
        ErrorKind::InvalidSignature => {
            DomainError::unauthorized(AuthErrorKind::InvalidToken, "Invalid token signature")
        }
        _ => DomainError::unauthorized(AuthErrorKind::InvalidToken, "Invalid token"),
    })?;

    // jsonwebtoken still accepts the exact expiry second.
    match unix_seconds(SystemTime::now()) {
        Some(now) if now < claims.exp => Ok(claims),
        _ => Err(DomainError::unauthorized(
            AuthErrorKind::ExpiredToken,
            "Token expired",
        )),
    }
}
