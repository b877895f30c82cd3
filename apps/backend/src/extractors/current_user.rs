use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::errors::domain::{AuthErrorKind, DomainError};
use crate::logging::security;
use crate::state::app_state::AppState;

/// Identity recovered from the `Authorization` header.
///
/// The header carries the token exactly as issued; a `Bearer ` prefix is
/// also accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
}

/// Pull the token out of an `Authorization` header value.
pub fn token_from_header(value: &str) -> Option<&str> {
    let value = value.trim();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return None,
        None if value.eq_ignore_ascii_case("bearer") => return None,
        None => value,
    };
    (!token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    let raw = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::unauthorized_missing_token)?
        .to_str()
        .map_err(|_| {
            DomainError::unauthorized(
                AuthErrorKind::InvalidToken,
                "Authorization header is not valid text",
            )
        })?;

    let token = token_from_header(raw).ok_or_else(|| {
        DomainError::unauthorized(AuthErrorKind::InvalidToken, "Malformed Authorization header")
    })?;

    match verify_access_token(token, &state.security) {
        Ok(claims) => Ok(CurrentUser { id: claims.sub }),
        Err(e) => {
            let reason = match &e {
                DomainError::Unauthorized(AuthErrorKind::ExpiredToken, _) => "expired",
                _ => "invalid",
            };
            security::token_rejected(reason, req.path());
            Err(e.into())
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
