// Unit tests for error mapping - pure domain logic without HTTP or database dependencies
use crate::errors::domain::{
    AuthErrorKind, ConflictKind, DomainError, InfraErrorKind, NotFoundKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_400() {
    let app: AppError = DomainError::validation("title is required").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn maps_conflicts() {
    let unique = DomainError::conflict(ConflictKind::UniqueEmail, "email exists");
    let app: AppError = unique.into();
    assert_eq!(app.code().as_str(), "UNIQUE_EMAIL");
    assert_eq!(app.status().as_u16(), 409);

    let other = DomainError::conflict(ConflictKind::Other("x".to_string()), "generic");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_absent_family() {
    let app: AppError = DomainError::not_found(NotFoundKind::Book, "book not found").into();
    assert_eq!(app.code(), ErrorCode::BookNotFound);
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError = DomainError::empty("book database is empty").into();
    assert_eq!(app.code(), ErrorCode::CatalogEmpty);
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError = DomainError::deleted("the book has been deleted").into();
    assert_eq!(app.code(), ErrorCode::BookDeleted);
    assert_eq!(app.status().as_u16(), 410);
}

#[test]
fn maps_auth_failures_to_401() {
    for (kind, code) in [
        (AuthErrorKind::InvalidCredentials, ErrorCode::InvalidCredentials),
        (AuthErrorKind::InvalidToken, ErrorCode::UnauthorizedInvalidJwt),
        (AuthErrorKind::ExpiredToken, ErrorCode::UnauthorizedExpiredJwt),
        (AuthErrorKind::MissingToken, ErrorCode::UnauthorizedMissingToken),
    ] {
        let app: AppError = DomainError::unauthorized(kind, "nope").into();
        assert_eq!(app.code(), code);
        assert_eq!(app.status().as_u16(), 401);
    }
}

#[test]
fn maps_infra_to_500() {
    let app: AppError = DomainError::infra(InfraErrorKind::Timeout, "timeout").into();
    assert_eq!(app.code().as_str(), "DB_TIMEOUT");
    assert_eq!(app.status().as_u16(), 500);

    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 500);

    let app: AppError =
        DomainError::infra(InfraErrorKind::Other("boom".into()), "boom").into();
    assert_eq!(app.code().as_str(), "DB_ERROR");
}
