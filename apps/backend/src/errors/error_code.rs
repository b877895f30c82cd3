//! Error codes for the catalog API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the catalog API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Unknown email or wrong password
    InvalidCredentials,
    /// Missing Authorization header
    UnauthorizedMissingToken,
    /// Token signature or shape rejected
    UnauthorizedInvalidJwt,
    /// Token has expired
    UnauthorizedExpiredJwt,

    // Request Validation
    ValidationError,
    BadRequest,
    InvalidHeader,

    // Resource Not Found
    UserNotFound,
    BookNotFound,
    CatalogEmpty,
    NotFound,

    // Gone
    BookDeleted,

    // Conflicts
    UniqueEmail,
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    DbTimeout,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    ///
    /// This is the exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UnauthorizedMissingToken => "UNAUTHORIZED_MISSING_TOKEN",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidHeader => "INVALID_HEADER",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::BookNotFound => "BOOK_NOT_FOUND",
            Self::CatalogEmpty => "CATALOG_EMPTY",
            Self::NotFound => "NOT_FOUND",

            Self::BookDeleted => "BOOK_DELETED",

            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::InvalidCredentials.as_str(), "INVALID_CREDENTIALS");
        assert_eq!(
            ErrorCode::UnauthorizedMissingToken.as_str(),
            "UNAUTHORIZED_MISSING_TOKEN"
        );
        assert_eq!(
            ErrorCode::UnauthorizedExpiredJwt.as_str(),
            "UNAUTHORIZED_EXPIRED_JWT"
        );
        assert_eq!(ErrorCode::BookDeleted.as_str(), "BOOK_DELETED");
        assert_eq!(ErrorCode::CatalogEmpty.as_str(), "CATALOG_EMPTY");
        assert_eq!(ErrorCode::DbTimeout.as_str(), "DB_TIMEOUT");
    }

    #[test]
    fn test_display_trait() {
        assert_eq!(format!("{}", ErrorCode::UniqueEmail), "UNIQUE_EMAIL");
        assert_eq!(format!("{}", ErrorCode::BookNotFound), "BOOK_NOT_FOUND");
    }
}
