//! Redaction of emails and opaque tokens before they reach the logs.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};

#[allow(clippy::unwrap_used)]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]*@[A-Za-z0-9.-]+\.[A-Za-z]+\b").unwrap());

// Base64-ish or hex runs of 16+ characters (JWT segments, hashes).
#[allow(clippy::unwrap_used)]
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9+/]{16,}={0,2}\b").unwrap());

/// Mask emails to `first***@domain` and replace long opaque runs with `[REDACTED_TOKEN]`.
pub fn redact(input: &str) -> String {
    let masked = EMAIL.replace_all(input, |caps: &Captures| {
        let whole = &caps[0];
        match whole.split_once('@') {
            Some((local, domain)) if !local.is_empty() => {
                format!("{}***@{domain}", &local[..1])
            }
            _ => whole.to_string(),
        }
    });
    TOKEN.replace_all(&masked, "[REDACTED_TOKEN]").into_owned()
}

/// Display wrapper that redacts on format.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_redaction() {
        assert_eq!(redact("reader@example.com"), "r***@example.com");
        assert_eq!(redact("a@test.org"), "a***@test.org");
        assert_eq!(
            redact("duplicate registration for reader@example.com"),
            "duplicate registration for r***@example.com"
        );
        assert_eq!(redact("@example.com"), "@example.com");
    }

    #[test]
    fn test_token_redaction() {
        assert_eq!(
            redact("Authorization: eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"),
            "Authorization: [REDACTED_TOKEN]"
        );
        assert_eq!(
            redact("a1b2c3d4e5f678901234567890123456"),
            "[REDACTED_TOKEN]"
        );
        assert_eq!(redact("book 42"), "book 42");
    }

    #[test]
    fn test_redacted_wrapper() {
        let redacted = Redacted("owner@example.com");
        assert_eq!(format!("{redacted}"), "o***@example.com");
        assert_eq!(format!("{redacted:?}"), "o***@example.com");
    }

    #[test]
    fn test_no_sensitive_data() {
        assert_eq!(redact("Dune by Frank Herbert"), "Dune by Frank Herbert");
        assert_eq!(redact(""), "");
    }
}
