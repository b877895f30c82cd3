//! Unique test data, so tests sharing a store never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// assert_ne!(unique_str("book"), unique_str("book"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// `{prefix}-{ulid}@example.test`
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("reader");
/// assert!(email.starts_with("reader-"));
/// assert!(email.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}
