use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Log a security-relevant login failure event.
pub fn login_failed(reason: &str, email: Option<&str>) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %email.map(Redacted).unwrap_or(Redacted("")),
        reason,
        "Authentication failure"
    );
}

/// Log a rejected access token on a protected route.
pub fn token_rejected(reason: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        reason,
        path,
        "Access token rejected"
    );
}
