//! Task-local trace id for the request being served.
//!
//! `RequestTrace` opens the scope; `AppError` and the security log helpers
//! read it so every problem response and log line carries the same id.

use std::future::Future;

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

/// The current request's trace id, or "unknown" outside a request scope.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|id| id.clone())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Run `future` with `trace_id` installed as the task-local trace id.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
