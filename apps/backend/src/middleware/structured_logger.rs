use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use super::request_trace::TraceId;

/// How a finished request is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    /// Catalog reads that found nothing answer 204.
    NoContent,
    ClientError,
    ServerError,
}

impl Outcome {
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_server_error() {
            Outcome::ServerError
        } else if status.is_client_error() {
            Outcome::ClientError
        } else if status == StatusCode::NO_CONTENT {
            Outcome::NoContent
        } else {
            Outcome::Ok
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::NoContent => "no_content",
            Outcome::ClientError => "client_error",
            Outcome::ServerError => "server_error",
        }
    }
}

/// Emits one `request_completed` event per request.
///
/// Logs the matched route pattern (`/books/{id}`) rather than the raw path so
/// book ids do not fan out into distinct log keys. Must sit inside
/// `RequestTrace` so the trace id is already assigned.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let raw_path = req.path().to_string();
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|t| t.0.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let (status, route) = match &result {
                // Routing has run by now, so the pattern is known.
                Ok(res) => (res.status(), res.request().match_pattern()),
                Err(err) => (err.as_response_error().status_code(), None),
            };
            let route = route.unwrap_or(raw_path);
            let outcome = Outcome::from_status(status);
            let duration_us = start.elapsed().as_micros() as u64;

            macro_rules! completed {
                ($level:ident) => {
                    $level!(
                        http.method = %method,
                        http.route = %route,
                        http.status_code = status.as_u16(),
                        outcome = outcome.as_str(),
                        duration_us,
                        trace_id = %trace_id,
                        "request_completed"
                    )
                };
            }

            match outcome {
                Outcome::ServerError => completed!(error),
                Outcome::ClientError => completed!(warn),
                Outcome::Ok | Outcome::NoContent => completed!(info),
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_by_status() {
        assert_eq!(Outcome::from_status(StatusCode::OK), Outcome::Ok);
        assert_eq!(Outcome::from_status(StatusCode::CREATED), Outcome::Ok);
        assert_eq!(Outcome::from_status(StatusCode::NO_CONTENT), Outcome::NoContent);
        assert_eq!(Outcome::from_status(StatusCode::GONE), Outcome::ClientError);
        assert_eq!(
            Outcome::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            Outcome::ServerError
        );
        assert_eq!(Outcome::NoContent.as_str(), "no_content");
    }
}
