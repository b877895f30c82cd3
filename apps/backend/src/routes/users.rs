use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::services::users::{self, Session};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// The token goes out both in the `Authorization` header and the body.
fn token_response(session: Session) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::AUTHORIZATION, session.token.clone()))
        .json(TokenResponse {
            token: session.token,
        })
}

async fn register(
    body: ValidatedJson<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let RegisterRequest {
        name,
        email,
        password,
    } = body.into_inner();

    let session = users::register(
        app_state.store.as_ref(),
        &app_state.security,
        name,
        email,
        password,
    )
    .await?;
    Ok(token_response(session))
}

async fn authenticate(
    body: ValidatedJson<AuthRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let AuthRequest { email, password } = body.into_inner();

    let session =
        users::authenticate(app_state.store.as_ref(), &app_state.security, email, password)
            .await?;
    Ok(token_response(session))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/auth", web::post().to(authenticate));
}
