#![allow(dead_code)]

pub mod app_builder;

use std::time::Duration;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{test, Error};
use books_backend::services::delete_batcher::BatcherStatus;
use books_backend::SecurityConfig;
use serde_json::{json, Value};
use tokio::sync::watch;

pub use app_builder::create_test_app;

pub const TEST_PASSWORD: &str = "correct horse battery staple";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes())
}

/// Register a user and return the issued token.
pub async fn register<S>(app: &S, name: &str, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/user/register")
        .set_json(json!({ "name": name, "email": email, "password": TEST_PASSWORD }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200, "register should succeed");

    let header_token = resp
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("Authorization header should carry the token");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token"].as_str(), Some(header_token.as_str()));
    header_token
}

/// Add a book as the token's owner and return the created book JSON.
pub async fn add_book<S>(app: &S, token: &str, title: &str, author: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/books/add-book")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(json!({ "title": title, "author": author }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 201, "add-book should succeed");
    test::read_body_json(resp).await
}

pub async fn delete_book<S>(app: &S, id: &str) -> u16
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::delete()
        .uri(&format!("/books/delete/{id}"))
        .to_request();
    test::call_service(app, req).await.status().as_u16()
}

/// Wait until the batcher publishes a status matching `pred`.
pub async fn wait_for_status(
    rx: &mut watch::Receiver<BatcherStatus>,
    pred: impl FnMut(&BatcherStatus) -> bool,
) -> BatcherStatus {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(pred))
        .await
        .expect("batcher status timed out")
        .map(|s| *s)
        .expect("batcher status channel closed")
}
