mod common;
mod support;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use backend_test_support::{assert_problem_details, unique_email};
use books_backend::{build_state, MigrateMode};
use serde_json::{json, Value};
use support::{add_book, create_test_app, delete_book, register, test_security};

async fn my_books<S>(app: &S, token: &str) -> (StatusCode, Option<Vec<Value>>)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::get()
        .uri("/books/my-books")
        .insert_header((header::AUTHORIZATION, token))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    if status == StatusCode::OK {
        (status, Some(test::read_body_json(resp).await))
    } else {
        (status, None)
    }
}

async fn run_owner_scenario(migrate_db: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = build_state().with_security(test_security());
    if migrate_db {
        builder = builder.with_db("sqlite::memory:", MigrateMode::Up);
    }
    let runtime = builder.build().await?;
    let app = create_test_app(runtime.state).build().await;

    let alice = register(&app, "Alice", &unique_email("alice")).await;
    let bob = register(&app, "Bob", &unique_email("bob")).await;

    let first = add_book(&app, &alice, "The Dispossessed", "Ursula K. Le Guin").await;
    let second = add_book(&app, &alice, "Solaris", "Stanislaw Lem").await;
    add_book(&app, &bob, "Roadside Picnic", "Strugatsky").await;

    let (status, books) = my_books(&app, &alice).await;
    assert_eq!(status, StatusCode::OK);
    let books = books.unwrap();
    assert_eq!(books.len(), 2);
    assert!(books.iter().all(|b| b["owner_id"] == first["owner_id"]));

    let first_id = first["id"].as_str().unwrap();
    assert_eq!(delete_book(&app, first_id).await, 200);

    let req = test::TestRequest::get()
        .uri(&format!("/books/{first_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(resp).await.is_empty());

    let (_, books) = my_books(&app, &alice).await;
    let books = books.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], second["id"]);

    let req = test::TestRequest::get().uri("/books/all-books").to_request();
    let all: Vec<Value> = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(all.len(), 2);
    Ok(())
}

#[actix_web::test]
async fn owner_scenario_in_memory() -> Result<(), Box<dyn std::error::Error>> {
    run_owner_scenario(false).await
}

#[actix_web::test]
async fn owner_scenario_on_sqlite() -> Result<(), Box<dyn std::error::Error>> {
    run_owner_scenario(true).await
}

#[actix_web::test]
async fn empty_catalog_is_no_content() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = build_state().with_security(test_security()).build().await?;
    let app = create_test_app(runtime.state).build().await;

    let req = test::TestRequest::get().uri("/books/all-books").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/books/no-such-book").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[actix_web::test]
async fn single_book_is_readable_without_token() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = build_state().with_security(test_security()).build().await?;
    let app = create_test_app(runtime.state).build().await;
    let token = register(&app, "Owner", &unique_email("owner")).await;
    let book = add_book(&app, &token, "Kindred", "Octavia E. Butler").await;

    let req = test::TestRequest::get()
        .uri(&format!("/books/{}", book["id"].as_str().unwrap()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched, book);
    assert_eq!(fetched["title"], "Kindred");
    assert!(fetched.get("deleted").is_none());
    Ok(())
}

#[actix_web::test]
async fn add_book_validates_input() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = build_state().with_security(test_security()).build().await?;
    let app = create_test_app(runtime.state).build().await;
    let token = register(&app, "Writer", &unique_email("writer")).await;

    let req = test::TestRequest::post()
        .uri("/books/add-book")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .set_json(json!({ "title": "   ", "author": "Nobody" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, "VALIDATION_ERROR", StatusCode::BAD_REQUEST, None).await;

    let req = test::TestRequest::post()
        .uri("/books/add-book")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"title\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/books/add-book")
        .set_json(json!({ "title": "Anonymous", "author": "Nobody" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
