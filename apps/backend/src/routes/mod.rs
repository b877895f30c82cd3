use actix_web::web;

pub mod books;
pub mod health;
pub mod users;

/// Register every application route.
///
/// `main.rs` wraps this with the tracing and logging middleware; tests use
/// it directly through the test app builder.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Registration and login: /user/**
    cfg.service(web::scope("/user").configure(users::configure_routes));

    // Catalog: /books/**
    cfg.service(web::scope("/books").configure(books::configure_routes));
}
