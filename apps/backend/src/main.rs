use actix_web::{web, App, HttpServer};
use books_backend::config::AppConfig;
use books_backend::infra::db::sanitize_dsn;
use books_backend::infra::state::{AppRuntime, StateBuilder};
use books_backend::middleware::{RequestTrace, StructuredLogger};
use books_backend::routes;
use books_backend::telemetry;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    telemetry::init_tracing(config.debug);

    info!(
        host = %config.host,
        db = %sanitize_dsn(&config.db_dsn),
        migrate = ?config.migrate,
        auth_addr = config.auth_addr.as_deref().unwrap_or("none"),
        purge_threshold = config.purge_threshold,
        "starting books backend"
    );
    if config.auth_addr.is_some() {
        warn!("auth_addr is recorded only; tokens are issued and verified locally");
    }

    let cancel = CancellationToken::new();
    let AppRuntime {
        state, batcher, ..
    } = match StateBuilder::from_config(&config)
        .with_cancel(cancel.clone())
        .build()
        .await
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind(config.host.as_str())?
    .run();

    let handle = server.handle();
    let mut batcher_task = tokio::spawn(batcher.join());

    tokio::select! {
        served = server => {
            // Signal or bind loss: stop the batcher too.
            cancel.cancel();
            match batcher_task.await {
                Ok(Ok(())) => info!("delete batcher stopped"),
                Ok(Err(e)) => error!(error = %e, "delete batcher failed during shutdown"),
                Err(e) => error!(error = %e, "delete batcher task lost"),
            }
            served
        }
        joined = &mut batcher_task => {
            // Purge failure is fatal.
            let reason = match joined {
                Ok(Ok(())) => "delete batcher exited".to_string(),
                Ok(Err(e)) => e.to_string(),
                Err(e) => e.to_string(),
            };
            error!(reason = %reason, "delete batcher stopped; shutting down");
            handle.stop(true).await;
            Err(std::io::Error::other(reason))
        }
    }
}
