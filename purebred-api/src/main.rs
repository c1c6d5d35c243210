use std::sync::Arc;

use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use purebred_api::config::AppConfig;
use purebred_api::routes;
use purebred_api::store::{MemoryStore, Store};
use purebred_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    purebred_shared::middleware::init_tracing("purebred-api");

    let config = AppConfig::load()?;
    let port = config.port;

    let store = open_store(&config)?;
    let metrics_handle = purebred_shared::middleware::init_metrics()?;

    let state = Arc::new(AppState::new(store, config).with_metrics(metrics_handle));

    let app = routes::build_router(state)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "purebred-api starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("purebred-api stopped");
    Ok(())
}

#[cfg(feature = "postgres")]
fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let store = purebred_api::store::PgStore::connect(url, config.db_pool_size)?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("no database_url configured, using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(not(feature = "postgres"))]
fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn Store>> {
    if config.database_url.is_some() {
        tracing::warn!("database_url ignored: built without the `postgres` feature");
    }
    Ok(Arc::new(MemoryStore::new()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
