use std::sync::Arc;

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinereview_api::{
    config::Config,
    db::{create_pool, create_redis_client, run_migrations, Cache, CacheWriterHandle},
    routes::{create_router, AppState},
    services::{CatalogProvider, Storage, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinereview_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let storage = match &config.database_url {
        Some(database_url) => {
            let pool = create_pool(database_url).await?;
            run_migrations(&pool).await?;
            Storage::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, users, reviews and favorites are kept in memory");
            Storage::in_memory()
        }
    };

    let (cache, cache_writer) = match &config.redis_url {
        Some(redis_url) => {
            let (cache, handle) = Cache::new(create_redis_client(redis_url)?).await?;
            tracing::info!("Connected to Redis");
            (Some(cache), Some(handle))
        }
        None => {
            tracing::warn!("REDIS_URL not set, catalog responses are not cached");
            (None, None)
        }
    };

    let catalog: Arc<dyn CatalogProvider> = Arc::new(TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_language.clone(),
        cache,
    ));

    let state = AppState::new(storage, catalog);
    let app = create_router(state).layer(cors_layer(config.cors_origin.as_deref())?);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_cache(cache_writer).await;

    Ok(())
}

fn cors_layer(origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    match origin {
        Some(origin) => Ok(CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any)),
        None => Ok(CorsLayer::permissive()),
    }
}

async fn shutdown_cache(cache_writer: Option<CacheWriterHandle>) {
    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
