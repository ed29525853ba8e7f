use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinefile::{
    api::{create_router, AppState},
    config::Config,
    services::{CatalogClient, TmdbClient},
    store::{create_redis_client, FileStore, ListStore, RedisStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinefile=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog: Arc<dyn CatalogClient> = Arc::new(TmdbClient::new(
        config.tmdb_api_url.clone(),
        config.tmdb_api_token.clone(),
        config.tmdb_language.clone(),
    ));

    let store: Arc<dyn ListStore> = match &config.redis_url {
        Some(url) => {
            let client = create_redis_client(url)?;
            Arc::new(
                RedisStore::new(client)
                    .await
                    .context("Failed to connect to Redis")?,
            )
        }
        None => Arc::new(FileStore::new(config.data_dir.clone())),
    };

    tracing::info!(
        catalog = catalog.name(),
        store = store.name(),
        language = %config.tmdb_language,
        "Services initialized"
    );

    let state = AppState::new(catalog, store, config.search_debounce()).await;
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(address = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
