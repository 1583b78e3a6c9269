use std::sync::Arc;

use movieflixx_api::{
    config::Config,
    db::{create_redis_client, AppwriteStore, Cache, DocumentStore, RedisKeyValueStore},
    routes::{create_router, AppState},
    services::{
        ContentProvider, ContentSearch, LikedRepository, SearchRecorder, TmdbProvider,
        TrendingSampler,
    },
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movieflixx_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::spawn(redis_client.clone());

    let provider: Arc<dyn ContentProvider> = Arc::new(TmdbProvider::from_config(&config, cache));
    let store: Arc<dyn DocumentStore> = Arc::new(AppwriteStore::from_config(&config));
    let recorder = Arc::new(
        SearchRecorder::new(store.clone(), config.tmdb_image_base_url.clone())
            .with_media_type(config.appwrite_media_type_attr),
    );

    let state = AppState {
        content: provider.clone(),
        search: Arc::new(ContentSearch::new(provider, recorder)),
        trending: Arc::new(TrendingSampler::new(
            store,
            config.trending_pool_size,
            config.trending_shelf_size,
        )),
        liked: Arc::new(LikedRepository::new(
            Arc::new(RedisKeyValueStore::new(redis_client)),
            config.liked_storage_key.clone(),
        )),
        placeholder_poster: config.placeholder_poster.clone(),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
