use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_match::{
    config::Config,
    routes::{create_router, AppState},
    services::MovieRecommender,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_match=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Index build is CPU-bound; keep it off the async workers
    let catalog_path = config.catalog_path.clone();
    let fuzzy_threshold = config.fuzzy_threshold;
    let recommender = tokio::task::spawn_blocking(move || {
        MovieRecommender::shared(&catalog_path, fuzzy_threshold)
    })
    .await
    .context("Recommender build task failed")?
    .with_context(|| format!("Failed to build recommender from {}", config.catalog_path))?;

    let state = Arc::new(AppState::from_config(recommender, &config));
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
