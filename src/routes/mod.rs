use axum::{
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{
        providers::{MetadataProvider, TmdbProvider},
        MovieRecommender,
    },
};

pub mod movies;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub recommender: Arc<MovieRecommender>,
    /// Metadata lookups; `None` disables enrichment
    pub metadata_provider: Option<Arc<dyn MetadataProvider>>,
    pub featured_titles: Vec<String>,
    pub default_top_n: usize,
    /// Requests asking for more recommendations are clamped to this
    pub max_top_n: usize,
}

impl AppState {
    pub fn new(
        recommender: Arc<MovieRecommender>,
        metadata_provider: Option<Arc<dyn MetadataProvider>>,
    ) -> Self {
        Self {
            recommender,
            metadata_provider,
            featured_titles: Vec::new(),
            default_top_n: crate::services::recommender::DEFAULT_TOP_N,
            max_top_n: crate::services::recommender::MAX_TOP_N,
        }
    }

    /// Builds state from configuration, creating the TMDB provider when an API key is set
    pub fn from_config(recommender: Arc<MovieRecommender>, config: &Config) -> Self {
        let metadata_provider = config.tmdb_api_key.as_ref().map(|api_key| {
            Arc::new(TmdbProvider::new(
                api_key.clone(),
                config.tmdb_api_url.clone(),
                config.tmdb_image_base_url.clone(),
            )) as Arc<dyn MetadataProvider>
        });

        if metadata_provider.is_none() {
            tracing::warn!("TMDB_API_KEY not set, metadata enrichment disabled");
        }

        Self {
            recommender,
            metadata_provider,
            featured_titles: config.featured_titles.clone(),
            default_top_n: config.default_top_n,
            max_top_n: config.max_top_n,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommendations", get(recommendations::recommend))
        .route(
            "/recommendations/detailed",
            get(recommendations::recommend_detailed),
        )
        .route("/featured", get(movies::featured))
        .route("/movies/info", get(movies::info))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
