use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{EnrichedMovie, MovieInfo},
    routes::AppState,
    services::enrichment::enrich_titles_with,
};

#[derive(Debug, Deserialize)]
pub struct InfoQuery {
    title: String,
}

/// Handler for the featured movies listing
pub async fn featured(State(state): State<Arc<AppState>>) -> Json<Vec<EnrichedMovie>> {
    let infos = enrich_titles_with(state.metadata_provider.clone(), &state.featured_titles).await;

    let movies = state
        .featured_titles
        .iter()
        .cloned()
        .zip(infos)
        .map(|(title, info)| EnrichedMovie {
            title,
            score: None,
            info,
        })
        .collect();

    Json(movies)
}

/// Handler for a single metadata lookup
pub async fn info(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InfoQuery>,
) -> AppResult<Json<MovieInfo>> {
    let provider = state.metadata_provider.as_ref().ok_or_else(|| {
        AppError::NotFound("Movie metadata lookups are not configured".to_string())
    })?;

    provider
        .fetch_movie_info(&params.title)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No metadata found for '{}'", params.title)))
}
