use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{DetailedRecommendationResponse, EnrichedMovie, RecommendationResponse},
    routes::AppState,
    services::enrichment::enrich_titles_with,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    pub top_n: Option<usize>,
}

impl RecommendationQuery {
    fn validated_title(&self) -> AppResult<&str> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }
        Ok(title)
    }

    /// Requested count, falling back to the default and capped at the configured max
    fn top_n(&self, state: &AppState) -> usize {
        self.top_n
            .unwrap_or(state.default_top_n)
            .min(state.max_top_n)
    }
}

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let title = params.validated_title()?;
    let top_n = params.top_n(&state);

    let (resolved_title, recommendations) = match state.recommender.recommend(title, top_n) {
        Some(recs) => (Some(recs.resolved_title), recs.movies),
        None => (None, Vec::new()),
    };

    tracing::info!(
        request_id = %request_id,
        query = %title,
        resolved = resolved_title.is_some(),
        results = recommendations.len(),
        "Recommendations served"
    );

    Ok(Json(RecommendationResponse {
        query: title.to_string(),
        resolved_title,
        recommendations,
    }))
}

/// Handler for recommendations with metadata attached to each title
pub async fn recommend_detailed(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<DetailedRecommendationResponse>> {
    let title = params.validated_title()?;
    let top_n = params.top_n(&state);

    let Some(recs) = state.recommender.recommend(title, top_n) else {
        tracing::info!(request_id = %request_id, query = %title, "No title match");
        return Ok(Json(DetailedRecommendationResponse {
            query: title.to_string(),
            resolved_title: None,
            recommendations: Vec::new(),
        }));
    };

    let titles: Vec<String> = recs.movies.iter().map(|m| m.title.clone()).collect();
    let infos = enrich_titles_with(state.metadata_provider.clone(), &titles).await;

    let recommendations: Vec<EnrichedMovie> = recs
        .movies
        .into_iter()
        .zip(infos)
        .map(|(movie, info)| EnrichedMovie {
            title: movie.title,
            score: Some(movie.score),
            info,
        })
        .collect();

    tracing::info!(
        request_id = %request_id,
        query = %title,
        results = recommendations.len(),
        enriched = recommendations.iter().filter(|m| m.info.is_some()).count(),
        "Detailed recommendations served"
    );

    Ok(Json(DetailedRecommendationResponse {
        query: title.to_string(),
        resolved_title: Some(recs.resolved_title),
        recommendations,
    }))
}
