//! TMDB (The Movie Database) metadata provider
//!
//! Searches `/search/movie` by title and keeps only the first result.

use crate::{
    error::{AppError, AppResult},
    models::{MovieInfo, TmdbSearchResponse},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String, image_base_url: String) -> Self {
        Self::with_client(HttpClient::new(), api_key, api_url, image_base_url)
    }

    /// Creates a provider around a preconfigured HTTP client
    pub fn with_client(
        http_client: HttpClient,
        api_key: String,
        api_url: String,
        image_base_url: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_base_url,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search/movie", self.api_url)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_movie_info(&self, title: &str) -> AppResult<Option<MovieInfo>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Movie title cannot be empty".to_string(),
            ));
        }

        let response = self
            .http_client
            .get(self.search_url())
            .query(&[("api_key", self.api_key.as_str()), ("query", title)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let search: TmdbSearchResponse = response.json().await?;
        let hit_count = search.results.len();

        let info = search.results.into_iter().next().map(|movie| {
            tracing::debug!(
                query = %title,
                matched = movie.title.as_deref().unwrap_or_default(),
                "TMDB top result"
            );
            movie.into_info(&self.image_base_url)
        });

        tracing::info!(
            query = %title,
            results = hit_count,
            found = info.is_some(),
            provider = "tmdb",
            "Movie metadata lookup completed"
        );

        Ok(info)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
