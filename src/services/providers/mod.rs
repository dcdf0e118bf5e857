//! Movie metadata provider abstraction
//!
//! Metadata (poster, synopsis, rating, release year) comes from an external
//! service keyed by title. Providers sit outside the recommendation core: the
//! recommender only hands them the titles it ranked.

use crate::{error::AppResult, models::MovieInfo};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Look up metadata for a title
    ///
    /// Returns `Ok(None)` when the service has no match. Only the service's top
    /// ranked result is used.
    async fn fetch_movie_info(&self, title: &str) -> AppResult<Option<MovieInfo>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
