use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use strsim::normalized_levenshtein;

use crate::{
    error::AppResult,
    models::{Movie, RecommendedMovie},
    services::{
        catalog::Catalog,
        normalizer::TextNormalizer,
        similarity::{SimilarityIndex, SimilarityMatrix},
    },
};

/// Minimum normalized Levenshtein ratio for a fuzzy title match
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.6;

/// Number of recommendations returned when the caller does not ask for a count
pub const DEFAULT_TOP_N: usize = 10;

/// Upper bound on recommendations a single request may ask for
pub const MAX_TOP_N: usize = 50;

static SHARED: OnceCell<Arc<MovieRecommender>> = OnceCell::new();

/// Ranked recommendations for a resolved query
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    /// Catalog title the query resolved to
    pub resolved_title: String,
    pub movies: Vec<RecommendedMovie>,
}

/// Content-based recommender over an immutable catalog and similarity matrix
#[derive(Debug)]
pub struct MovieRecommender {
    catalog: Catalog,
    matrix: SimilarityMatrix,
    fuzzy_threshold: f64,
}

impl MovieRecommender {
    /// Loads the catalog at `path` and builds the similarity index
    pub fn from_path(path: impl AsRef<Path>, fuzzy_threshold: f64) -> AppResult<Self> {
        let catalog = Catalog::load(path)?;
        Ok(Self::new(catalog, fuzzy_threshold))
    }

    /// Builds the similarity index over an already loaded catalog
    pub fn new(mut catalog: Catalog, fuzzy_threshold: f64) -> Self {
        catalog.reset_index();
        let normalizer = TextNormalizer::new();
        let index = SimilarityIndex::build(catalog.movies_mut(), &normalizer);

        Self {
            catalog,
            matrix: index.matrix,
            fuzzy_threshold,
        }
    }

    /// Process-wide recommender, built from `path` on first call and reused afterwards.
    ///
    /// Later calls ignore their arguments. A failed build leaves nothing cached, so
    /// the next call retries.
    pub fn shared(path: impl AsRef<Path>, fuzzy_threshold: f64) -> AppResult<Arc<Self>> {
        SHARED
            .get_or_try_init(|| Self::from_path(path, fuzzy_threshold).map(Arc::new))
            .cloned()
    }

    /// Titles of the `top_n` movies most similar to `title`, best first.
    ///
    /// Returns an empty list when `title` matches nothing in the catalog.
    pub fn get_recommendations(&self, title: &str, top_n: usize) -> Vec<String> {
        self.recommend(title, top_n)
            .map(|recs| recs.movies.into_iter().map(|m| m.title).collect())
            .unwrap_or_default()
    }

    /// Resolves `title` and ranks every other movie against it
    pub fn recommend(&self, title: &str, top_n: usize) -> Option<Recommendations> {
        let row = self.resolve_title(title)?;
        let scores = self.matrix.row(row)?;

        let mut ranked: Vec<(usize, f64)> = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|(index, _)| *index != row)
            .collect();
        // Stable sort keeps catalog order among equal scores
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(top_n);

        let movies = ranked
            .into_iter()
            .filter_map(|(index, score)| {
                self.catalog.get(index).map(|movie| RecommendedMovie {
                    title: movie.title.clone(),
                    score,
                })
            })
            .collect();

        Some(Recommendations {
            resolved_title: self.catalog.get(row)?.title.clone(),
            movies,
        })
    }

    /// Maps a free-text title to a catalog row.
    ///
    /// A case-insensitive exact match wins (first in catalog order). Otherwise the
    /// closest title by normalized Levenshtein ratio is taken if it reaches the
    /// fuzzy threshold.
    pub fn resolve_title(&self, title: &str) -> Option<usize> {
        let query = title.to_lowercase();
        let movies = self.catalog.movies();

        if let Some(movie) = movies.iter().find(|m| m.title.to_lowercase() == query) {
            tracing::debug!(query = %title, row = movie.row_index, "Exact title match");
            return Some(movie.row_index);
        }

        let mut best: Option<(usize, f64)> = None;
        for movie in movies {
            let ratio = normalized_levenshtein(&query, &movie.title.to_lowercase());
            if best.map_or(true, |(_, best_ratio)| ratio > best_ratio) {
                best = Some((movie.row_index, ratio));
            }
        }

        match best {
            Some((row, ratio)) if ratio >= self.fuzzy_threshold => {
                tracing::debug!(query = %title, row, ratio, "Fuzzy title match");
                Some(row)
            }
            _ => {
                tracing::debug!(query = %title, "No title match");
                None
            }
        }
    }

    pub fn movie(&self, row_index: usize) -> Option<&Movie> {
        self.catalog.get(row_index)
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    #[cfg(test)]
    fn fuzzy_threshold(&self) -> f64 {
        self.fuzzy_threshold
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }
}
