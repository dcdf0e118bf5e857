use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One row of the movie catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Position in load order; indexes into the similarity matrix
    pub row_index: usize,
    pub title: String,
    pub overview: String,
    pub genre: String,
    /// `overview` and `genre` joined by a single space
    pub description: String,
    /// Normalized `description`, filled in when the index is built
    pub description_clean: String,
}

impl Movie {
    /// Creates a movie record, deriving its description from overview and genre
    pub fn new(row_index: usize, title: String, overview: String, genre: String) -> Self {
        let description = format!("{} {}", overview, genre);
        Self {
            row_index,
            title,
            overview,
            genre,
            description,
            description_clean: String::new(),
        }
    }
}

/// Raw catalog row as it appears in the CSV; unknown columns are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRow {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

/// Metadata about a movie fetched from an external service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieInfo {
    pub poster_url: Option<String>,
    pub overview: String,
    /// Average user rating; `None` when the service has no rating
    pub rating: Option<f64>,
    /// Four-digit release year, empty when unknown
    pub year: String,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Response from TMDB `GET /search/movie`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

/// A single TMDB search hit
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl TmdbMovie {
    /// Converts a search hit into `MovieInfo`, resolving the poster against `image_base_url`
    pub fn into_info(self, image_base_url: &str) -> MovieInfo {
        let poster_url = self
            .poster_path
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", image_base_url, path));

        let year = self
            .release_date
            .as_deref()
            .map(release_year)
            .unwrap_or_default();

        MovieInfo {
            poster_url,
            overview: self.overview.unwrap_or_default(),
            rating: self.vote_average,
            year,
        }
    }
}

/// Extracts the year from a `YYYY-MM-DD` date, falling back to the leading four characters
fn release_year(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => format!("{:04}", parsed.year()),
        Err(_) => date.chars().take(4).collect(),
    }
}

// ============================================================================
// API Response Types
// ============================================================================

/// A single ranked recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedMovie {
    pub title: String,
    pub score: f64,
}

/// Result of a recommendation query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub query: String,
    /// Catalog title the query resolved to; `None` when nothing matched
    pub resolved_title: Option<String>,
    pub recommendations: Vec<RecommendedMovie>,
}

/// A recommendation or featured title with optional metadata attached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedMovie {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub info: Option<MovieInfo>,
}

/// Result of a recommendation query with metadata attached
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailedRecommendationResponse {
    pub query: String,
    pub resolved_title: Option<String>,
    pub recommendations: Vec<EnrichedMovie>,
}
