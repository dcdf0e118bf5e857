use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the movie catalog CSV
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// TMDB API key; metadata enrichment is disabled when unset
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix prepended to TMDB poster paths
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Titles shown on the featured listing (comma-separated in the environment)
    #[serde(default = "default_featured_titles")]
    pub featured_titles: Vec<String>,

    /// Number of recommendations returned when the caller gives none
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Largest `top_n` a request may ask for; bigger values are clamped
    #[serde(default = "default_max_top_n")]
    pub max_top_n: usize,

    /// Minimum fuzzy title match ratio
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> String {
    "top10K-TMDB-movies.csv".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_featured_titles() -> Vec<String> {
    [
        "The Godfather",
        "The Dark Knight",
        "Inception",
        "Forrest Gump",
        "Fight Club",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_top_n() -> usize {
    10
}

fn default_max_top_n() -> usize {
    crate::services::recommender::MAX_TOP_N
}

fn default_fuzzy_threshold() -> f64 {
    crate::services::recommender::DEFAULT_FUZZY_THRESHOLD
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
