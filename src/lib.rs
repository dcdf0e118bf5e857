//! Content-based movie recommendations.
//!
//! A catalog of movies is loaded once, every synopsis and genre is normalized
//! and vectorized with TF-IDF, and queries rank the rest of the catalog by
//! cosine similarity to a fuzzily matched title.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
