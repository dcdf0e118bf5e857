use std::{fs::File, io::Read, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::{CatalogRow, Movie},
};

/// Columns a catalog file must provide
pub const REQUIRED_COLUMNS: [&str; 3] = ["title", "overview", "genre"];

/// The loaded movie table, in file order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    /// Loads a catalog from a CSV file on disk
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            AppError::CatalogLoad(format!("cannot open {}: {}", path.display(), e))
        })?;

        let catalog = Self::from_reader(file)?;

        tracing::info!(
            path = %path.display(),
            movies = catalog.len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Reads a catalog from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();

        if !missing.is_empty() {
            return Err(AppError::CatalogLoad(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        let mut movies = Vec::new();
        for (row_index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            let row = record?;
            movies.push(Movie::new(
                row_index,
                row.title.unwrap_or_default(),
                row.overview.unwrap_or_default(),
                row.genre.unwrap_or_default(),
            ));
        }

        Ok(Self { movies })
    }

    /// Builds a catalog from in-memory records, reassigning row indices to load order
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        let mut catalog = Self { movies };
        catalog.reset_index();
        catalog
    }

    /// Re-establishes contiguous `row_index` values matching current order
    pub fn reset_index(&mut self) {
        for (row_index, movie) in self.movies.iter_mut().enumerate() {
            movie.row_index = row_index;
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn movies_mut(&mut self) -> &mut [Movie] {
        &mut self.movies
    }

    pub fn get(&self, row_index: usize) -> Option<&Movie> {
        self.movies.get(row_index)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
