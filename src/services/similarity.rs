//! TF-IDF vector space and the pairwise cosine similarity matrix built over it.
//!
//! Terms are whitespace-separated tokens of at least two characters plus every
//! adjacent token pair. Weights are raw counts scaled by smoothed IDF
//! `ln((1 + n) / (1 + df)) + 1`, and every document vector is L2-normalized so
//! cosine similarity reduces to a dot product.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Instant;

use crate::{models::Movie, services::normalizer::TextNormalizer};

/// Sparse document vector as `(term index, weight)` pairs sorted by term index
pub type SparseVector = Vec<(usize, f64)>;

/// Fitted vocabulary and IDF weights
#[derive(Debug, Clone, Default)]
pub struct TfIdfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    /// Learns the unigram and bigram vocabulary and its IDF weights from `documents`
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let n_docs = documents.len() as f64;
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();

        for doc in documents {
            let unique: BTreeSet<String> = terms(doc.as_ref()).into_iter().collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (index, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        Self { vocabulary, idf }
    }

    /// Fits on `documents` and returns their vectors alongside the vectorizer
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> (Self, Vec<SparseVector>) {
        let vectorizer = Self::fit(documents);
        let vectors = documents
            .iter()
            .map(|doc| vectorizer.transform(doc.as_ref()))
            .collect();
        (vectorizer, vectors)
    }

    /// Projects a document onto the fitted vocabulary; unknown terms are dropped.
    ///
    /// A document with no known terms maps to the empty (zero) vector.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in terms(document) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();
        vector.sort_unstable_by_key(|(index, _)| *index);

        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Vec::new();
        }
        for (_, weight) in vector.iter_mut() {
            *weight /= norm;
        }
        vector
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    #[cfg(test)]
    fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// IDF weight of `term`, if it is in the vocabulary
    #[cfg(test)]
    fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&index| self.idf[index])
    }
}

/// Unigrams (two characters or longer) followed by adjacent bigrams
fn terms(document: &str) -> Vec<String> {
    let tokens: Vec<&str> = document
        .split_whitespace()
        .filter(|token| token.chars().count() >= 2)
        .collect();

    let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    terms.extend(tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1])));
    terms
}

fn dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}

/// Dense, symmetric N×N matrix of cosine similarities in `[0, 1]` with a unit diagonal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Computes pairwise cosine similarity between L2-normalized vectors
    pub fn from_vectors(vectors: &[SparseVector]) -> Self {
        let size = vectors.len();
        let mut values = vec![0.0; size * size];

        for i in 0..size {
            values[i * size + i] = 1.0;
            for j in (i + 1)..size {
                let score = dot(&vectors[i], &vectors[j]).clamp(0.0, 1.0);
                values[i * size + j] = score;
                values[j * size + i] = score;
            }
        }

        Self { size, values }
    }

    /// Number of rows (and columns)
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.size && col < self.size {
            Some(self.values[row * self.size + col])
        } else {
            None
        }
    }

    /// Similarity scores of `row` against every movie, in catalog order
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.size {
            Some(&self.values[row * self.size..(row + 1) * self.size])
        } else {
            None
        }
    }
}

/// Fitted vector space plus the similarity matrix derived from it
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    pub vectorizer: TfIdfVectorizer,
    pub matrix: SimilarityMatrix,
}

impl SimilarityIndex {
    /// Normalizes every description (storing `description_clean`), fits the
    /// vector space and computes the similarity matrix
    pub fn build(movies: &mut [Movie], normalizer: &TextNormalizer) -> Self {
        let started = Instant::now();

        for movie in movies.iter_mut() {
            movie.description_clean = normalizer.normalize(&movie.description);
        }

        let documents: Vec<&str> = movies.iter().map(|m| m.description_clean.as_str()).collect();
        let (vectorizer, vectors) = TfIdfVectorizer::fit_transform(&documents);
        let matrix = SimilarityMatrix::from_vectors(&vectors);

        tracing::info!(
            movies = movies.len(),
            vocabulary = vectorizer.vocabulary_size(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Similarity index built"
        );

        Self { vectorizer, matrix }
    }
}
