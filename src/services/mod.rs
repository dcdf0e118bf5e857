pub mod catalog;
pub mod enrichment;
pub mod normalizer;
pub mod providers;
pub mod recommender;
pub mod similarity;

pub use catalog::Catalog;
pub use normalizer::TextNormalizer;
pub use recommender::MovieRecommender;
