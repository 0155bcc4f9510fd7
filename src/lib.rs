//! # Vitrine
//!
//! A content-based product recommendation engine.
//!
//! Vitrine loads a tabular product catalog, normalizes it, builds TF-IDF term
//! vectors over each product's text, and recommends the products most similar
//! to a given one by cosine similarity.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cargo install vitrine
//! vitrine --catalog data/catalog.csv recommend 12 -n 6
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use vitrine::prelude::*;
//!
//! let config = CatalogConfig::new("data/catalog.csv")
//!     .with_stopwords(StopwordConfig::Builtin(Language::Portuguese));
//! let catalog = CatalogManager::open_or_empty(&config);
//!
//! for product in catalog.recommend(12, DEFAULT_RECOMMENDATIONS) {
//!     println!("{} {}", product.id, product.name);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - [`vitrine-core`](https://docs.rs/vitrine-core) - Products, normalizer, vectorizer, snapshot
//! - [`vitrine-similarity`](https://docs.rs/vitrine-similarity) - Cosine ranking and explanations
//! - [`vitrine-catalog`](https://docs.rs/vitrine-catalog) - Catalog sources, configuration, reloads
//!
//! ## Features
//!
//! - **Tolerant ingestion**: missing columns default, bad rows are dropped and reported
//! - **TF-IDF vectors**: stopword-filtered, with a raw-count fallback for degenerate catalogs
//! - **Deterministic ranking**: ties broken by catalog order
//! - **Atomic reloads**: queries keep their snapshot while a new one is swapped in

// Re-export core types
pub use vitrine_core::{
    normalize, Error, Language, LoadError, LoadReport, Product, ProductId, RawCatalog, Result,
    Snapshot, SnapshotInfo, StopWords, TermVector, VectorizationMode, Vocabulary,
};

// Re-export similarity
pub use vitrine_similarity::{
    explain, recommend, recommend_scored, Explanation, Recommendation, DEFAULT_RECOMMENDATIONS,
};

// Re-export catalog
pub use vitrine_catalog::{
    CatalogConfig, CatalogManager, CatalogSource, CsvSource, MemorySource, StopwordConfig,
};

/// Build a snapshot from raw rows and a stopword set
pub fn build_snapshot(raw: &RawCatalog, stopwords: &StopWords) -> Snapshot {
    Snapshot::build(raw, stopwords)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build_snapshot, explain, recommend, recommend_scored, CatalogConfig, CatalogManager,
        CatalogSource, CsvSource, Error, Language, LoadError, MemorySource, Product, ProductId,
        RawCatalog, Recommendation, Result, Snapshot, StopWords, StopwordConfig,
        DEFAULT_RECOMMENDATIONS,
    };
}
