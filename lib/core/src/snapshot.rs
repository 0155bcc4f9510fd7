//! Immutable catalog snapshot
//!
//! A [`Snapshot`] bundles the normalized products, the vocabulary and the term
//! vector matrix. It is built once from a full catalog and never mutated;
//! a reload builds a new one.

use crate::normalizer::{normalize, LoadReport, Normalized};
use crate::product::{Product, ProductId, RawCatalog};
use crate::stopwords::StopWords;
use crate::vector::TermVector;
use crate::vectorizer::{self, VectorizationMode};
use crate::vocabulary::Vocabulary;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Snapshot {
    products: Vec<Product>,
    positions: AHashMap<ProductId, usize>,
    vocabulary: Vocabulary,
    vectors: Vec<TermVector>,
    mode: VectorizationMode,
    report: LoadReport,
    built_at: DateTime<Utc>,
}

/// Summary for display and logs
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotInfo {
    pub products: usize,
    pub vocabulary_size: usize,
    pub vectorization: VectorizationMode,
    pub built_at: String,
    pub report: LoadReport,
}

impl Snapshot {
    /// Normalize `raw`, vectorize the result and package both
    pub fn build(raw: &RawCatalog, stopwords: &StopWords) -> Self {
        Self::from_normalized(normalize(raw), stopwords)
    }

    pub fn from_normalized(normalized: Normalized, stopwords: &StopWords) -> Self {
        let Normalized { products, report } = normalized;
        let vectorized = vectorizer::build(&products, stopwords);
        let positions = products
            .iter()
            .enumerate()
            .map(|(pos, p)| (p.id, pos))
            .collect();

        info!(
            "Built snapshot: {} products, {} terms, {:?}",
            products.len(),
            vectorized.vocabulary.len(),
            vectorized.mode
        );

        Self {
            products,
            positions,
            vocabulary: vectorized.vocabulary,
            vectors: vectorized.vectors,
            mode: vectorized.mode,
            report,
            built_at: Utc::now(),
        }
    }

    /// Zero-product snapshot served when the catalog cannot be read
    pub fn empty() -> Self {
        Self {
            products: Vec::new(),
            positions: AHashMap::new(),
            vocabulary: Vocabulary::new(),
            vectors: Vec::new(),
            mode: VectorizationMode::Weighted,
            report: LoadReport::default(),
            built_at: Utc::now(),
        }
    }

    /// Products in catalog order
    #[inline]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[inline]
    pub fn get_product(&self, id: ProductId) -> Option<&Product> {
        self.position(id).map(|pos| &self.products[pos])
    }

    /// Catalog row position of `id`; also its row in the vector matrix
    #[inline]
    pub fn position(&self, id: ProductId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    #[inline]
    pub fn vector(&self, pos: usize) -> Option<&TermVector> {
        self.vectors.get(pos)
    }

    #[inline]
    pub fn vectors(&self) -> &[TermVector] {
        &self.vectors
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn mode(&self) -> VectorizationMode {
        self.mode
    }

    #[inline]
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    #[inline]
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            products: self.products.len(),
            vocabulary_size: self.vocabulary.len(),
            vectorization: self.mode,
            built_at: self.built_at.to_rfc3339(),
            report: self.report.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::PLACEHOLDER_TOKEN;
    use serde_json::json;

    #[test]
    fn test_build_aligns_products_and_vectors() {
        let raw = RawCatalog::from_json_records(&[
            json!({"id": 10, "name": "red lipstick matte"}),
            json!({"id": 20, "name": "red lipstick glossy"}),
            json!({"id": 30, "name": "blue eyeliner"}),
        ]);
        let snapshot = Snapshot::build(&raw, &StopWords::empty());
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.vectors().len(), 3);
        assert_eq!(snapshot.position(20), Some(1));
        assert_eq!(snapshot.get_product(30).map(|p| p.name.as_str()), Some("blue eyeliner"));
        assert!(snapshot.get_product(40).is_none());
        assert_eq!(snapshot.mode(), VectorizationMode::Weighted);
    }

    #[test]
    fn test_degenerate_corpus_has_placeholder_vocabulary() {
        let raw = RawCatalog::from_json_records(&[
            json!({"id": 1, "name": ""}),
            json!({"id": 2, "price": "3.5"}),
        ]);
        let snapshot = Snapshot::build(&raw, &StopWords::portuguese());
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.vocabulary().terms(), &[PLACEHOLDER_TOKEN]);
        assert!(snapshot.mode().is_degraded());
        assert!(snapshot.report().placeholder_corpus);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::empty();
        assert!(snapshot.is_empty());
        assert!(snapshot.vocabulary().is_empty());
        assert_eq!(snapshot.info().products, 0);
    }
}
