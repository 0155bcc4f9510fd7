//! TF-IDF vectorization over the whole catalog
//!
//! Each product's composite text is tokenized, stopwords are removed, and the
//! surviving terms form a shared [`Vocabulary`]. A product's weight for a term
//! is `tf * ln(N / df)`: terms found in every product weigh nothing, rare
//! terms weigh the most.
//!
//! When no term can discriminate between products (every weighted vector ends
//! up empty) the vectorizer falls back to raw term counts. Vectorization never
//! fails.

use crate::product::{Product, PLACEHOLDER_TOKEN};
use crate::stopwords::StopWords;
use crate::text::tokenize_filtered;
use crate::vector::TermVector;
use crate::vocabulary::Vocabulary;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradeReason {
    /// Every term occurs in every product, so all IDF weights are zero
    NoDiscriminatingTerms,
    /// Stopword removal left no term at all
    EmptyVocabulary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "reason", rename_all = "snake_case")]
pub enum VectorizationMode {
    /// TF-IDF weights
    Weighted,
    /// Raw term counts
    Degraded(DegradeReason),
}

impl VectorizationMode {
    #[inline]
    pub fn is_degraded(&self) -> bool {
        matches!(self, VectorizationMode::Degraded(_))
    }
}

/// Vocabulary plus one term vector per product, index-aligned with the input
#[derive(Debug, Clone)]
pub struct Vectorized {
    pub vocabulary: Vocabulary,
    pub vectors: Vec<TermVector>,
    pub mode: VectorizationMode,
}

/// Build the vocabulary and term vectors for `products`
pub fn build(products: &[Product], stopwords: &StopWords) -> Vectorized {
    let texts: Vec<&str> = products.iter().map(|p| p.composite_text.as_str()).collect();
    build_from_texts(&texts, stopwords)
}

/// Build from raw document texts; `build` delegates here
pub fn build_from_texts<S: AsRef<str>>(documents: &[S], stopwords: &StopWords) -> Vectorized {
    let mut vocabulary = Vocabulary::new();

    // Per-document term counts, kept in first-seen order for determinism
    let mut counts: Vec<Vec<(usize, u32)>> = Vec::with_capacity(documents.len());
    for doc in documents {
        let mut doc_counts: Vec<(usize, u32)> = Vec::new();
        let mut positions: AHashMap<usize, usize> = AHashMap::new();
        for token in tokenize_filtered(doc.as_ref(), stopwords) {
            let idx = vocabulary.intern(&token);
            match positions.get(&idx) {
                Some(&pos) => doc_counts[pos].1 += 1,
                None => {
                    positions.insert(idx, doc_counts.len());
                    doc_counts.push((idx, 1));
                }
            }
        }
        counts.push(doc_counts);
    }

    if documents.is_empty() {
        return Vectorized {
            vocabulary,
            vectors: Vec::new(),
            mode: VectorizationMode::Weighted,
        };
    }

    if vocabulary.is_empty() {
        warn!(
            "No terms left after stopword removal in {} documents; vectorizing '{}' counts",
            documents.len(),
            PLACEHOLDER_TOKEN
        );
        let idx = vocabulary.intern(PLACEHOLDER_TOKEN);
        let vectors = documents
            .iter()
            .map(|_| TermVector::new(vec![(idx, 1.0)]))
            .collect();
        return Vectorized {
            vocabulary,
            vectors,
            mode: VectorizationMode::Degraded(DegradeReason::EmptyVocabulary),
        };
    }

    let idf = inverse_document_frequencies(&counts, vocabulary.len());
    let weighted: Vec<TermVector> = counts
        .iter()
        .map(|doc| {
            TermVector::new(
                doc.iter()
                    .map(|&(idx, tf)| (idx, tf as f32 * idf[idx]))
                    .collect(),
            )
        })
        .collect();

    if weighted.iter().all(TermVector::is_zero) {
        warn!(
            "TF-IDF produced no discriminating weights for {} documents over {} terms; falling back to raw term counts",
            documents.len(),
            vocabulary.len()
        );
        return Vectorized {
            vectors: raw_counts(&counts),
            vocabulary,
            mode: VectorizationMode::Degraded(DegradeReason::NoDiscriminatingTerms),
        };
    }

    debug!(
        "Vectorized {} documents over {} terms",
        documents.len(),
        vocabulary.len()
    );
    Vectorized {
        vocabulary,
        vectors: weighted,
        mode: VectorizationMode::Weighted,
    }
}

/// `ln(N / df)` for every vocabulary index
fn inverse_document_frequencies(counts: &[Vec<(usize, u32)>], vocab_size: usize) -> Vec<f32> {
    let mut df = vec![0u32; vocab_size];
    for doc in counts {
        for &(idx, _) in doc {
            df[idx] += 1;
        }
    }
    let n_docs = counts.len() as f32;
    df.into_iter()
        .map(|d| if d == 0 { 0.0 } else { (n_docs / d as f32).ln() })
        .collect()
}

fn raw_counts(counts: &[Vec<(usize, u32)>]) -> Vec<TermVector> {
    counts
        .iter()
        .map(|doc| TermVector::new(doc.iter().map(|&(idx, tf)| (idx, tf as f32)).collect()))
        .collect()
}
