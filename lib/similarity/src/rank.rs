//! Similarity ranking
//!
//! Scores the query product's term vector against every other product in a
//! snapshot and returns the most similar ones. Ranking is read-only: for a
//! fixed snapshot the result depends only on `(query_id, n)`.

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Reverse;
use tracing::debug;
use vitrine_core::{Product, ProductId, Snapshot};

/// Number of recommendations returned when the caller does not choose
pub const DEFAULT_RECOMMENDATIONS: usize = 6;

/// A recommended product with its cosine similarity to the query
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub product: Product,
    pub score: f32,
}

/// Descending score, then ascending catalog position
#[inline]
fn sort_key(&(pos, score): &(usize, f32)) -> (Reverse<OrderedFloat<f32>>, usize) {
    (Reverse(OrderedFloat(score)), pos)
}

/// Score every product except the query, best first.
///
/// Returns `(catalog position, score)` pairs. An unknown `query_id` yields an
/// empty list.
pub fn rank(snapshot: &Snapshot, query_id: ProductId) -> Vec<(usize, f32)> {
    top_n(snapshot, query_id, usize::MAX)
}

/// The `n` best `(catalog position, score)` pairs for `query_id`
pub fn top_n(snapshot: &Snapshot, query_id: ProductId, n: usize) -> Vec<(usize, f32)> {
    let Some(query_pos) = snapshot.position(query_id) else {
        debug!("Product {} not in snapshot; nothing to rank", query_id);
        return Vec::new();
    };
    let Some(query) = snapshot.vector(query_pos) else {
        return Vec::new();
    };
    if n == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f32)> = snapshot
        .vectors()
        .par_iter()
        .enumerate()
        .filter(|&(pos, _)| pos != query_pos)
        .map(|(pos, vector)| (pos, query.cosine_similarity(vector)))
        .collect();

    // The key is unique per product, so partial selection keeps the order total
    if n < scored.len() {
        scored.select_nth_unstable_by_key(n, sort_key);
        scored.truncate(n);
    }
    scored.sort_unstable_by_key(sort_key);
    scored
}

/// Up to `n` products most similar to `query_id`, best first, query excluded
pub fn recommend(snapshot: &Snapshot, query_id: ProductId, n: usize) -> Vec<Product> {
    top_n(snapshot, query_id, n)
        .into_iter()
        .map(|(pos, _)| snapshot.products()[pos].clone())
        .collect()
}

/// Like [`recommend`], keeping each product's score
pub fn recommend_scored(snapshot: &Snapshot, query_id: ProductId, n: usize) -> Vec<Recommendation> {
    top_n(snapshot, query_id, n)
        .into_iter()
        .map(|(pos, score)| Recommendation {
            product: snapshot.products()[pos].clone(),
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vitrine_core::{RawCatalog, StopWords};

    fn snapshot(records: &[serde_json::Value]) -> Snapshot {
        Snapshot::build(&RawCatalog::from_json_records(records), &StopWords::english())
    }

    fn ids(products: &[Product]) -> Vec<u64> {
        products.iter().map(|p| p.id).collect()
    }

    fn makeup() -> Snapshot {
        snapshot(&[
            json!({"id": 1, "name": "red lipstick matte"}),
            json!({"id": 2, "name": "red lipstick glossy"}),
            json!({"id": 3, "name": "blue eyeliner"}),
        ])
    }

    #[test]
    fn test_shared_terms_rank_first() {
        let snapshot = makeup();
        let results = recommend(&snapshot, 1, 2);
        assert_eq!(ids(&results), vec![2, 3]);
    }

    #[test]
    fn test_excludes_query_and_caps_at_n() {
        let snapshot = makeup();
        for id in [1, 2, 3] {
            for n in 0..5 {
                let results = recommend(&snapshot, id, n);
                assert!(results.len() <= n.min(2));
                assert!(!ids(&results).contains(&id));
            }
        }
        assert_eq!(recommend(&snapshot, 3, DEFAULT_RECOMMENDATIONS).len(), 2);
    }

    #[test]
    fn test_unknown_id_is_empty() {
        let snapshot = makeup();
        assert!(recommend(&snapshot, 99, 6).is_empty());
        assert!(rank(&snapshot, 99).is_empty());
    }

    #[test]
    fn test_ties_break_by_catalog_position() {
        let snapshot = snapshot(&[
            json!({"id": 5, "name": "kajal pencil black"}),
            json!({"id": 9, "name": "nude gloss"}),
            json!({"id": 7, "name": "kajal pencil brown"}),
            json!({"id": 4, "name": "nude gloss"}),
            json!({"id": 8, "name": "kajal pencil grey"}),
        ]);
        let scored = recommend_scored(&snapshot, 5, 4);
        let order: Vec<u64> = scored.iter().map(|r| r.product.id).collect();
        assert_eq!(order, vec![7, 8, 9, 4]);
        assert_eq!(scored[0].score, scored[1].score);
        assert_eq!(scored[2].score, 0.0);
        assert_eq!(scored[3].score, 0.0);
    }

    #[test]
    fn test_scores_non_increasing() {
        let snapshot = snapshot(&[
            json!({"id": 1, "name": "matte lipstick red", "category": "lips"}),
            json!({"id": 2, "name": "gloss lips pink"}),
            json!({"id": 3, "name": "matte foundation"}),
            json!({"id": 4, "name": "red lipstick satin", "category": "lips"}),
            json!({"id": 5, "name": "mascara black"}),
        ]);
        let scored = recommend_scored(&snapshot, 1, 10);
        assert_eq!(scored.len(), 4);
        assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(scored[0].product.id, 4);
    }

    #[test]
    fn test_top_n_matches_full_rank_prefix() {
        let snapshot = snapshot(&[
            json!({"id": 1, "name": "a b c"}),
            json!({"id": 2, "name": "a b"}),
            json!({"id": 3, "name": "a"}),
            json!({"id": 4, "name": "b c"}),
            json!({"id": 5, "name": "d"}),
            json!({"id": 6, "name": "c d"}),
        ]);
        let full = rank(&snapshot, 1);
        for n in 0..=full.len() {
            assert_eq!(top_n(&snapshot, 1, n), full[..n].to_vec());
        }
    }

    #[test]
    fn test_idempotent() {
        let snapshot = makeup();
        assert_eq!(ids(&recommend(&snapshot, 2, 6)), ids(&recommend(&snapshot, 2, 6)));
    }

    #[test]
    fn test_degenerate_corpus_ranks_without_panic() {
        let snapshot = snapshot(&[json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);
        assert_eq!(ids(&recommend(&snapshot, 2, 6)), vec![1, 3]);
    }
}
