//! Per-term explanation of a similarity score

use serde::Serialize;
use std::cmp::Ordering;
use vitrine_core::{ProductId, Snapshot};

/// How much one shared term adds to the cosine score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermContribution {
    pub term: String,
    pub contribution: f32,
}

/// Breakdown of the similarity between two products.
///
/// Contributions sum to `score` (up to float rounding).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub query_id: ProductId,
    pub candidate_id: ProductId,
    pub score: f32,
    pub terms: Vec<TermContribution>,
}

/// Explain the score of `candidate_id` against `query_id`.
///
/// `None` when either product is not in the snapshot.
pub fn explain(
    snapshot: &Snapshot,
    query_id: ProductId,
    candidate_id: ProductId,
) -> Option<Explanation> {
    let query = snapshot.vector(snapshot.position(query_id)?)?;
    let candidate = snapshot.vector(snapshot.position(candidate_id)?)?;

    let denom = query.norm() * candidate.norm();
    let mut terms: Vec<TermContribution> = if denom == 0.0 {
        Vec::new()
    } else {
        query
            .entries()
            .iter()
            .filter_map(|&(idx, w)| {
                let other = candidate.get(idx);
                (other > 0.0).then(|| TermContribution {
                    term: snapshot.vocabulary().term(idx).unwrap_or_default().to_string(),
                    contribution: w * other / denom,
                })
            })
            .collect()
    };

    terms.sort_by(|a, b| {
        b.contribution
            .partial_cmp(&a.contribution)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.term.cmp(&b.term))
    });

    Some(Explanation {
        query_id,
        candidate_id,
        score: query.cosine_similarity(candidate),
        terms,
    })
}
