use serde::{Deserialize, Serialize};

/// Sparse non-negative term weights over a shared vocabulary.
///
/// Entries are sorted by vocabulary index and never hold a zero weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermVector {
    entries: Vec<(usize, f32)>,
    norm: f32,
}

impl TermVector {
    /// Build from `(index, weight)` pairs in any order.
    /// Zero, negative and non-finite weights are dropped; repeated indices are summed.
    pub fn new(mut entries: Vec<(usize, f32)>) -> Self {
        entries.retain(|&(_, w)| w.is_finite() && w > 0.0);
        entries.sort_by_key(|&(idx, _)| idx);
        entries.dedup_by(|next, kept| {
            if next.0 == kept.0 {
                kept.1 += next.1;
                true
            } else {
                false
            }
        });
        let norm = entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
        Self { entries, norm }
    }

    #[inline]
    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    #[inline]
    pub fn get(&self, idx: usize) -> f32 {
        self.entries
            .binary_search_by_key(&idx, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// L2 magnitude
    #[inline]
    pub fn norm(&self) -> f32 {
        self.norm
    }

    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sparse dot product by merging the two sorted entry lists
    pub fn dot(&self, other: &TermVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let (a, b) = (&self.entries, &other.entries);
        let mut sum = 0.0f32;
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

    /// Cosine similarity; 0 when either vector has zero magnitude
    #[inline]
    pub fn cosine_similarity(&self, other: &TermVector) -> f32 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }
        (self.dot(other) / (self.norm * other.norm)).clamp(0.0, 1.0)
    }
}
