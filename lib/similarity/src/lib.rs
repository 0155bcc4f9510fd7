//! # Vitrine Similarity
//!
//! Content-based ranking over an immutable catalog [`Snapshot`](vitrine_core::Snapshot).
//!
//! ## Features
//!
//! - **Cosine ranking**: query vector against every other product, scored in parallel
//! - **Deterministic order**: descending score, ties by catalog position
//! - **Explainability**: per-term contribution breakdown
//!
//! ## Example
//!
//! ```rust
//! use vitrine_core::{RawCatalog, Snapshot, StopWords};
//! use vitrine_similarity::{recommend, DEFAULT_RECOMMENDATIONS};
//! use serde_json::json;
//!
//! let raw = RawCatalog::from_json_records(&[
//!     json!({"id": 1, "name": "red lipstick matte"}),
//!     json!({"id": 2, "name": "red lipstick glossy"}),
//!     json!({"id": 3, "name": "blue eyeliner"}),
//! ]);
//! let snapshot = Snapshot::build(&raw, &StopWords::english());
//!
//! let similar = recommend(&snapshot, 1, DEFAULT_RECOMMENDATIONS);
//! assert_eq!(similar[0].id, 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Snapshot   │────>│    rank     │────>│  recommend  │
//! │ (vectors)   │     │ (cosine)    │     │  (top-N)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!       │
//!       │              ┌─────────────┐
//!       └─────────────>│   explain   │
//!                      │ (per term)  │
//!                      └─────────────┘
//! ```

pub mod explain;
pub mod rank;

pub use explain::{explain, Explanation, TermContribution};
pub use rank::{rank, recommend, recommend_scored, top_n, Recommendation, DEFAULT_RECOMMENDATIONS};
