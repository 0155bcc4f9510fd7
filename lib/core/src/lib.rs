//! # Vitrine Core
//!
//! Core library for the Vitrine recommendation engine.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`Product`] - A normalized catalog record
//! - [`normalize`] - Raw catalog rows to typed products
//! - [`StopWords`] - Stopword sets (built-in Portuguese and English)
//! - [`Vocabulary`] and [`TermVector`] - Sparse TF-IDF representation
//! - [`Snapshot`] - Immutable products + vocabulary + vector matrix
//!
//! ## Example
//!
//! ```rust
//! use vitrine_core::{RawCatalog, Snapshot, StopWords};
//! use serde_json::json;
//!
//! let raw = RawCatalog::from_json_records(&[
//!     json!({"id": 1, "name": "red lipstick matte"}),
//!     json!({"id": 2, "name": "red lipstick glossy"}),
//!     json!({"id": 3, "name": "blue eyeliner"}),
//! ]);
//! let snapshot = Snapshot::build(&raw, &StopWords::english());
//! assert_eq!(snapshot.len(), 3);
//! assert!(snapshot.get_product(2).is_some());
//! ```

pub mod error;
pub mod normalizer;
pub mod product;
pub mod snapshot;
pub mod stopwords;
pub mod text;
pub mod vector;
pub mod vectorizer;
pub mod vocabulary;

pub use error::{Error, LoadError, Result};
pub use normalizer::{normalize, Column, LoadReport, Normalized, RejectReason, RowRejection};
pub use product::{Product, ProductId, RawCatalog, PLACEHOLDER_IMAGE_URL, PLACEHOLDER_TOKEN};
pub use snapshot::{Snapshot, SnapshotInfo};
pub use stopwords::{Language, StopWords};
pub use vector::TermVector;
pub use vectorizer::{DegradeReason, VectorizationMode, Vectorized};
pub use vocabulary::Vocabulary;
