//! # Vitrine Catalog
//!
//! Catalog sources and snapshot management.
//!
//! - [`CatalogSource`] - where raw rows come from ([`CsvSource`], [`MemorySource`])
//! - [`CatalogConfig`] - catalog path, stopwords, delimiter, reload interval
//! - [`CatalogManager`] - active snapshot, atomic reloads, query API

pub mod config;
pub mod manager;
pub mod source;

pub use config::{CatalogConfig, StopwordConfig};
pub use manager::CatalogManager;
pub use source::{load_products, load_stopwords, CatalogSource, CsvSource, MemorySource};
