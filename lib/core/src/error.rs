use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure to obtain the raw catalog.
///
/// Only the source itself can fail a load. Bad rows are dropped and recorded
/// in the [`LoadReport`](crate::LoadReport) instead.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Catalog source unavailable: {path}: {source}")]
    SourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed catalog {path}: {message}")]
    Malformed { path: String, message: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Product not found: {0}")]
    ProductNotFound(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
