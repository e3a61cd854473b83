pub mod matcher;
pub mod store;

pub use matcher::*;
pub use store::*;

use std::path::PathBuf;

use thiserror::Error;

/// Failure to build the vocabulary at startup. Always fatal: the store is
/// never handed out half-loaded.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("Taxonomy source not found at: {0}")]
    NotFound(PathBuf),

    #[error("I/O error reading taxonomy source: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed taxonomy source: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {line} has {found} column(s), expected exactly 2 (category, term)")]
    MalformedRow { line: u64, found: usize },

    #[error("Term '{term}' could not be compiled into a pattern: {reason}")]
    Pattern { term: String, reason: String },
}
