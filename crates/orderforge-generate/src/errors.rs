use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted while building an order payload.
///
/// Every variant is fail-fast: a run either completes or surfaces one of
/// these without emitting a partial payload.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A required seed field is malformed (e.g. an unparsable price).
    #[error("malformed seed data: {0}")]
    DataFormat(String),
    /// The seeds cannot satisfy the generation constraints.
    #[error("insufficient seed data: {0}")]
    InsufficientData(String),
    /// A required seed file is absent.
    #[error("seed source not found at {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
