//! Error taxonomy for the analysis pipeline

use thiserror::Error;

/// Errors that can occur during the analysis of one document.
///
/// All variants are fatal per-document: the orchestrator catches them once,
/// persists a `"sistema"` record and returns an error-status report.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The catalog source failed
    #[error("catalog fetch failed: {0}")]
    Fetch(String),

    /// The catalog holds no record for the reference
    #[error("no catalog record found for {0}")]
    CatalogMissing(String),

    /// No canonical fields survived normalization
    #[error("no catalog data available for comparison on {0}")]
    EmptyNormalization(String),

    /// The requested prompt strategy key is not registered
    #[error("unknown prompt strategy: {0}")]
    UnknownStrategy(String),

    /// The generation capability failed or returned no usable text
    #[error("generation failed: {0}")]
    Generation(String),

    /// The generated text did not match the required response contract
    #[error("response format error: {0}")]
    ResponseFormat(String),

    /// Persisting the discrepancy batch failed
    #[error("persistence error: {0}")]
    Persistence(String),
}
