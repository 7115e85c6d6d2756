//! Revisor Analysis Layer
//!
//! The discrepancy-detection pipeline: prompt strategies, response parsing,
//! the optional date-equivalence post-filter, and the orchestrator that
//! sequences fetch → normalize → generate → parse → persist for one
//! document reference.
//!
//! Every pipeline failure is caught at the [`Analyzer`] boundary and
//! converted into a persisted `"sistema"` error record plus an error-status
//! report; callers never see a raw error.

pub mod analyzer;
pub mod config;
pub mod datecmp;
pub mod error;
pub mod parser;
pub mod strategy;
pub mod types;

pub use analyzer::Analyzer;
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use parser::{parse_discrepancies, strip_code_fence, ParsedDiscrepancies};
pub use strategy::{PromptStrategy, ANALYST_SYSTEM_PROMPT};
pub use types::{AnalysisReport, AnalysisStatus, DiscrepancyCandidate};
