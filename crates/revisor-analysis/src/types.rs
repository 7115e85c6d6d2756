//! Request and response types for analysis

use serde::{Deserialize, Serialize};

/// One discrepancy reported by the generation capability.
///
/// Transient: produced by the parser, persisted as an
/// [`revisor_domain::ErrorRecord`] only after the invariant and post-filter
/// checks pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepancyCandidate {
    /// Field name as the capability reported it (raw key or catalog label).
    pub campo: String,
    /// The catalogued value considered wrong.
    pub valor_incorreto: String,
    /// The suggested correction.
    pub valor_correto: String,
    /// Rationale for the discrepancy.
    pub motivo: String,
}

/// Outcome status of one document analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// The pipeline ran to completion.
    Success,
    /// The pipeline failed; a `"sistema"` record was persisted.
    Error,
}

/// Structured summary returned for every analysis invocation.
///
/// Callers always receive this type, never a raw error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Outcome status.
    pub status: AnalysisStatus,
    /// The analyzed reference.
    pub reference: String,
    /// Discrepancies found (empty on failure).
    pub erros_identificados: Vec<DiscrepancyCandidate>,
    /// Failure description when status is [`AnalysisStatus::Error`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnalysisReport {
    /// Build a success report.
    pub fn success(reference: impl Into<String>, erros: Vec<DiscrepancyCandidate>) -> Self {
        Self {
            status: AnalysisStatus::Success,
            reference: reference.into(),
            erros_identificados: erros,
            message: None,
        }
    }

    /// Build an error report.
    pub fn error(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: AnalysisStatus::Error,
            reference: reference.into(),
            erros_identificados: Vec::new(),
            message: Some(message.into()),
        }
    }
}
