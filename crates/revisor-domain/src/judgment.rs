//! Judgments produced by the adjudication pass

use crate::erro::RecordId;

/// The outcome of adjudicating one [`crate::ErrorRecord`].
///
/// At most one judgment exists per record in normal operation; the store's
/// open→judged transition is idempotent and refuses to create a second.
#[derive(Debug, Clone, PartialEq)]
pub struct Judgment {
    /// Unique identifier.
    pub id: RecordId,
    /// The error record this judgment adjudicates.
    pub erro_id: RecordId,
    /// Reference of the document, copied for direct querying.
    pub reference: String,
    /// The judge's written analysis.
    pub resultado_analise: String,
    /// The final corrected (or confirmed) value.
    pub resposta_correta: String,
    /// Confidence score, clamped to [0.0, 1.0].
    pub grau_certeza: f64,
    /// Creation timestamp (unix seconds).
    pub data_julgamento: u64,
}

impl Judgment {
    /// Create a judgment for one error record. The confidence score is
    /// clamped into [0.0, 1.0].
    pub fn new(
        erro_id: RecordId,
        reference: impl Into<String>,
        resultado_analise: impl Into<String>,
        resposta_correta: impl Into<String>,
        grau_certeza: f64,
        data_julgamento: u64,
    ) -> Self {
        Self {
            id: RecordId::new(),
            erro_id,
            reference: reference.into(),
            resultado_analise: resultado_analise.into(),
            resposta_correta: resposta_correta.into(),
            grau_certeza: grau_certeza.clamp(0.0, 1.0),
            data_julgamento,
        }
    }
}
