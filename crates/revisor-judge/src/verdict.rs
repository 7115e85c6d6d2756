//! Parse the judge's verdict response

use crate::JudgeError;
use revisor_analysis::strip_code_fence;
use serde_json::Value;

/// Certainty assumed when the judge omits `grau_certeza`.
pub const DEFAULT_CERTAINTY: f64 = 0.9;

/// The judge's parsed verdict for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Written analysis.
    pub analise: String,
    /// Final corrected (or confirmed) value.
    pub valor_correto_final: String,
    /// Certainty in [0, 1]; defaulted when absent.
    pub grau_certeza: f64,
    /// Whether the judge considered a correction necessary at all.
    pub correcao_necessaria: Option<bool>,
}

/// Parse a verdict with the same fence-strip + JSON discipline as the
/// comparison pass. `analise` and `valor_correto_final` are required;
/// everything else degrades gracefully.
pub fn parse_verdict(text: &str) -> Result<Verdict, JudgeError> {
    let payload = strip_code_fence(text);

    let json: Value = serde_json::from_str(payload)
        .map_err(|e| JudgeError::Format(format!("JSON parse error: {}", e)))?;
    let obj = json
        .as_object()
        .ok_or_else(|| JudgeError::Format("verdict is not a JSON object".to_string()))?;

    let analise = obj
        .get("analise")
        .and_then(|v| v.as_str())
        .ok_or_else(|| JudgeError::Format("missing or invalid 'analise'".to_string()))?
        .to_string();

    let valor_correto_final = obj
        .get("valor_correto_final")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            JudgeError::Format("missing or invalid 'valor_correto_final'".to_string())
        })?
        .to_string();

    let grau_certeza = obj
        .get("grau_certeza")
        .and_then(|v| v.as_f64())
        .unwrap_or(DEFAULT_CERTAINTY);

    let correcao_necessaria = obj.get("correcao_necessaria").and_then(|v| v.as_bool());

    Ok(Verdict {
        analise,
        valor_correto_final,
        grau_certeza,
        correcao_necessaria,
    })
}
