//! Parse generated text into discrepancy candidates

use crate::error::AnalysisError;
use crate::types::DiscrepancyCandidate;
use serde_json::Value;
use tracing::warn;

/// Result of parsing one generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDiscrepancies {
    /// Well-formed discrepancy candidates, in response order.
    pub candidates: Vec<DiscrepancyCandidate>,
    /// Number of elements dropped for missing required fields. A non-zero
    /// count means the response was partially invalid.
    pub rejected: usize,
}

/// Strip a markdown code-fence decoration from generated text.
///
/// The grammar is deliberately small: an optional leading fence line
/// (```` ``` ```` with an optional language tag) and an optional trailing
/// fence line are removed; anything else is the payload as-is. Triple
/// backticks inside the payload are never touched, and stripping an
/// already-unfenced text returns it unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let rest = match trimmed.strip_prefix("```") {
        Some(rest) => rest,
        None => return trimmed,
    };

    // The remainder of the fence line is a language tag; the payload starts
    // on the next line. A lone fence with no newline has no payload to
    // recover, so the whole text is kept.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => return trimmed,
    };

    let body = body.trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);
    body.trim()
}

/// Parse generated text into the list of discrepancy candidates.
///
/// The text (after fence stripping) must be a JSON object; its `erros`
/// array holds the candidates. A missing `erros` key means no divergence.
/// Elements missing any of the four required fields are dropped and
/// counted, not silently defaulted.
pub fn parse_discrepancies(text: &str) -> Result<ParsedDiscrepancies, AnalysisError> {
    let payload = strip_code_fence(text);

    let json: Value = serde_json::from_str(payload)
        .map_err(|e| AnalysisError::ResponseFormat(format!("JSON parse error: {}", e)))?;

    let erros = match json.get("erros") {
        Some(erros) => erros,
        None => {
            return Ok(ParsedDiscrepancies {
                candidates: Vec::new(),
                rejected: 0,
            })
        }
    };

    let items = erros
        .as_array()
        .ok_or_else(|| AnalysisError::ResponseFormat("'erros' is not an array".to_string()))?;

    let mut candidates = Vec::new();
    let mut rejected = 0;
    for (idx, item) in items.iter().enumerate() {
        match candidate_from_json(item) {
            Ok(candidate) => candidates.push(candidate),
            Err(reason) => {
                warn!(index = idx, reason = %reason, "dropping malformed discrepancy element");
                rejected += 1;
            }
        }
    }

    Ok(ParsedDiscrepancies {
        candidates,
        rejected,
    })
}

/// Extract a single candidate, requiring all four fields.
fn candidate_from_json(json: &Value) -> Result<DiscrepancyCandidate, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "element is not a JSON object".to_string())?;

    let campo = obj
        .get("campo")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "missing or invalid 'campo'".to_string())?
        .to_string();

    let valor_incorreto = obj
        .get("valor_incorreto")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "missing or invalid 'valor_incorreto'".to_string())?
        .to_string();

    let valor_correto = obj
        .get("valor_correto")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "missing or invalid 'valor_correto'".to_string())?
        .to_string();

    let motivo = obj
        .get("motivo")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "missing or invalid 'motivo'".to_string())?
        .to_string();

    Ok(DiscrepancyCandidate {
        campo,
        valor_incorreto,
        valor_correto,
        motivo,
    })
}
