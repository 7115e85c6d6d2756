//! Persisted discrepancy records and their identifiers

use crate::field::SYSTEM_FIELD;
use std::fmt;

/// Unique identifier for persisted records, based on UUIDv7.
///
/// UUIDv7 keeps identifiers chronologically sortable and needs no
/// coordination between concurrent pipeline instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u128);

impl RecordId {
    /// Generate a fresh UUIDv7-based identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Rebuild an identifier from its raw value (storage deserialization).
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an identifier from its UUID string form.
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("invalid record id: {}", e))
    }

    /// The raw u128 value.
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// One persisted catalog discrepancy.
///
/// Created `open` (`julgado = false`) by the analysis pipeline, either from
/// a parsed discrepancy or as a synthetic `"sistema"` record when the
/// pipeline itself failed. Only the judge pass mutates a record: it flips
/// `julgado` to true and may overwrite `resposta_correta`. Records are never
/// deleted by this system.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    /// Unique identifier.
    pub id: RecordId,
    /// Reference of the document this discrepancy belongs to.
    pub reference: String,
    /// Field name as reported; resolves into the canonical set, or is the
    /// literal `"sistema"` sentinel.
    pub campo: String,
    /// The catalogued value considered wrong.
    pub conteudo_errado: String,
    /// Suggested correction; overwritten by the judge pass.
    pub resposta_correta: Option<String>,
    /// Rationale for the discrepancy.
    pub motivo: String,
    /// Creation timestamp (unix seconds).
    pub data_registro: u64,
    /// Whether the judge pass has adjudicated this record.
    pub julgado: bool,
    /// Key of the prompt strategy that produced the record.
    pub prompt_name: Option<String>,
    /// Tri-state confirmation flag, reserved for later review. `None` until
    /// someone (human or automated) has looked at the record.
    pub erro_positivo: Option<bool>,
}

impl ErrorRecord {
    /// Create an open discrepancy record.
    pub fn new(
        reference: impl Into<String>,
        campo: impl Into<String>,
        conteudo_errado: impl Into<String>,
        resposta_correta: Option<String>,
        motivo: impl Into<String>,
        prompt_name: Option<String>,
        data_registro: u64,
    ) -> Self {
        Self {
            id: RecordId::new(),
            reference: reference.into(),
            campo: campo.into(),
            conteudo_errado: conteudo_errado.into(),
            resposta_correta,
            motivo: motivo.into(),
            data_registro,
            julgado: false,
            prompt_name,
            erro_positivo: None,
        }
    }

    /// Create the synthetic record describing a pipeline failure for one
    /// reference.
    pub fn system(
        reference: impl Into<String>,
        motivo: impl Into<String>,
        data_registro: u64,
    ) -> Self {
        Self::new(
            reference,
            SYSTEM_FIELD,
            "N/A",
            Some("Revisar processamento".to_string()),
            motivo,
            None,
            data_registro,
        )
    }

    /// Whether this is a pipeline-failure bookkeeping record.
    pub fn is_system(&self) -> bool {
        self.campo == SYSTEM_FIELD
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Identifier ordering matches the underlying value ordering.
        #[test]
        fn test_id_ordering_property(a: u128, b: u128) {
            let id_a = RecordId::from_value(a);
            let id_b = RecordId::from_value(b);
            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        /// Round-trip through the string form preserves the identifier.
        #[test]
        fn test_id_string_roundtrip(value: u128) {
            let id = RecordId::from_value(value);
            match RecordId::from_string(&id.to_string()) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }
    }
}
