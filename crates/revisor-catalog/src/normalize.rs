//! Field normalization: raw catalog keys to canonical fields

use revisor_domain::field::FIELD_MAPPING;
use revisor_domain::{CanonicalField, CatalogRecord, NormalizedRecord};

/// Translate a raw catalog record into the canonical field set.
///
/// Raw keys are matched case-insensitively against [`FIELD_MAPPING`]; when
/// several raw keys resolve to the same canonical field, the first match in
/// mapping-table order wins. A raw value equal (after trimming and
/// case-folding) to the `"NC"` sentinel or to the empty string marks the
/// field as not cataloged and is dropped. The source reference, when
/// present, is copied under [`CanonicalField::Referencia`] so every
/// normalized record stays traceable.
///
/// An empty input yields an empty result; callers treat that as a fatal
/// precondition failure, since no comparison is meaningful without catalog
/// data.
pub fn normalize(record: &CatalogRecord) -> NormalizedRecord {
    let mut normalized = NormalizedRecord::new();
    if record.is_empty() {
        return normalized;
    }

    for (raw_key, field) in FIELD_MAPPING {
        if let Some(value) = record.get_ignore_case(raw_key) {
            if !is_not_cataloged(value) {
                normalized.insert_if_absent(*field, value.trim());
            }
        }
    }

    if let Some(reference) = record.reference() {
        normalized.insert_if_absent(CanonicalField::Referencia, reference);
    }

    normalized
}

/// Whether a raw value is the "not cataloged" sentinel.
fn is_not_cataloged(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("NC")
}
