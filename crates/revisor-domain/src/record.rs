//! Raw and normalized catalog records

use crate::field::CanonicalField;
use std::collections::BTreeMap;

/// The raw metadata the external catalog returned for one reference.
///
/// Keys are external and unstable: callers must not assume case or exact
/// spelling. Values arrive stringified (booleans and numbers included);
/// the fetcher drops JSON nulls before this type is built. A record is
/// immutable once fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRecord {
    values: BTreeMap<String, String>,
}

impl CatalogRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from raw key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Insert a raw key/value pair.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Exact-key lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Case-insensitive lookup. When several stored keys collide, the first
    /// in key order is returned.
    pub fn get_ignore_case(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The record's own reference value, if the source carried one.
    pub fn reference(&self) -> Option<&str> {
        self.get_ignore_case("reference")
    }

    /// Whether the record holds no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of raw entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over raw key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A catalog record translated into the canonical field set.
///
/// Absent means absent: a field the source did not catalog (or marked with
/// the `"NC"` sentinel) has no entry here, never an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRecord {
    fields: BTreeMap<CanonicalField, String>,
}

impl NormalizedRecord {
    /// Create an empty normalized record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a canonical field. Existing values are kept; the first writer
    /// wins, matching the mapping-table collision rule.
    pub fn insert_if_absent(&mut self, field: CanonicalField, value: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| value.into());
    }

    /// Look up a canonical field.
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Whether the field is present.
    pub fn contains(&self, field: CanonicalField) -> bool {
        self.fields.contains_key(&field)
    }

    /// Whether the record holds no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether the record carries any catalog data beyond the traceability
    /// reference. A record without data cannot be compared against a
    /// document and is a fatal precondition failure upstream.
    pub fn has_data(&self) -> bool {
        self.fields
            .keys()
            .any(|f| *f != CanonicalField::Referencia)
    }

    /// Number of populated fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over populated fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }

    /// Essential fields the source did not catalog.
    pub fn missing_fields(&self) -> Vec<CanonicalField> {
        CanonicalField::essential()
            .filter(|f| !self.contains(*f))
            .collect()
    }

    /// Completeness check: every essential field is populated.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
