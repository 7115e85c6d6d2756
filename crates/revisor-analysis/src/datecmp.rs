//! Optional date-equivalence post-filter
//!
//! Suppresses discrepancies where the catalogued and suggested dates name
//! the same historical day in different formats. Disabled by default; see
//! `AnalysisConfig::suppress_equivalent_dates`.

use chrono::NaiveDate;

/// Accepted date layouts, day-first layouts tried before ISO.
const DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// Parse a catalogued date string in any accepted layout.
pub fn parse_flexible(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Whether two date strings name the same day, month and year.
///
/// Returns false when either side cannot be parsed: an unparseable date is
/// a real divergence, not a formatting variant.
pub fn is_same_date(a: &str, b: &str) -> bool {
    match (parse_flexible(a), parse_flexible(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
