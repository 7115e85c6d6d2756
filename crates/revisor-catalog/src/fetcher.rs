//! Catalog record fetcher for the SILB tabular API

use revisor_domain::traits::CatalogSource;
use revisor_domain::CatalogRecord;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default base URL of the catalog's tabular query API.
pub const DEFAULT_BASE_URL: &str = "http://plataformasilb.cchla.ufrn.br/api/get/tabela";

/// Default request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while fetching a catalog record.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network or HTTP-level failure
    #[error("catalog request failed: {0}")]
    Http(String),

    /// Response arrived but was not the expected JSON shape
    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}

/// Client for the external catalog's tabular query API.
///
/// The API answers a reference query with a JSON list; at most the first
/// element describes the requested record. Keys in that record are external
/// and unstable, so downstream normalization must not assume case or exact
/// spelling.
pub struct SilbFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl SilbFetcher {
    /// Create a fetcher against a base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Create a fetcher against the public platform endpoint.
    pub fn default_endpoint() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    async fn fetch_raw(&self, reference: &str) -> Result<Option<CatalogRecord>, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("reference", reference)])
            .send()
            .await
            .map_err(|e| FetchError::Http(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FetchError::Http(format!("HTTP {}", response.status())));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        // The API returns a list; the first item is the record.
        let first = match data.as_array().and_then(|items| items.first()) {
            Some(item) => item,
            None => {
                debug!(reference, "catalog returned no record");
                return Ok(None);
            }
        };

        record_from_json(first)
            .ok_or_else(|| FetchError::Decode("list element is not an object".to_string()))
            .map(Some)
    }
}

/// Flatten a JSON object into a raw catalog record.
///
/// Scalar values are stringified (booleans and numbers included), nulls are
/// dropped, and nested structures keep their JSON rendering so nothing the
/// source sent is lost.
pub fn record_from_json(value: &Value) -> Option<CatalogRecord> {
    let object = value.as_object()?;
    let mut record = CatalogRecord::new();

    for (key, value) in object {
        match value {
            Value::Null => {}
            Value::String(s) => record.insert(key, s.clone()),
            Value::Bool(b) => record.insert(key, b.to_string()),
            Value::Number(n) => record.insert(key, n.to_string()),
            other => record.insert(key, other.to_string()),
        }
    }

    Some(record)
}

impl CatalogSource for SilbFetcher {
    type Error = FetchError;

    async fn fetch(&self, reference: &str) -> Result<Option<CatalogRecord>, FetchError> {
        self.fetch_raw(reference).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_json_stringifies_scalars() {
        let value = json!({
            "reference": "PE-0123",
            "owner_name": "João da Silva",
            "defermentFavorable": true,
            "countOwners": 3,
            "landrecord_river": null,
        });

        let record = record_from_json(&value).unwrap();
        assert_eq!(record.get("reference"), Some("PE-0123"));
        assert_eq!(record.get("owner_name"), Some("João da Silva"));
        assert_eq!(record.get("defermentFavorable"), Some("true"));
        assert_eq!(record.get("countOwners"), Some("3"));
        assert_eq!(record.get("landrecord_river"), None);
    }

    #[test]
    fn test_record_from_json_rejects_non_objects() {
        assert!(record_from_json(&json!("just a string")).is_none());
        assert!(record_from_json(&json!([1, 2, 3])).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_http_error() {
        let fetcher = SilbFetcher::new("http://127.0.0.1:9/api/get/tabela");
        let result = fetcher.fetch_raw("PE-0123").await;
        assert!(matches!(result, Err(FetchError::Http(_))));
    }
}
