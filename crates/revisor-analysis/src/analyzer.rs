//! The per-document analysis orchestrator

use crate::config::AnalysisConfig;
use crate::datecmp::is_same_date;
use crate::error::AnalysisError;
use crate::parser::parse_discrepancies;
use crate::strategy::{truncate_chars, PromptStrategy, ANALYST_SYSTEM_PROMPT};
use crate::types::AnalysisReport;
use revisor_catalog::normalize;
use revisor_domain::traits::{CatalogSource, ErrorStore, TextGenerator};
use revisor_domain::{CanonicalField, ErrorRecord};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error, info, warn};

/// Sequences the full comparison pipeline for one document reference.
///
/// The pipeline is a single sequential flow (fetch, normalize, render,
/// generate, parse, persist) that suspends only while awaiting the catalog
/// and the generation capability. Every failure is caught once at the
/// [`Analyzer::analyze`] boundary and converted into a persisted
/// `"sistema"` record plus an error-status report; this type never raises
/// past that boundary.
pub struct Analyzer<C, G, S>
where
    C: CatalogSource,
    G: TextGenerator,
    S: ErrorStore,
{
    catalog: C,
    gateway: G,
    store: Arc<Mutex<S>>,
    config: AnalysisConfig,
}

impl<C, G, S> Analyzer<C, G, S>
where
    C: CatalogSource,
    G: TextGenerator,
    S: ErrorStore,
    C::Error: std::fmt::Display,
    G::Error: std::fmt::Display,
    S::Error: std::fmt::Display,
{
    /// Create an analyzer.
    pub fn new(catalog: C, gateway: G, store: S, config: AnalysisConfig) -> Self {
        Self {
            catalog,
            gateway,
            store: Arc::new(Mutex::new(store)),
            config,
        }
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// Analyze one document: compare its catalog record against the
    /// document text and persist every confirmed discrepancy as an open
    /// error record.
    ///
    /// Always returns a report. On failure the report carries
    /// `status = error` and exactly one synthetic `"sistema"` record is
    /// persisted for the reference.
    pub async fn analyze(
        &self,
        reference: &str,
        document_text: &str,
        strategy_key: &str,
    ) -> AnalysisReport {
        match self.run(reference, document_text, strategy_key).await {
            Ok(report) => report,
            Err(e) => {
                error!(reference, error = %e, "analysis failed");
                self.persist_system_record(reference, &e);
                AnalysisReport::error(reference, e.to_string())
            }
        }
    }

    async fn run(
        &self,
        reference: &str,
        document_text: &str,
        strategy_key: &str,
    ) -> Result<AnalysisReport, AnalysisError> {
        // 1. Fetch the raw catalog record.
        let raw = self
            .catalog
            .fetch(reference)
            .await
            .map_err(|e| AnalysisError::Fetch(e.to_string()))?
            .ok_or_else(|| AnalysisError::CatalogMissing(reference.to_string()))?;

        // 2. Normalize; without catalog data there is nothing to compare.
        let record = normalize(&raw);
        if !record.has_data() {
            return Err(AnalysisError::EmptyNormalization(reference.to_string()));
        }
        debug!(reference, fields = record.len(), "record normalized");

        // 3. Resolve the strategy from the closed registry.
        let strategy: PromptStrategy = strategy_key.parse()?;

        // 4. Render and generate.
        let excerpt = truncate_chars(document_text, self.config.max_document_chars);
        let prompt = strategy.render(reference, &record, excerpt);
        let generation = self
            .gateway
            .generate(ANALYST_SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|e| AnalysisError::Generation(e.to_string()))?;
        debug!(
            reference,
            tokens = generation.tokens_used,
            "generation complete"
        );

        // 5. Parse the response.
        let parsed = parse_discrepancies(&generation.text)?;
        if parsed.rejected > 0 {
            warn!(
                reference,
                rejected = parsed.rejected,
                "response contained malformed discrepancy elements"
            );
        }

        // 6. Keep only candidates whose field resolves into the canonical
        //    set; apply the optional date-equivalence post-filter.
        let mut candidates = parsed.candidates;
        candidates.retain(|c| {
            if CanonicalField::parse(&c.campo).is_some() {
                true
            } else {
                warn!(reference, campo = %c.campo, "dropping discrepancy for unknown field");
                false
            }
        });
        if self.config.suppress_equivalent_dates {
            candidates.retain(|c| {
                let date_field = CanonicalField::parse(&c.campo)
                    .map(|f| f.is_date())
                    .unwrap_or(false);
                if date_field && is_same_date(&c.valor_incorreto, &c.valor_correto) {
                    debug!(reference, campo = %c.campo, "suppressing formatting-only date divergence");
                    false
                } else {
                    true
                }
            });
        }

        // 7. Persist the batch atomically for this reference.
        let now = unix_now();
        let records: Vec<ErrorRecord> = candidates
            .iter()
            .map(|c| {
                ErrorRecord::new(
                    reference,
                    &c.campo,
                    &c.valor_incorreto,
                    Some(c.valor_correto.clone()),
                    &c.motivo,
                    Some(strategy.key().to_string()),
                    now,
                )
            })
            .collect();
        if !records.is_empty() {
            let mut store = self
                .store
                .lock()
                .map_err(|e| AnalysisError::Persistence(format!("store lock poisoned: {}", e)))?;
            store
                .insert_errors(reference, &records)
                .map_err(|e| AnalysisError::Persistence(e.to_string()))?;
        }

        info!(
            reference,
            discrepancies = candidates.len(),
            strategy = strategy.key(),
            "analysis complete"
        );
        Ok(AnalysisReport::success(reference, candidates))
    }

    /// Persist the single synthetic record describing a pipeline failure.
    /// A failure here is logged and swallowed: the caller still gets its
    /// error report.
    fn persist_system_record(&self, reference: &str, cause: &AnalysisError) {
        let record = ErrorRecord::system(
            reference,
            format!("Erro na análise: {}", cause),
            unix_now(),
        );
        match self.store.lock() {
            Ok(mut store) => {
                if let Err(e) = store.insert_errors(reference, &[record]) {
                    error!(reference, error = %e, "failed to persist system record");
                }
            }
            Err(e) => error!(reference, error = %e, "store lock poisoned"),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalysisStatus;
    use revisor_domain::field::SYSTEM_FIELD;
    use revisor_domain::CatalogRecord;
    use revisor_llm::MockGateway;
    use revisor_store::SqliteStore;

    /// Catalog stub answering from a fixed record.
    struct StaticCatalog {
        record: Option<CatalogRecord>,
        fail: bool,
    }

    impl StaticCatalog {
        fn with(record: CatalogRecord) -> Self {
            Self {
                record: Some(record),
                fail: false,
            }
        }

        fn empty() -> Self {
            Self {
                record: None,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                record: None,
                fail: true,
            }
        }
    }

    impl CatalogSource for StaticCatalog {
        type Error = String;

        async fn fetch(&self, _reference: &str) -> Result<Option<CatalogRecord>, String> {
            if self.fail {
                Err("connection refused".to_string())
            } else {
                Ok(self.record.clone())
            }
        }
    }

    fn scenario_record() -> CatalogRecord {
        CatalogRecord::from_pairs([
            ("reference", "PE-0123"),
            ("owner_name", "João Silva"),
            ("dateConcession", "20-03-1733"),
            ("captaincy_name", "Pernambuco"),
        ])
    }

    fn scenario_response() -> String {
        r#"```json
{
    "erros": [
        {
            "campo": "owner_name",
            "valor_incorreto": "João Silva",
            "valor_correto": "João da Silva",
            "motivo": "O texto original menciona 'João da Silva'"
        },
        {
            "campo": "dateConcession",
            "valor_incorreto": "20-03-1733",
            "valor_correto": "20-03-1732",
            "motivo": "O texto original indica o ano de 1732"
        }
    ]
}
```"#
            .to_string()
    }

    fn analyzer_with(
        catalog: StaticCatalog,
        gateway: MockGateway,
        config: AnalysisConfig,
    ) -> Analyzer<StaticCatalog, MockGateway, SqliteStore> {
        let store = SqliteStore::new(":memory:").unwrap();
        Analyzer::new(catalog, gateway, store, config)
    }

    #[tokio::test]
    async fn test_discrepancies_are_reported_and_persisted() {
        let analyzer = analyzer_with(
            StaticCatalog::with(scenario_record()),
            MockGateway::new(scenario_response()),
            AnalysisConfig::default(),
        );

        let report = analyzer
            .analyze("PE-0123", "...João da Silva... 1732...", "rules")
            .await;

        assert_eq!(report.status, AnalysisStatus::Success);
        assert_eq!(report.erros_identificados.len(), 2);
        assert_eq!(report.erros_identificados[0].campo, "owner_name");
        assert_eq!(report.erros_identificados[1].campo, "dateConcession");
        assert!(report
            .erros_identificados
            .iter()
            .all(|c| c.campo != "captaincy_name"));

        let store = analyzer.store();
        let store = store.lock().unwrap();
        let persisted = store.errors_for_reference("PE-0123").unwrap();
        assert_eq!(persisted.len(), 2);
        assert!(persisted.iter().all(|r| !r.julgado));
        assert!(persisted
            .iter()
            .all(|r| r.prompt_name.as_deref() == Some("rules")));
    }

    #[tokio::test]
    async fn test_missing_catalog_record_yields_one_system_record() {
        let analyzer = analyzer_with(
            StaticCatalog::empty(),
            MockGateway::default(),
            AnalysisConfig::default(),
        );

        let report = analyzer.analyze("PE-0123", "texto", "rules").await;

        assert_eq!(report.status, AnalysisStatus::Error);
        assert!(report.erros_identificados.is_empty());
        assert!(report.message.is_some());

        let store = analyzer.store();
        let store = store.lock().unwrap();
        let persisted = store.errors_for_reference("PE-0123").unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].campo, SYSTEM_FIELD);
        assert_eq!(persisted[0].conteudo_errado, "N/A");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_caught_at_the_boundary() {
        let analyzer = analyzer_with(
            StaticCatalog::failing(),
            MockGateway::default(),
            AnalysisConfig::default(),
        );

        let report = analyzer.analyze("PE-0123", "texto", "rules").await;
        assert_eq!(report.status, AnalysisStatus::Error);

        let store = analyzer.store();
        let store = store.lock().unwrap();
        assert_eq!(store.errors_for_reference("PE-0123").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_strategy_is_fatal() {
        let analyzer = analyzer_with(
            StaticCatalog::with(scenario_record()),
            MockGateway::default(),
            AnalysisConfig::default(),
        );

        let report = analyzer.analyze("PE-0123", "texto", "prompt_99").await;
        assert_eq!(report.status, AnalysisStatus::Error);

        let store = analyzer.store();
        let store = store.lock().unwrap();
        let persisted = store.errors_for_reference("PE-0123").unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].campo, SYSTEM_FIELD);
    }

    #[tokio::test]
    async fn test_record_with_only_sentinels_is_fatal() {
        let record = CatalogRecord::from_pairs([
            ("reference", "PE-0123"),
            ("owner_name", "NC"),
            ("captaincy_name", ""),
        ]);
        let analyzer = analyzer_with(
            StaticCatalog::with(record),
            MockGateway::default(),
            AnalysisConfig::default(),
        );

        let report = analyzer.analyze("PE-0123", "texto", "rules").await;
        assert_eq!(report.status, AnalysisStatus::Error);
    }

    #[tokio::test]
    async fn test_unparseable_response_yields_system_record() {
        let analyzer = analyzer_with(
            StaticCatalog::with(scenario_record()),
            MockGateway::new("A carta parece correta."),
            AnalysisConfig::default(),
        );

        let report = analyzer.analyze("PE-0123", "texto", "rules").await;
        assert_eq!(report.status, AnalysisStatus::Error);

        let store = analyzer.store();
        let store = store.lock().unwrap();
        let persisted = store.errors_for_reference("PE-0123").unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].campo, SYSTEM_FIELD);
    }

    #[tokio::test]
    async fn test_unknown_field_candidates_are_dropped() {
        let response = r#"{
            "erros": [
                {"campo": "owner_name", "valor_incorreto": "a",
                 "valor_correto": "b", "motivo": "m"},
                {"campo": "campo_inventado", "valor_incorreto": "a",
                 "valor_correto": "b", "motivo": "m"}
            ]
        }"#;
        let analyzer = analyzer_with(
            StaticCatalog::with(scenario_record()),
            MockGateway::new(response),
            AnalysisConfig::default(),
        );

        let report = analyzer.analyze("PE-0123", "texto", "rules").await;
        assert_eq!(report.status, AnalysisStatus::Success);
        assert_eq!(report.erros_identificados.len(), 1);
        assert_eq!(report.erros_identificados[0].campo, "owner_name");
    }

    #[tokio::test]
    async fn test_date_suppression_drops_formatting_only_divergence() {
        let response = r#"{
            "erros": [
                {"campo": "dateConcession", "valor_incorreto": "20-03-1732",
                 "valor_correto": "1732-03-20", "motivo": "formato"},
                {"campo": "dateConcession", "valor_incorreto": "20-03-1733",
                 "valor_correto": "20-03-1732", "motivo": "ano divergente"}
            ]
        }"#;
        let config = AnalysisConfig {
            suppress_equivalent_dates: true,
            ..AnalysisConfig::default()
        };
        let analyzer = analyzer_with(
            StaticCatalog::with(scenario_record()),
            MockGateway::new(response),
            config,
        );

        let report = analyzer.analyze("PE-0123", "texto", "rules").await;
        assert_eq!(report.erros_identificados.len(), 1);
        assert_eq!(report.erros_identificados[0].motivo, "ano divergente");
    }

    #[tokio::test]
    async fn test_empty_erros_persists_nothing() {
        let analyzer = analyzer_with(
            StaticCatalog::with(scenario_record()),
            MockGateway::default(),
            AnalysisConfig::default(),
        );

        let report = analyzer.analyze("PE-0123", "texto", "exemplar").await;
        assert_eq!(report.status, AnalysisStatus::Success);
        assert!(report.erros_identificados.is_empty());

        let store = analyzer.store();
        let store = store.lock().unwrap();
        assert!(store.errors_for_reference("PE-0123").unwrap().is_empty());
    }
}
