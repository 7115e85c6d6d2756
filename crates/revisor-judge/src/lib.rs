//! Revisor Judge Layer
//!
//! The second-pass adjudicator. For every open error record it reconstructs
//! context from the original document text, re-prompts the generation
//! capability to confirm or revise the suggested correction, and records a
//! judgment with a confidence score, flipping the record to judged.
//!
//! The batch is resilient, not atomic: one record's failure (missing
//! document, generation failure, malformed verdict, store error) is logged
//! and the sweep continues with the next record.

pub mod cache;
pub mod prompt;
pub mod verdict;

use revisor_analysis::strategy::truncate_chars;
use revisor_domain::traits::{DocumentCache, ErrorStore, TextGenerator};
use revisor_domain::{ErrorRecord, Judgment, JudgmentOutcome};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub use cache::{FsDocumentCache, MemoryCache};
pub use prompt::{judgment_prompt, JUDGE_SYSTEM_PROMPT};
pub use verdict::{parse_verdict, Verdict};

/// Errors that can occur while adjudicating one record.
#[derive(Error, Debug)]
pub enum JudgeError {
    /// Document cache lookup failed (distinct from a missing document)
    #[error("document cache error: {0}")]
    Cache(String),

    /// The generation capability failed
    #[error("generation failed: {0}")]
    Generation(String),

    /// The verdict did not match the required contract
    #[error("verdict format error: {0}")]
    Format(String),

    /// Reading or writing the store failed
    #[error("store error: {0}")]
    Store(String),
}

/// Configuration for the judge pass.
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Maximum document characters embedded in a re-evaluation prompt.
    pub max_document_chars: usize,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            max_document_chars: 20_000,
        }
    }
}

/// Counts from one adjudication sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JudgeSummary {
    /// Records adjudicated in this sweep.
    pub judged: usize,
    /// Records skipped because their document was not cached.
    pub skipped: usize,
    /// Records whose adjudication failed; they remain open.
    pub failed: usize,
    /// Records another sweep had already adjudicated.
    pub already_judged: usize,
}

enum RecordOutcome {
    Judged,
    AlreadyJudged,
    Skipped,
}

/// The adjudicator: sweeps all open error records once.
pub struct Judge<G, S, D>
where
    G: TextGenerator,
    S: ErrorStore,
    D: DocumentCache,
{
    gateway: G,
    store: Arc<Mutex<S>>,
    cache: D,
    config: JudgeConfig,
}

impl<G, S, D> Judge<G, S, D>
where
    G: TextGenerator,
    S: ErrorStore,
    D: DocumentCache,
    G::Error: std::fmt::Display,
    S::Error: std::fmt::Display,
    D::Error: std::fmt::Display,
{
    /// Create a judge.
    pub fn new(gateway: G, store: S, cache: D, config: JudgeConfig) -> Self {
        Self {
            gateway,
            store: Arc::new(Mutex::new(store)),
            cache,
            config,
        }
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// Adjudicate every open record once, one at a time.
    ///
    /// Only a failure to list the pending backlog aborts the sweep;
    /// per-record failures are logged and counted.
    pub async fn judge_pending(&self) -> Result<JudgeSummary, JudgeError> {
        let pending = {
            let store = self
                .store
                .lock()
                .map_err(|e| JudgeError::Store(format!("store lock poisoned: {}", e)))?;
            store
                .pending_errors()
                .map_err(|e| JudgeError::Store(e.to_string()))?
        };

        let mut summary = JudgeSummary::default();
        if pending.is_empty() {
            info!("no open records to judge");
            return Ok(summary);
        }
        info!(count = pending.len(), "starting judgment sweep");

        for erro in &pending {
            match self.judge_one(erro).await {
                Ok(RecordOutcome::Judged) => summary.judged += 1,
                Ok(RecordOutcome::Skipped) => summary.skipped += 1,
                Ok(RecordOutcome::AlreadyJudged) => summary.already_judged += 1,
                Err(e) => {
                    error!(erro = %erro.id, reference = %erro.reference, error = %e,
                        "failed to judge record");
                    summary.failed += 1;
                }
            }
        }

        info!(
            judged = summary.judged,
            skipped = summary.skipped,
            failed = summary.failed,
            "judgment sweep complete"
        );
        Ok(summary)
    }

    async fn judge_one(&self, erro: &ErrorRecord) -> Result<RecordOutcome, JudgeError> {
        let texto = self
            .cache
            .document_text(&erro.reference)
            .map_err(|e| JudgeError::Cache(e.to_string()))?;
        let texto = match texto {
            Some(texto) => texto,
            None => {
                warn!(reference = %erro.reference, "document not cached; record stays open");
                return Ok(RecordOutcome::Skipped);
            }
        };

        let excerpt = truncate_chars(&texto, self.config.max_document_chars);
        let prompt = judgment_prompt(erro, excerpt);
        let generation = self
            .gateway
            .generate(JUDGE_SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|e| JudgeError::Generation(e.to_string()))?;

        let verdict = parse_verdict(&generation.text)?;
        if let Some(correcao) = verdict.correcao_necessaria {
            debug!(erro = %erro.id, correcao_necessaria = correcao, "judge verdict flag");
        }

        let judgment = Judgment::new(
            erro.id,
            &erro.reference,
            verdict.analise,
            verdict.valor_correto_final,
            verdict.grau_certeza,
            unix_now(),
        );

        let outcome = {
            let mut store = self
                .store
                .lock()
                .map_err(|e| JudgeError::Store(format!("store lock poisoned: {}", e)))?;
            store
                .record_judgment(&judgment)
                .map_err(|e| JudgeError::Store(e.to_string()))?
        };

        Ok(match outcome {
            JudgmentOutcome::Recorded => RecordOutcome::Judged,
            JudgmentOutcome::AlreadyJudged => RecordOutcome::AlreadyJudged,
        })
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
    use revisor_llm::MockGateway;
    use revisor_store::SqliteStore;

    fn open_error(reference: &str, registered_at: u64) -> ErrorRecord {
        ErrorRecord::new(
            reference,
            "owner_name",
            "João Silva",
            Some("João da Silva".to_string()),
            "preposição ausente",
            Some("rules".to_string()),
            registered_at,
        )
    }

    fn verdict_json() -> &'static str {
        r#"{"analise": "a carta confirma a correção",
            "valor_correto_final": "João da Silva",
            "grau_certeza": 0.95,
            "correcao_necessaria": true}"#
    }

    fn judge_with(
        gateway: MockGateway,
        store: SqliteStore,
        cache: MemoryCache,
    ) -> Judge<MockGateway, SqliteStore, MemoryCache> {
        Judge::new(gateway, store, cache, JudgeConfig::default())
    }

    #[tokio::test]
    async fn test_missing_document_skips_record_without_aborting_batch() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        store
            .insert_errors("PE-0123", &[open_error("PE-0123", 1000)])
            .unwrap();
        store
            .insert_errors("PE-0456", &[open_error("PE-0456", 2000)])
            .unwrap();

        // Only the second document is cached.
        let mut cache = MemoryCache::new();
        cache.insert("PE-0456", "texto da carta");

        let judge = judge_with(MockGateway::new(verdict_json()), store, cache);
        let summary = judge.judge_pending().await.unwrap();

        assert_eq!(summary.judged, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);

        let store = judge.store();
        let store = store.lock().unwrap();
        let uncached = store.errors_for_reference("PE-0123").unwrap();
        assert!(!uncached[0].julgado, "uncached record must stay open");
        let judged = store.errors_for_reference("PE-0456").unwrap();
        assert!(judged[0].julgado);
        assert_eq!(judged[0].resposta_correta.as_deref(), Some("João da Silva"));
        assert_eq!(store.judgments_for_error(judged[0].id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_sweep_does_not_reprocess_judged_records() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let record = open_error("PE-0123", 1000);
        store.insert_errors("PE-0123", &[record.clone()]).unwrap();

        let mut cache = MemoryCache::new();
        cache.insert("PE-0123", "texto");

        let gateway = MockGateway::new(verdict_json());
        let judge = judge_with(gateway.clone(), store, cache);

        let first = judge.judge_pending().await.unwrap();
        assert_eq!(first.judged, 1);
        assert_eq!(gateway.call_count(), 1);

        // The record is judged now, so the backlog is empty: no new
        // generation call and no duplicate judgment.
        let second = judge.judge_pending().await.unwrap();
        assert_eq!(second, JudgeSummary::default());
        assert_eq!(gateway.call_count(), 1);

        let store = judge.store();
        let store = store.lock().unwrap();
        assert_eq!(store.judgments_for_error(record.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_record_open_and_continues() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let failing = open_error("PE-0123", 1000);
        let healthy = open_error("PE-0456", 2000);
        store.insert_errors("PE-0123", &[failing.clone()]).unwrap();
        store.insert_errors("PE-0456", &[healthy.clone()]).unwrap();

        let mut cache = MemoryCache::new();
        cache.insert("PE-0123", "texto um");
        cache.insert("PE-0456", "texto dois");

        let mut gateway = MockGateway::new(verdict_json());
        gateway.add_error(&judgment_prompt(&failing, "texto um"));

        let judge = judge_with(gateway, store, cache);
        let summary = judge.judge_pending().await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.judged, 1);

        let store = judge.store();
        let store = store.lock().unwrap();
        assert!(!store.errors_for_reference("PE-0123").unwrap()[0].julgado);
        assert!(store.errors_for_reference("PE-0456").unwrap()[0].julgado);
    }

    #[tokio::test]
    async fn test_malformed_verdict_counts_as_failure() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        store
            .insert_errors("PE-0123", &[open_error("PE-0123", 1000)])
            .unwrap();

        let mut cache = MemoryCache::new();
        cache.insert("PE-0123", "texto");

        let judge = judge_with(MockGateway::new("não sei avaliar"), store, cache);
        let summary = judge.judge_pending().await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.judged, 0);

        let store = judge.store();
        let store = store.lock().unwrap();
        let records = store.errors_for_reference("PE-0123").unwrap();
        assert!(!records[0].julgado);
        assert!(store.judgments_for_error(records[0].id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_omitted_certainty_defaults() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let record = open_error("PE-0123", 1000);
        store.insert_errors("PE-0123", &[record.clone()]).unwrap();

        let mut cache = MemoryCache::new();
        cache.insert("PE-0123", "texto");

        let judge = judge_with(
            MockGateway::new(r#"{"analise": "ok", "valor_correto_final": "João da Silva"}"#),
            store,
            cache,
        );
        judge.judge_pending().await.unwrap();

        let store = judge.store();
        let store = store.lock().unwrap();
        let judgments = store.judgments_for_error(record.id).unwrap();
        assert_eq!(judgments[0].grau_certeza, verdict::DEFAULT_CERTAINTY);
    }

    #[tokio::test]
    async fn test_empty_backlog_is_a_quiet_noop() {
        let store = SqliteStore::new(":memory:").unwrap();
        let gateway = MockGateway::new(verdict_json());
        let judge = judge_with(gateway.clone(), store, MemoryCache::new());

        let summary = judge.judge_pending().await.unwrap();
        assert_eq!(summary, JudgeSummary::default());
        assert_eq!(gateway.call_count(), 0);
    }
}
