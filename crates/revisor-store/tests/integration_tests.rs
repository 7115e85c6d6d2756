//! Integration tests for revisor-store
//!
//! These tests verify the full error-record lifecycle: transactional batch
//! insert, pending queries, and the idempotent open→judged transition.

use revisor_domain::traits::ErrorStore;
use revisor_domain::{ErrorRecord, Judgment, JudgmentOutcome};
use revisor_store::{SqliteStore, StoreError};

fn sample_error(reference: &str, campo: &str, registered_at: u64) -> ErrorRecord {
    ErrorRecord::new(
        reference,
        campo,
        "João Silva",
        Some("João da Silva".to_string()),
        "preposição ausente na catalogação",
        Some("rules".to_string()),
        registered_at,
    )
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "store should initialize successfully");
}

#[test]
fn test_insert_and_read_back() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let record = sample_error("PE-0123", "Nome", 1000);

    store.insert_errors("PE-0123", &[record.clone()]).unwrap();

    let stored = store.errors_for_reference("PE-0123").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], record);
}

#[test]
fn test_batch_insert_is_atomic_per_reference() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let first = sample_error("PE-0123", "Nome", 1000);
    // Same id as `first`: violates the primary key mid-batch.
    let mut duplicate = sample_error("PE-0123", "Data da concessão", 1001);
    duplicate.id = first.id;

    let result = store.insert_errors("PE-0123", &[first, duplicate]);
    assert!(result.is_err(), "duplicate id should fail the batch");

    let stored = store.errors_for_reference("PE-0123").unwrap();
    assert!(
        stored.is_empty(),
        "a failing batch must leave no partial rows behind"
    );
}

#[test]
fn test_pending_errors_ordered_oldest_first() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let newer = sample_error("PE-0123", "Nome", 2000);
    let older = sample_error("PE-0456", "Localidade", 1000);
    store.insert_errors("PE-0123", &[newer]).unwrap();
    store.insert_errors("PE-0456", &[older.clone()]).unwrap();

    let pending = store.pending_errors().unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].id, older.id);
}

#[test]
fn test_judgment_transitions_record_to_judged() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let record = sample_error("PE-0123", "Nome", 1000);
    store.insert_errors("PE-0123", &[record.clone()]).unwrap();

    let judgment = Judgment::new(
        record.id,
        "PE-0123",
        "a grafia do documento confirma a correção",
        "João da Silva",
        0.95,
        2000,
    );

    let outcome = store.record_judgment(&judgment).unwrap();
    assert_eq!(outcome, JudgmentOutcome::Recorded);

    let stored = store.errors_for_reference("PE-0123").unwrap();
    assert!(stored[0].julgado, "record must be judged after the transition");
    assert_eq!(stored[0].resposta_correta.as_deref(), Some("João da Silva"));
    assert!(store.pending_errors().unwrap().is_empty());

    let judgments = store.judgments_for_error(record.id).unwrap();
    assert_eq!(judgments.len(), 1);
    assert_eq!(judgments[0].grau_certeza, 0.95);
}

#[test]
fn test_second_judgment_is_a_noop() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let record = sample_error("PE-0123", "Nome", 1000);
    store.insert_errors("PE-0123", &[record.clone()]).unwrap();

    let first = Judgment::new(record.id, "PE-0123", "análise", "João da Silva", 0.9, 2000);
    assert_eq!(
        store.record_judgment(&first).unwrap(),
        JudgmentOutcome::Recorded
    );

    let second = Judgment::new(record.id, "PE-0123", "outra análise", "Outro Valor", 0.5, 3000);
    assert_eq!(
        store.record_judgment(&second).unwrap(),
        JudgmentOutcome::AlreadyJudged
    );

    // The first judgment is untouched and no duplicate was created.
    let judgments = store.judgments_for_error(record.id).unwrap();
    assert_eq!(judgments.len(), 1);
    assert_eq!(judgments[0].resposta_correta, "João da Silva");

    let stored = store.errors_for_reference("PE-0123").unwrap();
    assert_eq!(stored[0].resposta_correta.as_deref(), Some("João da Silva"));
}

#[test]
fn test_judgment_for_unknown_record_is_not_found() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let judgment = Judgment::new(
        revisor_domain::RecordId::new(),
        "PE-0123",
        "análise",
        "valor",
        0.9,
        1000,
    );

    let result = store.record_judgment(&judgment);
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[test]
fn test_nullable_columns_round_trip() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let mut record = sample_error("PE-0123", "Nome", 1000);
    record.resposta_correta = None;
    record.prompt_name = None;
    record.erro_positivo = Some(true);

    store.insert_errors("PE-0123", &[record.clone()]).unwrap();

    let stored = store.errors_for_reference("PE-0123").unwrap();
    assert_eq!(stored[0].resposta_correta, None);
    assert_eq!(stored[0].prompt_name, None);
    assert_eq!(stored[0].erro_positivo, Some(true));
}

#[test]
fn test_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("revisor.db");

    let record = sample_error("PE-0123", "Nome", 1000);
    {
        let mut store = SqliteStore::new(&path).unwrap();
        store.insert_errors("PE-0123", &[record.clone()]).unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    let stored = store.errors_for_reference("PE-0123").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, record.id);
}
