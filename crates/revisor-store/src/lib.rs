//! Revisor Storage Layer
//!
//! Implements the [`ErrorStore`] trait over SQLite.
//!
//! # Architecture
//!
//! - `catalogacao_erros` holds one row per discrepancy, open until judged
//! - `julgamentos` holds one row per adjudication outcome
//! - batch inserts are transactional per reference: all rows for one
//!   document land together or none do
//! - the open→judged transition is idempotent inside one transaction
//!
//! # Examples
//!
//! ```no_run
//! use revisor_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for error-record operations
//! ```

#![warn(missing_docs)]

use revisor_domain::traits::ErrorStore;
use revisor_domain::{ErrorRecord, Judgment, JudgmentOutcome, RecordId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record not found
    #[error("record not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-backed implementation of [`ErrorStore`].
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// `SqliteStore` instance (or the store should sit behind a mutex, as the
/// pipeline does).
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path.
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Convert a RecordId to bytes for storage.
    fn id_to_bytes(id: RecordId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes back to a RecordId.
    fn bytes_to_id(bytes: &[u8]) -> Result<RecordId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "expected 16 bytes for id, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(RecordId::from_value(u128::from_be_bytes(arr)))
    }

    fn row_to_error(row: &Row<'_>) -> rusqlite::Result<ErrorRecord> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let erro_positivo: Option<i64> = row.get(9)?;

        Ok(ErrorRecord {
            id,
            reference: row.get(1)?,
            campo: row.get(2)?,
            conteudo_errado: row.get(3)?,
            resposta_correta: row.get(4)?,
            motivo: row.get(5)?,
            data_registro: row.get::<_, i64>(6)? as u64,
            julgado: row.get(7)?,
            prompt_name: row.get(8)?,
            erro_positivo: erro_positivo.map(|v| v != 0),
        })
    }

    fn row_to_judgment(row: &Row<'_>) -> rusqlite::Result<Judgment> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let erro_bytes: Vec<u8> = row.get(1)?;
        let id = Self::bytes_to_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;
        let erro_id = Self::bytes_to_id(&erro_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        Ok(Judgment {
            id,
            erro_id,
            reference: row.get(2)?,
            resultado_analise: row.get(3)?,
            resposta_correta: row.get(4)?,
            grau_certeza: row.get(5)?,
            data_julgamento: row.get::<_, i64>(6)? as u64,
        })
    }

    fn select_errors(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<ErrorRecord>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let records = stmt
            .query_map(args, Self::row_to_error)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

const ERROR_COLUMNS: &str = "id, reference, campo, conteudo_errado, resposta_correta, motivo, \
     data_registro, julgado, prompt_name, erro_positivo";

impl ErrorStore for SqliteStore {
    type Error = StoreError;

    fn insert_errors(
        &mut self,
        reference: &str,
        records: &[ErrorRecord],
    ) -> Result<(), Self::Error> {
        let tx = self.conn.transaction()?;

        for record in records {
            tx.execute(
                "INSERT INTO catalogacao_erros \
                 (id, reference, campo, conteudo_errado, resposta_correta, motivo, \
                  data_registro, julgado, prompt_name, erro_positivo) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    &Self::id_to_bytes(record.id),
                    reference,
                    &record.campo,
                    &record.conteudo_errado,
                    &record.resposta_correta,
                    &record.motivo,
                    record.data_registro as i64,
                    record.julgado,
                    &record.prompt_name,
                    record.erro_positivo.map(|v| v as i64),
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn pending_errors(&self) -> Result<Vec<ErrorRecord>, Self::Error> {
        self.select_errors(
            &format!(
                "SELECT {} FROM catalogacao_erros WHERE julgado = 0 \
                 ORDER BY data_registro, id",
                ERROR_COLUMNS
            ),
            &[],
        )
    }

    fn errors_for_reference(&self, reference: &str) -> Result<Vec<ErrorRecord>, Self::Error> {
        self.select_errors(
            &format!(
                "SELECT {} FROM catalogacao_erros WHERE reference = ?1 \
                 ORDER BY data_registro, id",
                ERROR_COLUMNS
            ),
            &[&reference],
        )
    }

    fn record_judgment(&mut self, judgment: &Judgment) -> Result<JudgmentOutcome, Self::Error> {
        let tx = self.conn.transaction()?;
        let erro_bytes = Self::id_to_bytes(judgment.erro_id);

        let julgado: Option<bool> = tx
            .query_row(
                "SELECT julgado FROM catalogacao_erros WHERE id = ?1",
                params![&erro_bytes],
                |row| row.get(0),
            )
            .optional()?;

        let julgado = match julgado {
            Some(j) => j,
            None => return Err(StoreError::NotFound(judgment.erro_id.to_string())),
        };

        if julgado {
            // Idempotent no-op: the record was already adjudicated.
            return Ok(JudgmentOutcome::AlreadyJudged);
        }

        tx.execute(
            "INSERT INTO julgamentos \
             (id, erro_id, reference, resultado_analise, resposta_correta, \
              grau_certeza, data_julgamento) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &Self::id_to_bytes(judgment.id),
                &erro_bytes,
                &judgment.reference,
                &judgment.resultado_analise,
                &judgment.resposta_correta,
                judgment.grau_certeza,
                judgment.data_julgamento as i64,
            ],
        )?;

        tx.execute(
            "UPDATE catalogacao_erros SET julgado = 1, resposta_correta = ?2 WHERE id = ?1",
            params![&erro_bytes, &judgment.resposta_correta],
        )?;

        tx.commit()?;
        Ok(JudgmentOutcome::Recorded)
    }

    fn judgments_for_error(&self, erro_id: RecordId) -> Result<Vec<Judgment>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, erro_id, reference, resultado_analise, resposta_correta, \
             grau_certeza, data_julgamento \
             FROM julgamentos WHERE erro_id = ?1 ORDER BY data_julgamento, id",
        )?;
        let judgments = stmt
            .query_map(params![&Self::id_to_bytes(erro_id)], Self::row_to_judgment)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(judgments)
    }
}
