//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in the sibling crates
//! (revisor-catalog, revisor-llm, revisor-store, revisor-judge).

use crate::erro::{ErrorRecord, RecordId};
use crate::judgment::Judgment;
use crate::record::CatalogRecord;
use core::future::Future;

/// One completion from the text-generation capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// The generated text.
    pub text: String,
    /// Usage metric reported by the capability.
    pub tokens_used: u32,
}

/// Result of asking the store to record a judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgmentOutcome {
    /// The record was open; the judgment was written and the record is now
    /// judged.
    Recorded,
    /// The record had already been judged; nothing was written.
    AlreadyJudged,
}

/// Source of raw catalog records, queried by reference.
///
/// Implemented by the infrastructure layer (revisor-catalog). Returns at
/// most one record per reference.
pub trait CatalogSource {
    /// Error type for fetch operations.
    type Error;

    /// Fetch the raw catalog record for a reference, if one exists.
    fn fetch(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<Option<CatalogRecord>, Self::Error>> + Send;
}

/// The text-generation capability.
///
/// Opaque, possibly failing, rate- and cost-bounded externally. This core
/// never retries a failed generation.
pub trait TextGenerator {
    /// Error type for generation operations.
    type Error;

    /// Generate text from a system role text and a user role text.
    fn generate(
        &self,
        system: &str,
        user: &str,
    ) -> impl Future<Output = Result<Generation, Self::Error>> + Send;
}

/// Lookup of original document text by reference.
///
/// Consumed by the judge pass. A missing document is not an error: the
/// record simply stays open.
pub trait DocumentCache {
    /// Error type for cache operations.
    type Error;

    /// Full plain text of the original document, or `None` when absent.
    fn document_text(&self, reference: &str) -> Result<Option<String>, Self::Error>;
}

/// Persistence of error records and judgments.
///
/// Implemented by the infrastructure layer (revisor-store).
pub trait ErrorStore {
    /// Error type for store operations.
    type Error;

    /// Persist a batch of error records for one reference atomically:
    /// either all land or none do.
    fn insert_errors(
        &mut self,
        reference: &str,
        records: &[ErrorRecord],
    ) -> Result<(), Self::Error>;

    /// All open (`julgado = false`) records, oldest first.
    fn pending_errors(&self) -> Result<Vec<ErrorRecord>, Self::Error>;

    /// All records for one reference, oldest first.
    fn errors_for_reference(&self, reference: &str) -> Result<Vec<ErrorRecord>, Self::Error>;

    /// Perform the open→judged transition for the judgment's error record.
    ///
    /// Idempotent: when the record is already judged, nothing is written
    /// and [`JudgmentOutcome::AlreadyJudged`] is returned. Otherwise the
    /// judgment row is created, the record's `julgado` flag is set and its
    /// `resposta_correta` is overwritten with the adjudicated value, all in
    /// one transaction.
    fn record_judgment(&mut self, judgment: &Judgment) -> Result<JudgmentOutcome, Self::Error>;

    /// Judgments recorded for one error record.
    fn judgments_for_error(&self, erro_id: RecordId) -> Result<Vec<Judgment>, Self::Error>;
}
