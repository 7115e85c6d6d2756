//! Revisor Domain Layer
//!
//! Core domain model for the sesmaria catalog-revision pipeline. This crate
//! is deliberately dependency-light: it defines the canonical field set, the
//! raw-source field mapping, the persisted record types, and the trait
//! boundaries that infrastructure crates implement.
//!
//! ## Key Concepts
//!
//! - **CatalogRecord**: the raw key/value metadata fetched for one document
//!   reference, exactly as the external catalog returned it
//! - **CanonicalField**: the closed set of domain attributes every other
//!   component speaks in
//! - **NormalizedRecord**: a CatalogRecord translated into canonical fields,
//!   with "not cataloged" sentinels removed
//! - **ErrorRecord**: one persisted discrepancy, open until the judge pass
//!   adjudicates it
//! - **Judgment**: the outcome of adjudicating one ErrorRecord, with a
//!   confidence score
//!
//! ## Architecture
//!
//! Infrastructure implementations (HTTP fetcher, LLM gateway, SQLite store,
//! document cache) live in sibling crates and plug in through the traits in
//! [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod erro;
pub mod field;
pub mod judgment;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use erro::{ErrorRecord, RecordId};
pub use field::{CanonicalField, SYSTEM_FIELD};
pub use judgment::Judgment;
pub use record::{CatalogRecord, NormalizedRecord};
pub use traits::{Generation, JudgmentOutcome};
