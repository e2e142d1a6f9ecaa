//! Ingestion gateway: exactly-once acceptance of evidence documents
//!
//! Flow: validate, idempotent insert keyed by `document_id`, then a
//! synchronous canonical refresh for the document's product key. A
//! duplicate submission is a recognized no-op: the call succeeds, reports
//! `duplicate = true`, and the engine is not re-triggered (no new
//! information was introduced).
//!
//! Evidence durability and canonical freshness are decoupled: once the
//! insert commits, a canonicalization failure is reported in the outcome
//! but never rolls the evidence back.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::canonical::{self, KeyLocks, SourcePriorities};
use crate::db;
use crate::ingest::validator::{self, ValidationError};
use crate::models::{CanonicalRecord, EvidenceRecord, ProductDocument, ProductKey};

/// Ingestion failure modes surfaced to the caller
#[derive(Debug, Error)]
pub enum IngestError {
    /// Input rejected before any store mutation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Evidence insert itself failed; nothing was stored
    #[error(transparent)]
    Store(#[from] pkh_common::Error),
}

/// What one ingestion call did
#[derive(Debug)]
pub struct IngestOutcome {
    /// True when a record with this `document_id` already existed
    pub duplicate: bool,

    /// Id of the newly stored evidence record (`None` on duplicate)
    pub evidence_id: Option<Uuid>,

    pub product_key: ProductKey,

    /// Canonical view after the refresh triggered by this ingest
    pub canonical: Option<CanonicalRecord>,

    /// Set when evidence was stored but the canonical refresh failed;
    /// retriable via the engine with no other side effects
    pub canonicalization_error: Option<String>,
}

/// Ingest one evidence document
pub async fn ingest(
    pool: &SqlitePool,
    locks: &KeyLocks,
    priorities: &SourcePriorities,
    doc: ProductDocument,
) -> Result<IngestOutcome, IngestError> {
    validator::validate(&doc)?;

    let record = EvidenceRecord::from_document(doc, Utc::now());
    let document_id = record.document_id.clone();
    let key = record.product_key.clone();

    let inserted = db::evidence::insert_evidence(pool, &record).await?;

    let Some(evidence_id) = inserted else {
        info!(document_id = %document_id, key = %key, "duplicate evidence document skipped");
        return Ok(IngestOutcome {
            duplicate: true,
            evidence_id: None,
            product_key: key,
            canonical: None,
            canonicalization_error: None,
        });
    };

    info!(document_id = %document_id, key = %key, evidence_id = %evidence_id, "evidence accepted");

    // Canonical data must be observable as soon as this call returns
    match canonical::canonicalize(pool, locks, priorities, &key).await {
        Ok(canonical) => Ok(IngestOutcome {
            duplicate: false,
            evidence_id: Some(evidence_id),
            product_key: key,
            canonical,
            canonicalization_error: None,
        }),
        Err(e) => {
            warn!(document_id = %document_id, key = %key, error = %e,
                "evidence stored but canonical refresh failed");
            Ok(IngestOutcome {
                duplicate: false,
                evidence_id: Some(evidence_id),
                product_key: key,
                canonical: None,
                canonicalization_error: Some(e.to_string()),
            })
        }
    }
}
