//! Canonicalization engine: load evidence, rank, merge, upsert
//!
//! The canonical record is a pure function of the evidence set for its key
//! plus the ranking configuration; re-running on an unchanged set writes a
//! byte-for-byte identical payload. A run that fails leaves the previous
//! canonical row untouched and is retried by simply invoking the engine
//! again for the key.

use chrono::Utc;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};

use crate::canonical::key_lock::KeyLocks;
use crate::canonical::merge;
use crate::canonical::ranking::{self, SourcePriorities};
use crate::db;
use crate::models::{CanonicalRecord, Product, ProductKey};

/// The merge step could not complete (store unavailable, corrupt row).
///
/// Evidence durability is decoupled from canonical freshness: this error
/// never implies a rolled-back evidence insert.
#[derive(Debug, Error)]
#[error("canonicalization failed for {key}: {source}")]
pub struct CanonicalizationFailure {
    pub key: ProductKey,
    #[source]
    pub source: pkh_common::Error,
}

/// Re-derive the canonical view for one product key
///
/// Returns `None` when the key has no evidence (nothing to derive).
/// Holds the key's lock across the whole read-merge-write window so two
/// runs for the same key can never interleave.
pub async fn canonicalize(
    pool: &SqlitePool,
    locks: &KeyLocks,
    priorities: &SourcePriorities,
    key: &ProductKey,
) -> Result<Option<CanonicalRecord>, CanonicalizationFailure> {
    let _guard = locks.acquire(key).await;

    let fail = |source| CanonicalizationFailure {
        key: key.clone(),
        source,
    };

    let records = db::evidence::load_for_key(pool, key).await.map_err(fail)?;
    if records.is_empty() {
        debug!(key = %key, "no evidence for key, nothing to canonicalize");
        return Ok(None);
    }

    let evidence_count = records.len();
    let ordered = ranking::rank(records, priorities);

    let payloads: Vec<&Product> = ordered.iter().map(|r| &r.payload).collect();
    let merged = merge::merge_payloads(&payloads);

    let canonical_product_name = merged.product_name.clone();
    // Language preference follows the top-ranked record overall, not per-field
    let language_code_preferred = ordered[0].language_code.clone();

    let record = db::canonical::upsert_canonical(
        pool,
        key,
        &canonical_product_name,
        &language_code_preferred,
        &merged,
        Utc::now(),
    )
    .await
    .map_err(fail)?;

    info!(
        key = %key,
        evidence_count,
        canonical_product_name = %record.canonical_product_name,
        "canonical view refreshed"
    );

    Ok(Some(record))
}
