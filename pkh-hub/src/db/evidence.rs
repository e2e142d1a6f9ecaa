//! Evidence store: append-only persistence of product documents
//!
//! One durable row per evidence document. Rows are never updated or
//! deleted; the table is the audit trail the canonical views are derived
//! from.

use pkh_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::db::{parse_timestamp, parse_uuid};
use crate::models::{EvidenceRecord, ProductKey};

/// Idempotent insert keyed by `document_id`
///
/// The insert itself is the duplicate check: `ON CONFLICT(document_id) DO
/// NOTHING` makes the store's uniqueness constraint the single source of
/// truth, with no check-then-insert race window. Returns the new row id,
/// or `None` when a record with this `document_id` already exists.
pub async fn insert_evidence(pool: &SqlitePool, record: &EvidenceRecord) -> Result<Option<Uuid>> {
    let row = sqlx::query(
        r#"
        INSERT INTO product_documents (
            id, document_id, source_type, language_code,
            manufacturer_reference, brand, product_name,
            source_document, artifacts, extracted_at, ingested_at, payload
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(document_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(record.id.to_string())
    .bind(&record.document_id)
    .bind(&record.source_type)
    .bind(&record.language_code)
    .bind(&record.product_key.manufacturer_reference)
    .bind(&record.product_key.brand)
    .bind(&record.payload.product_name)
    .bind(serde_json::to_string(&record.source_document)?)
    .bind(serde_json::to_string(&record.artifacts)?)
    .bind(record.extracted_at.map(|t| t.to_rfc3339()))
    .bind(record.ingested_at.to_rfc3339())
    .bind(serde_json::to_string(&record.payload)?)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let id: String = row.get("id");
            Ok(Some(parse_uuid(&id)?))
        }
        None => Ok(None),
    }
}

/// Load every evidence record for a product key
///
/// Order here is incidental (`document_id` for reproducible reads); the
/// ranking policy imposes the order that matters.
pub async fn load_for_key(pool: &SqlitePool, key: &ProductKey) -> Result<Vec<EvidenceRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, document_id, source_type, language_code,
               manufacturer_reference, brand,
               source_document, artifacts, extracted_at, ingested_at, payload
        FROM product_documents
        WHERE manufacturer_reference = ? AND brand = ?
        ORDER BY document_id
        "#,
    )
    .bind(&key.manufacturer_reference)
    .bind(&key.brand)
    .fetch_all(pool)
    .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let id: String = row.get("id");
        let ingested_at: String = row.get("ingested_at");
        let extracted_at: Option<String> = row.get("extracted_at");
        let source_document: String = row.get("source_document");
        let artifacts: String = row.get("artifacts");
        let payload: String = row.get("payload");

        records.push(EvidenceRecord {
            id: parse_uuid(&id)?,
            document_id: row.get("document_id"),
            product_key: ProductKey {
                manufacturer_reference: row.get("manufacturer_reference"),
                brand: row.get("brand"),
            },
            source_type: row.get("source_type"),
            language_code: row.get("language_code"),
            extracted_at: extracted_at.as_deref().map(parse_timestamp).transpose()?,
            ingested_at: parse_timestamp(&ingested_at)?,
            source_document: serde_json::from_str(&source_document)?,
            artifacts: serde_json::from_str(&artifacts)?,
            payload: serde_json::from_str(&payload)?,
        });
    }

    Ok(records)
}

/// Count all stored evidence records
pub async fn count_evidence(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product_documents")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
