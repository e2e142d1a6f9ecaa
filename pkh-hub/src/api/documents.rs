//! Evidence document API handlers
//!
//! POST /product-documents (ingest one evidence document) and
//! GET /product-documents (audit-trail listing for a product key).

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::canonical::ranking;
use crate::error::{ApiError, ApiResult};
use crate::ingest;
use crate::models::{CanonicalRecord, EvidenceSummary, ProductKey};
use crate::AppState;

/// Product-key query parameters shared by the key-scoped endpoints
#[derive(Debug, Deserialize)]
pub struct ProductKeyQuery {
    pub manufacturer_reference: String,
    pub brand: String,
}

impl ProductKeyQuery {
    /// Trim and reject empty key members
    pub fn into_key(self) -> Result<ProductKey, ApiError> {
        let key = ProductKey::new(&self.manufacturer_reference, &self.brand);
        if key.manufacturer_reference.is_empty() || key.brand.is_empty() {
            return Err(ApiError::BadRequest(
                "manufacturer_reference and brand must be non-empty".to_string(),
            ));
        }
        Ok(key)
    }
}

/// Canonical state summary returned alongside an accepted ingest
#[derive(Debug, Serialize)]
pub struct CanonicalSummary {
    pub manufacturer_reference: String,
    pub brand: String,
    pub canonical_product_name: String,
    pub language_code_preferred: String,
    pub last_updated_at: DateTime<Utc>,
}

impl From<&CanonicalRecord> for CanonicalSummary {
    fn from(record: &CanonicalRecord) -> Self {
        Self {
            manufacturer_reference: record.product_key.manufacturer_reference.clone(),
            brand: record.product_key.brand.clone(),
            canonical_product_name: record.canonical_product_name.clone(),
            language_code_preferred: record.language_code_preferred.clone(),
            last_updated_at: record.last_updated_at,
        }
    }
}

/// POST /product-documents response
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    /// "ingested" or "skipped"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<CanonicalSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonicalization_error: Option<String>,
}

/// GET /product-documents response
#[derive(Debug, Serialize)]
pub struct EvidenceListResponse {
    pub manufacturer_reference: String,
    pub brand: String,
    pub evidence: Vec<EvidenceSummary>,
}

/// POST /product-documents
///
/// Ingest one evidence document. Duplicates succeed with
/// `status: "skipped"`; validation failures return 422 listing every
/// offending field.
pub async fn ingest_document(
    State(state): State<AppState>,
    Json(doc): Json<crate::models::ProductDocument>,
) -> ApiResult<Json<IngestResponse>> {
    let outcome = ingest::ingest(&state.db, &state.key_locks, &state.priorities, doc).await?;

    if outcome.duplicate {
        return Ok(Json(IngestResponse {
            status: "skipped".to_string(),
            id: None,
            reason: Some("duplicate_document_id".to_string()),
            canonical: None,
            canonicalization_error: None,
        }));
    }

    Ok(Json(IngestResponse {
        status: "ingested".to_string(),
        id: outcome.evidence_id,
        reason: None,
        canonical: outcome.canonical.as_ref().map(CanonicalSummary::from),
        canonicalization_error: outcome.canonicalization_error,
    }))
}

/// GET /product-documents?manufacturer_reference=&brand=
///
/// List evidence provenance for a product key, ranking policy order.
pub async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ProductKeyQuery>,
) -> ApiResult<Json<EvidenceListResponse>> {
    let key = query.into_key()?;

    let records = crate::db::evidence::load_for_key(&state.db, &key).await?;
    let ordered = ranking::rank(records, &state.priorities);
    let evidence = ordered.iter().map(EvidenceSummary::from).collect();

    Ok(Json(EvidenceListResponse {
        manufacturer_reference: key.manufacturer_reference,
        brand: key.brand,
        evidence,
    }))
}

/// Build evidence document routes
pub fn document_routes() -> Router<AppState> {
    Router::new().route(
        "/product-documents",
        post(ingest_document).get(list_documents),
    )
}
