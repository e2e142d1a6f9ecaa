//! Canonical view API handlers
//!
//! GET /products-canonical (fetch the merged view for a key) and
//! POST /products-canonical/refresh (re-derive it, the retry path after a
//! failed canonicalization).

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::documents::ProductKeyQuery;
use crate::canonical;
use crate::error::{ApiError, ApiResult};
use crate::models::{CanonicalRecord, Product};
use crate::AppState;

/// Canonical record as served to downstream consumers
#[derive(Debug, Serialize)]
pub struct CanonicalResponse {
    pub id: Uuid,
    pub manufacturer_reference: String,
    pub brand: String,
    pub canonical_product_name: String,
    pub language_code_preferred: String,
    pub product: Product,
    pub last_updated_at: DateTime<Utc>,
}

impl From<CanonicalRecord> for CanonicalResponse {
    fn from(record: CanonicalRecord) -> Self {
        Self {
            id: record.id,
            manufacturer_reference: record.product_key.manufacturer_reference,
            brand: record.product_key.brand,
            canonical_product_name: record.canonical_product_name,
            language_code_preferred: record.language_code_preferred,
            product: record.canonical_payload,
            last_updated_at: record.last_updated_at,
        }
    }
}

/// GET /products-canonical?manufacturer_reference=&brand=
pub async fn get_canonical(
    State(state): State<AppState>,
    Query(query): Query<ProductKeyQuery>,
) -> ApiResult<Json<CanonicalResponse>> {
    let key = query.into_key()?;

    let record = crate::db::canonical::load_canonical(&state.db, &key)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no canonical product for {}", key)))?;

    Ok(Json(record.into()))
}

/// POST /products-canonical/refresh?manufacturer_reference=&brand=
///
/// Pure re-derivation from the stored evidence set; no other side effects.
pub async fn refresh_canonical(
    State(state): State<AppState>,
    Query(query): Query<ProductKeyQuery>,
) -> ApiResult<Json<CanonicalResponse>> {
    let key = query.into_key()?;

    let record = canonical::canonicalize(&state.db, &state.key_locks, &state.priorities, &key)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no evidence for {}", key)))?;

    Ok(Json(record.into()))
}

/// Build canonical view routes
pub fn canonical_routes() -> Router<AppState> {
    Router::new()
        .route("/products-canonical", get(get_canonical))
        .route("/products-canonical/refresh", post(refresh_canonical))
}
