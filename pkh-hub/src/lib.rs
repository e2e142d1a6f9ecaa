//! pkh-hub library interface
//!
//! Exposes the ingestion gateway, canonicalization engine, and store
//! access for the binary and for integration testing.

pub mod api;
pub mod canonical;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::canonical::{KeyLocks, SourcePriorities};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Immutable source-priority configuration for the ranking policy
    pub priorities: Arc<SourcePriorities>,
    /// Per-product-key locks serializing canonicalize runs
    pub key_locks: KeyLocks,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, source_priorities: HashMap<String, i64>) -> Self {
        Self {
            db,
            priorities: Arc::new(SourcePriorities::new(source_priorities)),
            key_locks: KeyLocks::new(),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::document_routes())
        .merge(api::canonical_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
