//! Database access for pkh-hub
//!
//! Row mapping helpers live here; table schemas are owned by
//! `pkh_common::db::init` so tests can create them against in-memory pools.

pub mod canonical;
pub mod evidence;

use chrono::{DateTime, Utc};
use pkh_common::{Error, Result};
use sqlx::SqlitePool;
use std::path::Path;
use uuid::Uuid;

/// Initialize database connection pool and apply the hub schema
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    pkh_common::db::init_database(db_path).await
}

/// Parse a stored UUID column
pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| Error::Internal(format!("invalid uuid in store: {}", e)))
}

/// Parse a stored RFC 3339 timestamp column
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("invalid timestamp in store: {}", e)))
}
