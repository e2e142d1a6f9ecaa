//! Database initialization
//!
//! Opens (or creates) the hub database and applies the schema. Table
//! creation is idempotent (`CREATE TABLE IF NOT EXISTS`) and safe to run
//! on every startup.
//!
//! Two constraints here are load-bearing correctness properties, not
//! performance tuning:
//! - the UNIQUE index on `product_documents.document_id` backs the
//!   idempotent-insert contract of the ingestion gateway;
//! - the UNIQUE index on `products_canonical (manufacturer_reference,
//!   brand)` backs the one-canonical-row-per-product-key upsert.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL allows concurrent readers while one writer commits; ingestion and
    // canonical reads overlap constantly in normal operation.
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all hub tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_product_documents_table(pool).await?;
    create_products_canonical_table(pool).await?;
    Ok(())
}

/// Evidence log: one immutable row per accepted extraction document
pub async fn create_product_documents_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS product_documents (
            id TEXT PRIMARY KEY,
            document_id TEXT NOT NULL UNIQUE,
            source_type TEXT NOT NULL,
            language_code TEXT NOT NULL,
            manufacturer_reference TEXT NOT NULL,
            brand TEXT NOT NULL,
            product_name TEXT NOT NULL,
            source_document TEXT NOT NULL,
            artifacts TEXT NOT NULL,
            extracted_at TEXT,
            ingested_at TEXT NOT NULL,
            payload TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Secondary index supporting the canonicalization read (all evidence
    // for one product key)
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_product_documents_product_key
        ON product_documents (manufacturer_reference, brand)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Canonical views: one mutable row per product key
pub async fn create_products_canonical_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products_canonical (
            id TEXT PRIMARY KEY,
            manufacturer_reference TEXT NOT NULL,
            brand TEXT NOT NULL,
            canonical_product_name TEXT NOT NULL,
            language_code_preferred TEXT NOT NULL,
            canonical_payload TEXT NOT NULL,
            last_updated_at TEXT NOT NULL,
            UNIQUE (manufacturer_reference, brand)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
