//! Canonical store: one row per product key, replaced whole on every merge

use chrono::{DateTime, Utc};
use pkh_common::Result;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::db::{parse_timestamp, parse_uuid};
use crate::models::{CanonicalRecord, Product, ProductKey};

/// Insert-or-replace the canonical view for a key
///
/// The conflict target `(manufacturer_reference, brand)` keeps the row id
/// stable across overwrites: the id minted on first evidence survives every
/// subsequent merge. All derived fields are replaced whole, never patched.
pub async fn upsert_canonical(
    pool: &SqlitePool,
    key: &ProductKey,
    canonical_product_name: &str,
    language_code_preferred: &str,
    canonical_payload: &Product,
    last_updated_at: DateTime<Utc>,
) -> Result<CanonicalRecord> {
    let payload_json = serde_json::to_string(canonical_payload)?;

    let row = sqlx::query(
        r#"
        INSERT INTO products_canonical (
            id, manufacturer_reference, brand,
            canonical_product_name, language_code_preferred,
            canonical_payload, last_updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (manufacturer_reference, brand) DO UPDATE SET
            canonical_product_name = excluded.canonical_product_name,
            language_code_preferred = excluded.language_code_preferred,
            canonical_payload = excluded.canonical_payload,
            last_updated_at = excluded.last_updated_at
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&key.manufacturer_reference)
    .bind(&key.brand)
    .bind(canonical_product_name)
    .bind(language_code_preferred)
    .bind(&payload_json)
    .bind(last_updated_at.to_rfc3339())
    .fetch_one(pool)
    .await?;

    let id: String = row.get("id");

    Ok(CanonicalRecord {
        id: parse_uuid(&id)?,
        product_key: key.clone(),
        canonical_product_name: canonical_product_name.to_string(),
        language_code_preferred: language_code_preferred.to_string(),
        canonical_payload: canonical_payload.clone(),
        last_updated_at,
    })
}

/// Load the canonical view for a key, if one exists
pub async fn load_canonical(pool: &SqlitePool, key: &ProductKey) -> Result<Option<CanonicalRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, manufacturer_reference, brand,
               canonical_product_name, language_code_preferred,
               canonical_payload, last_updated_at
        FROM products_canonical
        WHERE manufacturer_reference = ? AND brand = ?
        "#,
    )
    .bind(&key.manufacturer_reference)
    .bind(&key.brand)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let id: String = row.get("id");
            let payload: String = row.get("canonical_payload");
            let last_updated_at: String = row.get("last_updated_at");

            Ok(Some(CanonicalRecord {
                id: parse_uuid(&id)?,
                product_key: ProductKey {
                    manufacturer_reference: row.get("manufacturer_reference"),
                    brand: row.get("brand"),
                },
                canonical_product_name: row.get("canonical_product_name"),
                language_code_preferred: row.get("language_code_preferred"),
                canonical_payload: serde_json::from_str(&payload)?,
                last_updated_at: parse_timestamp(&last_updated_at)?,
            }))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        pkh_common::db::create_schema(&pool).await.unwrap();
        pool
    }

    fn payload(name: &str) -> Product {
        Product {
            product_name: name.into(),
            brand: "Acme".into(),
            manufacturer_reference: "REF-1".into(),
            ..Product::default()
        }
    }

    #[tokio::test]
    async fn upsert_creates_then_overwrites_keeping_id() {
        let pool = test_pool().await;
        let key = ProductKey::new("REF-1", "Acme");

        let first = upsert_canonical(&pool, &key, "Widget", "en", &payload("Widget"), Utc::now())
            .await
            .unwrap();

        let second = upsert_canonical(
            &pool,
            &key,
            "Widget Pro",
            "de",
            &payload("Widget Pro"),
            Utc::now(),
        )
        .await
        .unwrap();

        // Same row id across overwrites
        assert_eq!(first.id, second.id);

        let loaded = load_canonical(&pool, &key).await.unwrap().unwrap();
        assert_eq!(loaded.canonical_product_name, "Widget Pro");
        assert_eq!(loaded.language_code_preferred, "de");
        assert_eq!(loaded.canonical_payload.product_name, "Widget Pro");
    }

    #[tokio::test]
    async fn load_returns_none_for_unknown_key() {
        let pool = test_pool().await;
        let missing = load_canonical(&pool, &ProductKey::new("NOPE", "Acme"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn one_canonical_row_per_key() {
        let pool = test_pool().await;
        let key = ProductKey::new("REF-1", "Acme");

        for i in 0..3 {
            upsert_canonical(
                &pool,
                &key,
                &format!("Name {}", i),
                "en",
                &payload("Widget"),
                Utc::now(),
            )
            .await
            .unwrap();
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products_canonical")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
