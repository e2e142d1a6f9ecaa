//! Shared test utilities
//!
//! Builders for evidence documents and app state backed by in-memory
//! databases. Concurrency tests use on-disk databases instead (every pool
//! connection must see the same data).

#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use pkh_hub::models::document::{
    Artifacts, Language, Meta, Product, ProductDocument, SourceDocument, SourceProduct,
};
use pkh_hub::AppState;
use sqlx::SqlitePool;

/// App state over a fresh in-memory database, recency-only ranking
pub async fn test_state() -> AppState {
    test_state_with_priorities(HashMap::new()).await
}

/// App state over a fresh in-memory database with a priority table
pub async fn test_state_with_priorities(priorities: HashMap<String, i64>) -> AppState {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    pkh_common::db::create_schema(&pool).await.unwrap();
    AppState::new(pool, priorities)
}

/// Evidence document with the given identity and payload name
pub fn sample_document(document_id: &str, name: &str) -> ProductDocument {
    sample_document_full(document_id, "pdf_llm", "REF-1", "Acme", name, "en", None)
}

/// Fully parameterized evidence document builder
pub fn sample_document_full(
    document_id: &str,
    source_type: &str,
    manufacturer_reference: &str,
    brand: &str,
    name: &str,
    language: &str,
    extracted_at: Option<DateTime<Utc>>,
) -> ProductDocument {
    ProductDocument {
        meta: Meta {
            document_id: document_id.into(),
            source_type: source_type.into(),
            source_document: SourceDocument {
                id: "catalog-2026".into(),
                kind: "file".into(),
                format: "pdf".into(),
                mime_type: Some("application/pdf".into()),
                filename: "catalog-2026.pdf".into(),
                path: "input/catalog-2026.pdf".into(),
                url: None,
                source_system: Some("local_input".into()),
            },
            source_product: SourceProduct {
                index: 0,
                page_range: None,
                anchor: None,
            },
            artifacts: Artifacts::default(),
            language: Language {
                code: language.into(),
                name: language.into(),
            },
            extracted_at,
        },
        product: Product {
            product_name: name.into(),
            brand: brand.into(),
            manufacturer_reference: manufacturer_reference.into(),
            ..Product::default()
        },
    }
}

/// The same document as JSON, for HTTP round trips
pub fn sample_document_json(document_id: &str, name: &str) -> serde_json::Value {
    serde_json::to_value(sample_document(document_id, name)).unwrap()
}
