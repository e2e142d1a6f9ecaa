//! Canonical records: the single merged view per product key
//!
//! A canonical record is a derived, disposable projection of the evidence
//! set for its key. It is overwritten whole on every canonicalization run
//! and can be rebuilt from evidence at any time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::document::Product;
use crate::models::evidence::ProductKey;

/// The current best-effort merged view for one product key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Stable identifier, minted on first evidence for the key
    pub id: Uuid,

    pub product_key: ProductKey,

    /// Scalar projection of the winning `product_name`
    pub canonical_product_name: String,

    /// Language code of the single highest-ranked evidence record
    pub language_code_preferred: String,

    /// Field-by-field merged payload
    pub canonical_payload: Product,

    /// Timestamp of the most recent successful merge
    pub last_updated_at: DateTime<Utc>,
}
