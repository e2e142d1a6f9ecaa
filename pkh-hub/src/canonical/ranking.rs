//! Ranking policy: the total order imposed on evidence records for one key
//!
//! Pure function of its inputs; no store access, no ambient state. Sort
//! keys, most significant first:
//!
//! 1. source tier from the priority table (smaller tier outranks larger;
//!    sources absent from the table rank after every mapped source)
//! 2. `extracted_at` descending (absent sorts last within the tier)
//! 3. `ingested_at` descending
//! 4. `document_id` ascending
//!
//! Key 4 makes the order total, so repeated runs over the same evidence
//! set can never resolve fields differently.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::EvidenceRecord;

/// Immutable source-priority configuration for the ranking policy
///
/// Built from the `[source_priorities]` config table. An empty table
/// degrades ranking to recency-only.
#[derive(Debug, Clone, Default)]
pub struct SourcePriorities {
    tiers: HashMap<String, i64>,
}

impl SourcePriorities {
    pub fn new(tiers: HashMap<String, i64>) -> Self {
        Self { tiers }
    }

    /// Tier for a source tag; `None` means unmapped (lowest tier)
    pub fn tier(&self, source_type: &str) -> Option<i64> {
        self.tiers.get(source_type).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// Order evidence records highest priority first
pub fn rank(mut records: Vec<EvidenceRecord>, priorities: &SourcePriorities) -> Vec<EvidenceRecord> {
    records.sort_by(|a, b| compare(a, b, priorities));
    records
}

fn compare(a: &EvidenceRecord, b: &EvidenceRecord, priorities: &SourcePriorities) -> Ordering {
    compare_tiers(priorities.tier(&a.source_type), priorities.tier(&b.source_type))
        .then_with(|| compare_extracted(a, b))
        .then_with(|| b.ingested_at.cmp(&a.ingested_at))
        .then_with(|| a.document_id.cmp(&b.document_id))
}

fn compare_tiers(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_extracted(a: &EvidenceRecord, b: &EvidenceRecord) -> Ordering {
    match (a.extracted_at, b.extracted_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
