//! Evidence records: one immutable row per accepted extraction document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::document::{Artifacts, Product, ProductDocument, SourceDocument};

/// Identity of a logical product across all evidence
///
/// Both members are stored trimmed so ingest-time and read-time keys agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    pub manufacturer_reference: String,
    pub brand: String,
}

impl ProductKey {
    pub fn new(manufacturer_reference: &str, brand: &str) -> Self {
        Self {
            manufacturer_reference: manufacturer_reference.trim().to_string(),
            brand: brand.trim().to_string(),
        }
    }
}

impl std::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.manufacturer_reference, self.brand)
    }
}

/// One stored evidence record; immutable once written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// System-assigned identifier
    pub id: Uuid,

    /// Externally supplied identity of one extraction; globally unique
    pub document_id: String,

    /// Logical product this evidence describes
    pub product_key: ProductKey,

    /// Producing extractor/pipeline tag
    pub source_type: String,

    /// Language tag of the evidence content
    pub language_code: String,

    /// Timestamp assigned by the extractor
    pub extracted_at: Option<DateTime<Utc>>,

    /// Timestamp assigned by the gateway at accept time
    pub ingested_at: DateTime<Utc>,

    /// Opaque provenance metadata, passed through unchanged
    pub source_document: SourceDocument,
    pub artifacts: Artifacts,

    /// The product payload as submitted
    pub payload: Product,
}

impl EvidenceRecord {
    /// Build a record from a validated ingress document
    pub fn from_document(doc: ProductDocument, ingested_at: DateTime<Utc>) -> Self {
        let product_key = ProductKey::new(
            &doc.product.manufacturer_reference,
            &doc.product.brand,
        );
        Self {
            id: Uuid::new_v4(),
            document_id: doc.meta.document_id,
            product_key,
            source_type: doc.meta.source_type,
            language_code: doc.meta.language.code,
            extracted_at: doc.meta.extracted_at,
            ingested_at,
            source_document: doc.meta.source_document,
            artifacts: doc.meta.artifacts,
            payload: doc.product,
        }
    }
}

/// Provenance summary of one evidence record (the audit-trail listing)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceSummary {
    pub id: Uuid,
    pub document_id: String,
    pub source_type: String,
    pub language_code: String,
    pub extracted_at: Option<DateTime<Utc>>,
    pub ingested_at: DateTime<Utc>,
}

impl From<&EvidenceRecord> for EvidenceSummary {
    fn from(record: &EvidenceRecord) -> Self {
        Self {
            id: record.id,
            document_id: record.document_id.clone(),
            source_type: record.source_type.clone(),
            language_code: record.language_code.clone(),
            extracted_at: record.extracted_at,
            ingested_at: record.ingested_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{Language, Meta, SourceProduct};

    fn sample_document() -> ProductDocument {
        ProductDocument {
            meta: Meta {
                document_id: "doc-1".into(),
                source_type: "pdf_llm".into(),
                source_document: SourceDocument {
                    id: "src".into(),
                    kind: "file".into(),
                    format: "pdf".into(),
                    mime_type: None,
                    filename: "src.pdf".into(),
                    path: "input/src.pdf".into(),
                    url: None,
                    source_system: None,
                },
                source_product: SourceProduct {
                    index: 0,
                    page_range: None,
                    anchor: None,
                },
                artifacts: Artifacts::default(),
                language: Language {
                    code: "en".into(),
                    name: "English".into(),
                },
                extracted_at: None,
            },
            product: Product {
                product_name: "Widget".into(),
                brand: "  Acme  ".into(),
                manufacturer_reference: " REF-1 ".into(),
                ..Product::default()
            },
        }
    }

    #[test]
    fn product_key_is_trimmed() {
        let record = EvidenceRecord::from_document(sample_document(), Utc::now());
        assert_eq!(record.product_key.manufacturer_reference, "REF-1");
        assert_eq!(record.product_key.brand, "Acme");
        // Payload content is passed through untouched
        assert_eq!(record.payload.brand, "  Acme  ");
    }

    #[test]
    fn summary_projects_provenance_fields() {
        let record = EvidenceRecord::from_document(sample_document(), Utc::now());
        let summary = EvidenceSummary::from(&record);
        assert_eq!(summary.document_id, "doc-1");
        assert_eq!(summary.source_type, "pdf_llm");
        assert_eq!(summary.id, record.id);
    }
}
