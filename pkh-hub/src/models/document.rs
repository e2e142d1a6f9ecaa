//! Evidence ingress contract
//!
//! The fixed-shape JSON document every extractor emits: a `meta` section
//! (provenance) and a `product` section (the payload fields). This shape is
//! the sole contract extractors must honor; unknown keys are rejected at
//! deserialization time, so shape drift fails at the gateway boundary
//! before anything is persisted.
//!
//! Array fields default to empty when absent. There is no null-vs-missing
//! ambiguity: a list is always present, possibly empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete evidence document: provenance + payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductDocument {
    pub meta: Meta,
    pub product: Product,
}

/// Provenance block supplied by the extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Meta {
    /// External identity of one extraction; the idempotency key
    pub document_id: String,

    /// Tag identifying the producing extractor/pipeline
    pub source_type: String,

    /// Descriptor of the original source file/URL
    pub source_document: SourceDocument,

    /// Position of this product within the source document
    pub source_product: SourceProduct,

    /// Paths of derived artifacts (markdown, images, json)
    #[serde(default)]
    pub artifacts: Artifacts,

    /// Language of the evidence content
    pub language: Language,

    /// When the extractor derived the content (RFC 3339)
    #[serde(default)]
    pub extracted_at: Option<DateTime<Utc>>,
}

/// Descriptor of the document the evidence was extracted from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceDocument {
    pub id: String,
    pub kind: String,
    pub format: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    pub filename: String,
    pub path: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source_system: Option<String>,
}

/// Position of one product inside a multi-product source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceProduct {
    pub index: i64,
    #[serde(default)]
    pub page_range: Option<Vec<i64>>,
    #[serde(default)]
    pub anchor: Option<String>,
}

/// Paths of artifacts produced alongside the extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Artifacts {
    #[serde(default)]
    pub markdown_path: Option<String>,
    #[serde(default)]
    pub images_dir: Option<String>,
    #[serde(default)]
    pub json_path: Option<String>,
}

/// Language tag of the evidence content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Language {
    pub code: String,
    pub name: String,
}

/// The product payload: every field the canonicalization engine merges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Product {
    pub product_name: String,
    pub brand: String,
    pub manufacturer_reference: String,
    #[serde(default)]
    pub ean_codes: Vec<String>,
    #[serde(default)]
    pub gtin_codes: Vec<String>,
    #[serde(default)]
    pub manufacturer_reference_aliases: Vec<String>,
    #[serde(default)]
    pub short_descriptions: Vec<String>,
    #[serde(default)]
    pub long_descriptions: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub applications: Vec<String>,
    #[serde(default)]
    pub marketing: Vec<String>,
    #[serde(default)]
    pub compatible_with: Vec<CompatibleWithItem>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub regulatory: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub other_texts: Vec<String>,
}

/// Reference to a compatible product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompatibleWithItem {
    pub raw_text: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub manufacturer_reference: Option<String>,
    #[serde(default)]
    pub gtin: Option<String>,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
}

/// One (name, value, unit) triple; attribute names arrive already keyed by
/// the upstream thesaurus collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub unit: String,
}

/// Image evidence with extractor-assigned classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Image {
    pub id: String,
    pub source: String,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub classification: String,
    pub description: String,
    pub product_name_from_image: String,
    pub brand_from_image: String,
}

/// Non-image media reference (datasheet, video, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Media {
    #[serde(rename = "type")]
    pub media_type: String,
    pub title: String,
    pub language_code: String,
    pub url: String,
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_document_json() -> serde_json::Value {
        serde_json::json!({
            "meta": {
                "document_id": "catalog-2026--p00001",
                "source_type": "pdf_llm",
                "source_document": {
                    "id": "catalog-2026",
                    "kind": "file",
                    "format": "pdf",
                    "filename": "catalog-2026.pdf",
                    "path": "input/catalog-2026.pdf"
                },
                "source_product": { "index": 0 },
                "artifacts": {},
                "language": { "code": "en", "name": "English" },
                "extracted_at": "2026-03-01T10:00:00Z"
            },
            "product": {
                "product_name": "Angle Grinder GWS 7-125",
                "brand": "Bosch",
                "manufacturer_reference": "GWS7125"
            }
        })
    }

    #[test]
    fn deserializes_minimal_document_with_defaulted_arrays() {
        let doc: ProductDocument = serde_json::from_value(minimal_document_json()).unwrap();
        assert_eq!(doc.meta.document_id, "catalog-2026--p00001");
        assert_eq!(doc.product.brand, "Bosch");
        assert!(doc.product.tags.is_empty());
        assert!(doc.product.attributes.is_empty());
        assert!(doc.meta.artifacts.markdown_path.is_none());
    }

    #[test]
    fn rejects_unknown_keys() {
        let mut value = minimal_document_json();
        value["product"]["surprise_field"] = serde_json::json!("nope");
        let result = serde_json::from_value::<ProductDocument>(value);
        assert!(result.is_err(), "shape drift must fail deserialization");
    }

    #[test]
    fn serializes_type_field_names_verbatim() {
        let media = Media {
            media_type: "datasheet".into(),
            title: "Datasheet".into(),
            language_code: "en".into(),
            url: "https://example.com/ds.pdf".into(),
            source: "vendor_site".into(),
        };
        let value = serde_json::to_value(&media).unwrap();
        assert_eq!(value["type"], "datasheet");
    }
}
