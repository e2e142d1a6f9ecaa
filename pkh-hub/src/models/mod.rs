//! Data model for the hub
//!
//! `document` is the wire shape extractors submit; `evidence` and
//! `canonical` are the stored record types derived from it.

pub mod canonical;
pub mod document;
pub mod evidence;

pub use canonical::CanonicalRecord;
pub use document::{
    Artifacts, Attribute, CompatibleWithItem, Image, Language, Media, Meta, Product,
    ProductDocument, SourceDocument, SourceProduct,
};
pub use evidence::{EvidenceRecord, EvidenceSummary, ProductKey};
