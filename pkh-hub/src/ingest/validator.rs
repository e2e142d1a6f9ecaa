//! Gateway input validation
//!
//! Structural shape (unknown/missing keys) is already enforced during
//! deserialization; this layer checks the semantic constraints the shape
//! cannot express: the identity fields every evidence record must carry.
//! All violations are collected so the caller sees the complete list, not
//! just the first.

use serde::Serialize;
use thiserror::Error;

use crate::models::ProductDocument;

/// One offending field with the reason it was rejected
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

/// Rejected input; nothing was persisted
#[derive(Debug, Error)]
#[error("validation failed: {}", self.field_list())]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    fn field_list(&self) -> String {
        self.violations
            .iter()
            .map(|v| v.field.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Validate an evidence document before any store mutation
pub fn validate(doc: &ProductDocument) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    require_non_empty(&mut violations, "meta.document_id", &doc.meta.document_id);
    require_non_empty(
        &mut violations,
        "product.manufacturer_reference",
        &doc.product.manufacturer_reference,
    );
    require_non_empty(&mut violations, "product.brand", &doc.product.brand);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn require_non_empty(violations: &mut Vec<FieldViolation>, field: &str, value: &str) {
    if value.trim().is_empty() {
        violations.push(FieldViolation {
            field: field.to_string(),
            reason: "must be present and non-empty".to_string(),
        });
    }
}
