//! Evidence ingestion: validation and the idempotent gateway

pub mod gateway;
pub mod validator;

pub use gateway::{ingest, IngestError, IngestOutcome};
pub use validator::{FieldViolation, ValidationError};
